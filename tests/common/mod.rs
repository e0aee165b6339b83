//! Scripted in-memory actor for facade tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mysqler::{
    Actor, Mysqler, MysqlerConfig, MysqlerError, QueryResult, Result, Row, WriteSummary,
};
use serde_json::Value;

/// What the mock answers to the next statement
pub enum Reply {
    Rows(Vec<Value>),
    Summary(WriteSummary),
    Fail(&'static str, &'static str),
}

/// An actor that records statements and plays back queued replies.
///
/// With nothing queued it answers with an empty row set.
#[derive(Default)]
pub struct MockActor {
    replies: Mutex<VecDeque<Reply>>,
    executed: Mutex<Vec<String>>,
    ended: AtomicBool,
}

impl MockActor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Actor for MockActor {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.executed.lock().unwrap().push(sql.to_string());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Rows(Vec::new()));

        match reply {
            Reply::Rows(rows) => Ok(QueryResult::Rows(rows.into_iter().map(to_row).collect())),
            Reply::Summary(summary) => Ok(QueryResult::Summary(summary)),
            Reply::Fail(code, message) => Err(MysqlerError::actor(code, message)),
        }
    }

    async fn end(&self) -> Result<()> {
        self.ended.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn to_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("mock rows must be JSON objects, got {}", other),
    }
}

pub fn summary(affected_rows: u64, changed_rows: u64, insert_id: u64) -> Reply {
    Reply::Summary(WriteSummary {
        affected_rows,
        changed_rows: Some(changed_rows),
        insert_id,
    })
}

/// A facade over the given mock
pub fn facade(actor: MockActor) -> Mysqler<MockActor> {
    Mysqler::with_actor(actor, MysqlerConfig::builder("mysql://mock/test").build())
}
