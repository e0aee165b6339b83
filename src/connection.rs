//! Single-connection facade
//!
//! The connection is opened on the first statement and reused afterwards.
//! Statements on one connection run one at a time.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection as _};
use tokio::sync::Mutex;
use tracing::debug;

use crate::actor::Actor;
use crate::config::MysqlerConfig;
use crate::decode::run_statement;
use crate::error::{MysqlerError, Result};
use crate::facade::Mysqler;
use crate::result::QueryResult;

/// Facade over a single MySQL connection
pub type Connection = Mysqler<ConnectionActor>;

/// Lazily opened MySQL connection
pub struct ConnectionActor {
    options: MySqlConnectOptions,
    conn: Mutex<Option<MySqlConnection>>,
    closed: AtomicBool,
}

impl ConnectionActor {
    /// Prepare a connection; nothing is opened until the first statement
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self {
            options,
            conn: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Whether `end` or `destroy` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(MysqlerError::connection("connection has been closed"));
        }
        Ok(())
    }

    /// Close the connection immediately, without the quit handshake
    pub async fn destroy(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(conn) = self.conn.lock().await.take() {
            debug!("Destroying connection");
            conn.close_hard().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Actor for ConnectionActor {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.ensure_open()?;

        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            debug!("Opening connection");
            *guard = Some(self.options.connect().await?);
        }

        match guard.as_mut() {
            Some(conn) => run_statement(conn, sql).await,
            None => Err(MysqlerError::connection("connection is not open")),
        }
    }

    async fn end(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(conn) = self.conn.lock().await.take() {
            debug!("Closing connection");
            conn.close().await?;
        }
        Ok(())
    }
}

impl Connection {
    /// Create a connection facade from configuration
    ///
    /// Only the URL is validated here; the network connection is made by the
    /// first statement.
    pub fn new(config: MysqlerConfig) -> Result<Self> {
        let options = config.connect_options()?;
        Ok(Self::with_actor(ConnectionActor::new(options), config))
    }

    /// Forcefully close the connection
    ///
    /// Pools have no counterpart; use [`end`](Mysqler::end) there.
    pub async fn destroy(&self) -> Result<()> {
        self.actor().destroy().await
    }
}
