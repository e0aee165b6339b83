//! Mysqler - query facade over a database actor
//!
//! This module provides the `Mysqler` struct that compiles statements from
//! clause specs, runs them through its [`Actor`] and remembers what the last
//! statement did.

use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, warn};

use crate::actor::Actor;
use crate::config::MysqlerConfig;
use crate::error::{MysqlerError, Result};
use crate::result::{QueryResult, ResultInfo, Row};
use crate::sql::compile;
use crate::sql::escape::escape_id;
use crate::sql::spec::{
    ConditionSpec, FieldSpec, InsertPayload, LimitSpec, OrderSpec, UpdatePayload,
};

/// Query facade bound to one database actor
///
/// All methods take `&self`, so a facade can be shared between tasks. The
/// last-statement metadata (`last_sql`, `num_rows`, ...) is overwritten by
/// every completed [`query`](Self::query); with several statements in flight
/// the last one to finish wins, so read per-call details from the returned
/// [`QueryResult`] instead.
pub struct Mysqler<A: Actor> {
    /// Database actor running the statements
    actor: A,
    /// Configuration the actor was created from
    config: MysqlerConfig,
    /// Metadata of the most recent statement
    info: Mutex<ResultInfo>,
}

impl<A: Actor> Mysqler<A> {
    /// Create a facade over an existing actor
    pub fn with_actor(actor: A, config: MysqlerConfig) -> Self {
        Self {
            actor,
            config,
            info: Mutex::new(ResultInfo::default()),
        }
    }

    /// Get a reference to the actor
    pub fn actor(&self) -> &A {
        &self.actor
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &MysqlerConfig {
        &self.config
    }

    fn info(&self) -> MutexGuard<'_, ResultInfo> {
        self.info.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the last statement's metadata
    pub fn result_info(&self) -> ResultInfo {
        self.info().clone()
    }

    /// Text of the most recently issued statement
    pub fn last_sql(&self) -> String {
        self.info().last_sql.clone()
    }

    /// Row count of the last read statement
    pub fn num_rows(&self) -> Option<u64> {
        self.info().num_rows
    }

    /// Affected row count of the last write statement
    pub fn affected_rows(&self) -> Option<u64> {
        self.info().affected_rows
    }

    /// Changed row count of the last write statement
    pub fn changed_rows(&self) -> Option<u64> {
        self.info().changed_rows
    }

    /// Insert id of the last write statement
    pub fn insert_id(&self) -> Option<u64> {
        self.info().insert_id
    }

    /// Close the underlying connection(s)
    pub async fn end(&self) -> Result<()> {
        debug!("Ending database actor");
        self.actor.end().await
    }

    // =========================================================================
    // Raw Statements
    // =========================================================================

    /// Run a SQL statement
    ///
    /// The statement is recorded as `last_sql` before it is sent. Actor
    /// failures are returned unchanged.
    pub async fn query(&self, sql: &str) -> Result<QueryResult> {
        self.info().last_sql = sql.to_string();
        debug!(target: "mysqler::sql", sql, "Executing statement");

        let result = self.actor.execute(sql).await?;

        match &result {
            QueryResult::Rows(rows) => debug!(num_rows = rows.len(), "Statement returned rows"),
            QueryResult::Summary(summary) => debug!(
                affected_rows = summary.affected_rows,
                insert_id = summary.insert_id,
                "Statement completed"
            ),
        }
        self.info().record(&result);

        Ok(result)
    }

    /// Run a statement and return its first row
    ///
    /// Returns `None` when there are no rows, including for write statements.
    pub async fn query_row(&self, sql: &str) -> Result<Option<Row>> {
        Ok(self.query(sql).await?.into_first_row())
    }

    /// Run a statement and return the first column of its first row
    pub async fn query_value(&self, sql: &str) -> Result<Option<Value>> {
        Ok(self.query_row(sql).await?.and_then(first_value))
    }

    // =========================================================================
    // Compiled Statements
    // =========================================================================

    /// Select rows from a table
    ///
    /// Pass `Default::default()` for clauses you do not need.
    pub async fn select(
        &self,
        table: &str,
        fields: impl Into<FieldSpec>,
        wheres: impl Into<ConditionSpec>,
        orders: impl Into<OrderSpec>,
        limits: impl Into<LimitSpec>,
    ) -> Result<QueryResult> {
        let sql = compile::select(
            table,
            &fields.into(),
            &wheres.into(),
            &orders.into(),
            &limits.into(),
        );
        self.query(&sql).await
    }

    /// Insert one row
    pub async fn insert(&self, table: &str, infos: impl Into<InsertPayload>) -> Result<QueryResult> {
        let sql = compile::insert(table, &infos.into());
        self.query(&sql).await
    }

    /// Update rows
    pub async fn update(
        &self,
        table: &str,
        infos: impl Into<UpdatePayload>,
        wheres: impl Into<ConditionSpec>,
        orders: impl Into<OrderSpec>,
    ) -> Result<QueryResult> {
        let sql = compile::update(table, &infos.into(), &wheres.into(), &orders.into());
        self.query(&sql).await
    }

    /// Delete rows
    ///
    /// Fails with [`MysqlerError::DeleteAllNotAllowed`] without sending
    /// anything when `wheres` compiles to no condition.
    pub async fn delete(&self, table: &str, wheres: impl Into<ConditionSpec>) -> Result<QueryResult> {
        let wheres = wheres.into();
        if compile::where_clause(&wheres).is_empty() {
            warn!(table, "Refusing DELETE without a condition");
            return Err(MysqlerError::DeleteAllNotAllowed);
        }
        let sql = compile::delete(table, &wheres);
        self.query(&sql).await
    }

    // =========================================================================
    // Single Row / Value Helpers
    // =========================================================================

    /// Select the first matching row
    pub async fn get_row(
        &self,
        table: &str,
        fields: impl Into<FieldSpec>,
        wheres: impl Into<ConditionSpec>,
        orders: impl Into<OrderSpec>,
    ) -> Result<Option<Row>> {
        let sql = compile::select(
            table,
            &fields.into(),
            &wheres.into(),
            &orders.into(),
            &LimitSpec::rows(1),
        );
        self.query_row(&sql).await
    }

    /// Select the first field of the first matching row
    pub async fn get_value(
        &self,
        table: &str,
        field: impl Into<FieldSpec>,
        wheres: impl Into<ConditionSpec>,
        orders: impl Into<OrderSpec>,
    ) -> Result<Option<Value>> {
        Ok(self
            .get_row(table, field, wheres, orders)
            .await?
            .and_then(first_value))
    }

    /// Count matching rows
    pub async fn get_count(&self, table: &str, wheres: impl Into<ConditionSpec>) -> Result<u64> {
        let sql = compile::select(
            table,
            &FieldSpec::Raw("COUNT(*)".to_string()),
            &wheres.into(),
            &OrderSpec::None,
            &LimitSpec::None,
        );
        let value = self.query_value(&sql).await?;
        Ok(value.as_ref().and_then(number_of).unwrap_or(0.0) as u64)
    }

    /// Sum a column over the matching rows
    ///
    /// With a limit, the sum runs over the bounded, ordered selection:
    /// `SELECT SUM(field) FROM (<select>) AS subquery`. No matching rows sum
    /// to `0`.
    pub async fn get_sum(
        &self,
        table: &str,
        field: &str,
        wheres: impl Into<ConditionSpec>,
        orders: impl Into<OrderSpec>,
        limits: impl Into<LimitSpec>,
    ) -> Result<f64> {
        let sum = format!("SUM({})", escape_id(field));
        let limits = limits.into();

        let sql = if compile::limit(&limits).is_empty() {
            compile::select(
                table,
                &FieldSpec::Raw(sum),
                &wheres.into(),
                &orders.into(),
                &LimitSpec::None,
            )
        } else {
            let inner = compile::select(
                table,
                &FieldSpec::List(vec![field.to_string()]),
                &wheres.into(),
                &orders.into(),
                &limits,
            );
            format!("SELECT {} FROM ({}) AS subquery", sum, inner)
        };

        let value = self.query_value(&sql).await?;
        Ok(value.as_ref().and_then(number_of).unwrap_or(0.0))
    }

    /// List the column names of a table in declaration order
    pub async fn get_table_fields(&self, table: &str) -> Result<Vec<String>> {
        let sql = format!("SHOW COLUMNS FROM {}", escape_id(table));
        let result = self.query(&sql).await?;

        Ok(result
            .rows()
            .iter()
            .filter_map(|row| row.get("Field").and_then(Value::as_str))
            .map(String::from)
            .collect())
    }
}

/// Value of the first column of a row
fn first_value(row: Row) -> Option<Value> {
    row.into_iter().next().map(|(_, value)| value)
}

/// Numeric reading of an aggregate result; drivers may report DECIMAL as text
fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
