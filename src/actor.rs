//! The database handle behind a facade
//!
//! A facade compiles SQL and tracks metadata; an [`Actor`] is what actually
//! runs the statement. [`ConnectionActor`](crate::connection::ConnectionActor)
//! and [`PoolActor`](crate::pool::PoolActor) are the MySQL implementations;
//! anything else (a test double, a proxy) can implement the trait and be
//! handed to [`Mysqler::with_actor`](crate::Mysqler::with_actor).

use async_trait::async_trait;

use crate::error::Result;
use crate::result::QueryResult;

/// Executes SQL text against a database
#[async_trait]
pub trait Actor: Send + Sync {
    /// Run one statement and return its rows or write summary
    async fn execute(&self, sql: &str) -> Result<QueryResult>;

    /// Gracefully close the underlying connection(s)
    async fn end(&self) -> Result<()>;
}
