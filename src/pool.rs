//! Connection pool facade

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::debug;

use crate::actor::Actor;
use crate::config::MysqlerConfig;
use crate::decode::run_statement;
use crate::error::{MysqlerError, Result};
use crate::facade::Mysqler;
use crate::result::QueryResult;

/// Facade over a MySQL connection pool
pub type Pool = Mysqler<PoolActor>;

/// MySQL connection pool
///
/// Concurrent statements may run on different pooled connections.
pub struct PoolActor {
    pool: MySqlPool,
}

impl PoolActor {
    /// Wrap an existing pool
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl Actor for PoolActor {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        if self.pool.is_closed() {
            return Err(MysqlerError::connection("pool has been closed"));
        }
        run_statement(&self.pool, sql).await
    }

    async fn end(&self) -> Result<()> {
        debug!("Closing connection pool");
        self.pool.close().await;
        Ok(())
    }
}

impl Pool {
    /// Create a pool facade from configuration
    ///
    /// Connections are opened on demand, up to `max_connections`. Must be
    /// called from within a tokio runtime.
    pub fn new(config: MysqlerConfig) -> Result<Self> {
        let options = config.connect_options()?;

        let mut pool_options = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout);
        if let Some(idle) = config.idle_timeout {
            pool_options = pool_options.idle_timeout(idle);
        }

        let pool = pool_options.connect_lazy_with(options);
        Ok(Self::with_actor(PoolActor::from_pool(pool), config))
    }

    /// Create a pool facade from an existing sqlx pool
    pub fn from_pool(pool: MySqlPool, config: MysqlerConfig) -> Self {
        Self::with_actor(PoolActor::from_pool(pool), config)
    }
}
