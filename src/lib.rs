//! # mysqler
//!
//! A thin convenience layer over MySQL connections and pools.
//!
//! This crate wraps a single connection or a connection pool, remembers what
//! the last statement did, and builds SELECT / INSERT / UPDATE / DELETE
//! statements from loosely shaped clause inputs: raw strings, ordered lists
//! of fragments, or column keyed mappings.
//!
//! ## Features
//!
//! - **Clause Compiler**: WHERE, ORDER BY, LIMIT and field lists from strings, lists or mappings
//! - **MySQL Escaping**: Backtick identifiers and backslash-escaped literals
//! - **Function Pass-Through**: `NOW()`, `COUNT(*)` and friends are never quoted
//! - **Result Metadata**: `num_rows` for reads, `affected_rows` / `insert_id` for writes
//! - **Delete Guard**: DELETE without a condition is refused before it reaches the server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mysqler::{ConditionSpec, LimitSpec, MysqlerConfig, OrderSpec};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MysqlerConfig::builder("mysql://root@localhost/shop").build();
//!     let pool = mysqler::create_pool(config)?;
//!
//!     // SELECT `product` FROM `fruits` WHERE `color` = 'red' ORDER BY `count` DESC LIMIT 1, 1
//!     let result = pool
//!         .select(
//!             "fruits",
//!             ["product"],
//!             ConditionSpec::map([("color", "red")]),
//!             OrderSpec::map([("count", "DESC")]),
//!             LimitSpec::range(1, 1),
//!         )
//!         .await?;
//!     println!("{} rows", result.rows().len());
//!
//!     pool.insert("fruits", json!({"product": "papaya", "color": "green"})).await?;
//!     println!("inserted id {:?}", pool.insert_id());
//!
//!     let reds = pool.get_count("fruits", json!({"color": "red"})).await?;
//!     println!("{} red fruits", reds);
//!
//!     pool.end().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Clause Shapes
//!
//! ```rust
//! use mysqler::sql::{limit, order_by, where_clause};
//! use serde_json::json;
//!
//! assert_eq!(where_clause(&json!(["or", "a = 1", "b = 2"]).into()), "WHERE a = 1 OR b = 2");
//! assert_eq!(order_by(&json!({"a": false}).into()), "ORDER BY `a` DESC");
//! assert_eq!(limit(&json!({"count": 5, "offset": 10}).into()), "LIMIT 5 OFFSET 10");
//! ```

pub mod actor;
pub mod config;
pub mod connection;
mod decode;
pub mod error;
pub mod facade;
pub mod pool;
pub mod result;
pub mod sql;

// Re-export main types for convenience
pub use actor::Actor;
pub use config::{MysqlerConfig, MysqlerConfigBuilder};
pub use connection::{Connection, ConnectionActor};
pub use error::{MysqlerError, Result};
pub use facade::Mysqler;
pub use pool::{Pool, PoolActor};
pub use result::{QueryResult, ResultInfo, Row, WriteSummary};
pub use sql::{
    ConditionSpec, FieldSpec, InsertPayload, LimitSpec, OrderSpec, UpdatePayload, escape,
    escape_id,
};

/// Create a single-connection facade
///
/// The connection is opened by the first statement.
pub fn create_connection(config: MysqlerConfig) -> Result<Connection> {
    Connection::new(config)
}

/// Create a pooled facade
///
/// Must be called from within a tokio runtime.
pub fn create_pool(config: MysqlerConfig) -> Result<Pool> {
    Pool::new(config)
}
