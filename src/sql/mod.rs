//! SQL utilities for mysqler
//!
//! Provides clause inputs, escaping, and the statement compiler.

pub mod compile;
pub mod escape;
pub mod function;
pub mod spec;

pub use compile::{
    InsertInfos, delete, insert, insert_infos, limit, order_by, select, select_fields, update,
    update_infos, where_clause,
};
pub use escape::{escape, escape_id, escape_string};
pub use function::{MYSQL_FUNCTIONS, is_mysql_function};
pub use spec::{ConditionSpec, FieldSpec, InsertPayload, LimitSpec, OrderSpec, UpdatePayload};
