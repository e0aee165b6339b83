//! Driver result decoding
//!
//! Runs a statement over the MySQL text protocol and turns what comes back
//! into a [`QueryResult`]: rows are decoded column by column into JSON
//! values, write outcomes into a [`WriteSummary`].

use futures::TryStreamExt;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Number, Value};
use sqlx::mysql::{MySql, MySqlRow};
use sqlx::{Column, Decode, Either, Executor, Row as SqlxRow, Type, TypeInfo};

use crate::error::Result;
use crate::result::{QueryResult, Row, WriteSummary, statement_returns_rows};

/// Execute `sql` on `executor` and collect the full result
pub(crate) async fn run_statement<'e, E>(executor: E, sql: &'e str) -> Result<QueryResult>
where
    E: Executor<'e, Database = MySql>,
{
    let mut stream = sqlx::raw_sql(sql).fetch_many(executor);

    let mut rows = Vec::new();
    let mut summary = WriteSummary::default();
    let mut first_done = true;

    while let Some(item) = stream.try_next().await? {
        match item {
            Either::Left(done) => {
                summary.affected_rows += done.rows_affected();
                if first_done {
                    summary.insert_id = done.last_insert_id();
                    first_done = false;
                }
            }
            Either::Right(row) => rows.push(convert_row(&row)),
        }
    }

    if !rows.is_empty() || statement_returns_rows(sql) {
        Ok(QueryResult::Rows(rows))
    } else {
        Ok(QueryResult::Summary(summary))
    }
}

/// Converts a sqlx MySqlRow to an ordered JSON row
pub(crate) fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .map(|col| {
            (
                col.name().to_string(),
                convert_value(row, col.ordinal(), col.type_info().name()),
            )
        })
        .collect()
}

/// Converts a single column value by its MySQL type name
///
/// YEAR and BIT columns carry the UNSIGNED flag and decode as `u64`. A value
/// the typed decoder rejects falls back to its text form rather than NULL.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let type_name = type_name.to_uppercase();

    let decoded = match type_name.as_str() {
        name if name.ends_with("UNSIGNED") || name == "YEAR" || name == "BIT" => {
            decode_with(row, index, |v: u64| Value::from(v))
        }

        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            decode_with(row, index, |v: i64| Value::from(v))
                .or_else(|| decode_with(row, index, |v: u64| Value::from(v)))
        }

        "FLOAT" | "DOUBLE" => decode_with(row, index, |v: f64| {
            Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
        }),

        "DECIMAL" => decode_with(row, index, decimal_value),

        "DATETIME" => decode_with(row, index, |v: chrono::NaiveDateTime| {
            Value::String(v.format("%Y-%m-%d %H:%M:%S").to_string())
        }),

        "TIMESTAMP" => decode_with(row, index, |v: chrono::DateTime<chrono::Utc>| {
            Value::String(v.to_rfc3339())
        }),

        "DATE" => decode_with(row, index, |v: chrono::NaiveDate| Value::String(v.to_string())),

        "TIME" => decode_with(row, index, |v: chrono::NaiveTime| Value::String(v.to_string())),

        "JSON" => decode_with(row, index, |v: Value| v),

        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
            decode_with(row, index, |v: Vec<u8>| {
                Value::String(String::from_utf8_lossy(&v).into_owned())
            })
        }

        // For all other types, try to get as string
        _ => decode_with(row, index, Value::String),
    };

    decoded.unwrap_or_else(|| text_value(row, index))
}

/// Typed decode; `None` when the column type is not compatible with `T`
fn decode_with<T>(row: &MySqlRow, index: usize, to_value: impl FnOnce(T) -> Value) -> Option<Value>
where
    T: for<'r> Decode<'r, MySql> + Type<MySql>,
{
    match row.try_get::<Option<T>, _>(index) {
        Ok(Some(v)) => Some(to_value(v)),
        Ok(None) => Some(Value::Null),
        Err(_) => None,
    }
}

/// Raw text of a column, skipping the driver's type check
fn text_value(row: &MySqlRow, index: usize) -> Value {
    match row.try_get_unchecked::<Option<Vec<u8>>, _>(index) {
        Ok(Some(bytes)) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        _ => Value::Null,
    }
}

/// Integral decimals become JSON integers, the rest floats
fn decimal_value(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return Value::from(i);
        }
    }
    d.to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(d.to_string()))
}
