//! Clause and statement rendering
//!
//! Turns [`FieldSpec`], [`ConditionSpec`], [`OrderSpec`], [`LimitSpec`] and the
//! insert/update payloads into SQL text. Every function here is total: input
//! the renderer cannot use degrades to the clause default (`*` or an empty
//! string) rather than failing.

use serde_json::Value;

use crate::sql::escape::{escape, escape_id, value_text};
use crate::sql::function::is_mysql_function;
use crate::sql::spec::{
    ConditionSpec, FieldSpec, InsertPayload, LimitSpec, OrderSpec, UpdatePayload,
};

/// Column list and value list of an INSERT statement, both parenthesised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertInfos {
    pub fields: String,
    pub values: String,
}

/// Build the field list of a SELECT
pub fn select_fields(fields: &FieldSpec) -> String {
    match fields {
        FieldSpec::All => "*".to_string(),
        FieldSpec::Raw(raw) if raw.is_empty() => "*".to_string(),
        FieldSpec::Raw(raw) => raw.clone(),
        FieldSpec::List(list) if list.is_empty() => "*".to_string(),
        FieldSpec::List(list) => list
            .iter()
            .map(|field| {
                if is_mysql_function(field) || has_as_alias(field) {
                    field.clone()
                } else {
                    escape_id(field)
                }
            })
            .collect::<Vec<_>>()
            .join(", "),
        FieldSpec::Aliases(pairs) if pairs.is_empty() => "*".to_string(),
        FieldSpec::Aliases(pairs) => pairs
            .iter()
            .map(|(field, alias)| format!("{} AS {}", escape_id(field), alias))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Build the `(fields)` and `(values)` lists of an INSERT
pub fn insert_infos(infos: &InsertPayload) -> InsertInfos {
    let (fields, values) = match infos {
        InsertPayload::None => (Vec::new(), Vec::new()),
        InsertPayload::Columns(pairs) => (
            pairs.iter().map(|(field, _)| escape_id(field)).collect(),
            pairs.iter().map(|(_, value)| literal(value)).collect(),
        ),
        InsertPayload::Values(values) => (Vec::new(), values.iter().map(literal).collect()),
    };

    InsertInfos {
        fields: format!("({})", fields.join(", ")),
        values: format!("({})", values.join(", ")),
    }
}

/// Build the SET list of an UPDATE
pub fn update_infos(infos: &UpdatePayload) -> String {
    match infos {
        UpdatePayload::None => String::new(),
        UpdatePayload::Raw(raw) => raw.clone(),
        UpdatePayload::List(list) => list.join(", "),
        UpdatePayload::Assignments(pairs) => pairs
            .iter()
            .map(|(field, value)| format!("{} = {}", escape_id(field), literal(value)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Build a WHERE clause, or an empty string when there is no condition
///
/// ```
/// use mysqler::sql::{where_clause, ConditionSpec};
/// use serde_json::json;
///
/// assert_eq!(where_clause(&"a = 1".into()), "WHERE a = 1");
/// assert_eq!(where_clause(&["or", "a = 1", "b = c"].into()), "WHERE a = 1 OR b = c");
/// assert_eq!(
///     where_clause(&json!({"a": 1, "b": [1, 2, 3]}).into()),
///     "WHERE `a` = 1 AND `b` IN (1, 2, 3)"
/// );
/// assert_eq!(where_clause(&ConditionSpec::None), "");
/// ```
pub fn where_clause(wheres: &ConditionSpec) -> String {
    let body = match wheres {
        ConditionSpec::None => String::new(),
        ConditionSpec::Raw(raw) => raw.clone(),
        ConditionSpec::List(list) => match list.split_first() {
            Some((first, rest)) if is_join_operator(first) => {
                rest.join(&format!(" {} ", first.trim().to_uppercase()))
            }
            _ => list.join(" AND "),
        },
        ConditionSpec::Map(pairs) => pairs
            .iter()
            .map(|(field, value)| match value {
                Value::Array(_) => format!("{} IN ({})", escape_id(field), escape(value)),
                _ => format!("{} = {}", escape_id(field), escape(value)),
            })
            .collect::<Vec<_>>()
            .join(" AND "),
    };
    prefixed("WHERE", body)
}

/// Build an ORDER BY clause, or an empty string
pub fn order_by(orders: &OrderSpec) -> String {
    let body = match orders {
        OrderSpec::None => String::new(),
        OrderSpec::Raw(raw) => raw.clone(),
        OrderSpec::List(list) => list.join(", "),
        OrderSpec::Map(pairs) => pairs
            .iter()
            .map(|(field, direction)| format!("{} {}", escape_id(field), sort_direction(direction)))
            .collect::<Vec<_>>()
            .join(", "),
    };
    prefixed("ORDER BY", body)
}

/// Build a LIMIT clause, or an empty string
pub fn limit(limits: &LimitSpec) -> String {
    let body = match limits {
        LimitSpec::None => String::new(),
        LimitSpec::Raw(raw) => raw.clone(),
        LimitSpec::Range(parts) => match parts.split_first() {
            Some((count, rest)) => match rest.first() {
                Some(offset) if is_truthy(offset) => {
                    format!("{}, {}", value_text(count), value_text(offset))
                }
                _ => value_text(count),
            },
            None => String::new(),
        },
        LimitSpec::Page { count, offset } if is_positive(count) => {
            if is_positive(offset) {
                format!("{} OFFSET {}", value_text(count), value_text(offset))
            } else {
                value_text(count)
            }
        }
        LimitSpec::Page { .. } => String::new(),
    };
    prefixed("LIMIT", body)
}

/// Build a SELECT statement
///
/// ```
/// use mysqler::sql::{select, FieldSpec, LimitSpec, OrderSpec};
/// use serde_json::json;
///
/// let sql = select(
///     "t",
///     &["product"].into(),
///     &json!({"color": "red"}).into(),
///     &OrderSpec::map([("count", "DESC")]),
///     &[1, 1].into(),
/// );
/// assert_eq!(
///     sql,
///     "SELECT `product` FROM `t` WHERE `color` = 'red' ORDER BY `count` DESC LIMIT 1, 1"
/// );
/// ```
pub fn select(
    table: &str,
    fields: &FieldSpec,
    wheres: &ConditionSpec,
    orders: &OrderSpec,
    limits: &LimitSpec,
) -> String {
    join_segments([
        "SELECT".to_string(),
        select_fields(fields),
        "FROM".to_string(),
        escape_id(table),
        where_clause(wheres),
        order_by(orders),
        limit(limits),
    ])
}

/// Build an INSERT statement
pub fn insert(table: &str, infos: &InsertPayload) -> String {
    let InsertInfos { fields, values } = insert_infos(infos);
    join_segments([
        "INSERT INTO".to_string(),
        escape_id(table),
        fields,
        "VALUES".to_string(),
        values,
    ])
}

/// Build an UPDATE statement
pub fn update(
    table: &str,
    infos: &UpdatePayload,
    wheres: &ConditionSpec,
    orders: &OrderSpec,
) -> String {
    join_segments([
        "UPDATE".to_string(),
        escape_id(table),
        "SET".to_string(),
        update_infos(infos),
        where_clause(wheres),
        order_by(orders),
    ])
}

/// Build a DELETE statement
///
/// Renders an unconditional DELETE when `wheres` is empty; the facade refuses
/// to send that.
pub fn delete(table: &str, wheres: &ConditionSpec) -> String {
    join_segments([
        "DELETE FROM".to_string(),
        escape_id(table),
        where_clause(wheres),
    ])
}

// =============================================================================
// Helpers
// =============================================================================

/// Insert/update value: recognised function calls verbatim, the rest escaped
///
/// A bare `now()` in any case is written as `NOW()`.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) if s.eq_ignore_ascii_case("NOW()") => "NOW()".to_string(),
        Value::String(s) if is_mysql_function(s) => s.clone(),
        _ => escape(value),
    }
}

fn has_as_alias(field: &str) -> bool {
    field.to_uppercase().contains(" AS ")
}

fn is_join_operator(token: &str) -> bool {
    let token = token.trim();
    token.eq_ignore_ascii_case("AND") || token.eq_ignore_ascii_case("OR")
}

fn sort_direction(direction: &Value) -> &'static str {
    match direction {
        Value::String(s) if s.trim().eq_ignore_ascii_case("DESC") => "DESC",
        Value::Bool(false) => "DESC",
        _ => "ASC",
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_positive(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f > 0.0),
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(|f| f > 0.0),
        _ => false,
    }
}

fn prefixed(keyword: &str, body: String) -> String {
    if body.is_empty() {
        body
    } else {
        format!("{} {}", keyword, body)
    }
}

/// Join non-empty segments with single spaces
fn join_segments<const N: usize>(segments: [String; N]) -> String {
    segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
