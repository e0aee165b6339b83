//! Clause inputs accepted by the SQL compiler
//!
//! Every clause can be described as a raw SQL string, an ordered list of
//! fragments, or a column keyed mapping. Each shape is a variant here.
//!
//! The `From<serde_json::Value>` conversions accept arbitrary JSON: shapes a
//! clause does not understand turn into its empty variant, which renders to
//! the clause default (`*` or nothing) instead of failing.

use serde_json::Value;

use crate::sql::escape::{number_text, value_text};

/// Select field list
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldSpec {
    /// `*`
    #[default]
    All,
    /// Raw field list, used as-is (`""` means `*`)
    Raw(String),
    /// Column names; function calls and `x AS y` fragments stay unescaped
    List(Vec<String>),
    /// Column to output alias, rendered `` `col` AS alias ``
    Aliases(Vec<(String, String)>),
}

impl FieldSpec {
    pub fn aliases<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Aliases(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for FieldSpec {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<Vec<String>> for FieldSpec {
    fn from(fields: Vec<String>) -> Self {
        Self::List(fields)
    }
}

impl From<Vec<&str>> for FieldSpec {
    fn from(fields: Vec<&str>) -> Self {
        Self::List(fields.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldSpec {
    fn from(fields: [&str; N]) -> Self {
        Self::List(fields.into_iter().map(String::from).collect())
    }
}

impl From<Value> for FieldSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Raw(s),
            Value::Array(items) => Self::List(items.iter().map(value_text).collect()),
            Value::Object(map) => {
                Self::Aliases(map.iter().map(|(k, v)| (k.clone(), value_text(v))).collect())
            }
            _ => Self::All,
        }
    }
}

/// WHERE conditions
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConditionSpec {
    #[default]
    None,
    /// Raw condition text
    Raw(String),
    /// Condition fragments joined with `AND`, or with the operator given by a
    /// leading `"AND"` / `"OR"` element
    List(Vec<String>),
    /// Column to value; arrays render as `IN (...)`, entries are joined with `AND`
    Map(Vec<(String, Value)>),
}

impl ConditionSpec {
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for ConditionSpec {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for ConditionSpec {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<Vec<String>> for ConditionSpec {
    fn from(conditions: Vec<String>) -> Self {
        Self::List(conditions)
    }
}

impl From<Vec<&str>> for ConditionSpec {
    fn from(conditions: Vec<&str>) -> Self {
        Self::List(conditions.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConditionSpec {
    fn from(conditions: [&str; N]) -> Self {
        Self::List(conditions.into_iter().map(String::from).collect())
    }
}

impl From<Value> for ConditionSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Raw(s),
            Value::Array(items) => Self::List(items.iter().map(value_text).collect()),
            Value::Object(map) => Self::Map(map.into_iter().collect()),
            _ => Self::None,
        }
    }
}

/// ORDER BY terms
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OrderSpec {
    #[default]
    None,
    Raw(String),
    /// `"column DIR"` fragments joined with `, `
    List(Vec<String>),
    /// Column to direction: `"DESC"` (any case) or `false` sort descending,
    /// anything else ascending
    Map(Vec<(String, Value)>),
}

impl OrderSpec {
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for OrderSpec {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for OrderSpec {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<Vec<String>> for OrderSpec {
    fn from(orders: Vec<String>) -> Self {
        Self::List(orders)
    }
}

impl From<Vec<&str>> for OrderSpec {
    fn from(orders: Vec<&str>) -> Self {
        Self::List(orders.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OrderSpec {
    fn from(orders: [&str; N]) -> Self {
        Self::List(orders.into_iter().map(String::from).collect())
    }
}

impl From<Value> for OrderSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Raw(s),
            Value::Array(items) => Self::List(items.iter().map(value_text).collect()),
            Value::Object(map) => Self::Map(map.into_iter().collect()),
            _ => Self::None,
        }
    }
}

/// LIMIT clause
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LimitSpec {
    #[default]
    None,
    /// Rendered verbatim after `LIMIT` (numbers, including `0`, land here)
    Raw(String),
    /// `[count]` or `[count, offset]`, rendered `LIMIT count, offset`
    Range(Vec<Value>),
    /// Rendered `LIMIT count OFFSET offset`; nothing when `count` is not positive
    Page { count: Value, offset: Value },
}

impl LimitSpec {
    pub fn rows(count: u64) -> Self {
        Self::Raw(count.to_string())
    }

    pub fn range(count: u64, offset: u64) -> Self {
        Self::Range(vec![count.into(), offset.into()])
    }

    pub fn page(count: u64, offset: u64) -> Self {
        Self::Page {
            count: count.into(),
            offset: offset.into(),
        }
    }
}

macro_rules! limit_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LimitSpec {
                fn from(n: $t) -> Self {
                    Self::Raw(n.to_string())
                }
            }
        )*
    };
}

limit_from_int!(i32, i64, u32, u64, usize);

impl From<&str> for LimitSpec {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for LimitSpec {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for LimitSpec {
    fn from(parts: [T; N]) -> Self {
        Self::Range(parts.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for LimitSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => Self::Raw(number_text(&n)),
            Value::String(s) => Self::Raw(s),
            Value::Array(items) => Self::Range(items),
            Value::Object(mut map) => Self::Page {
                count: map.remove("count").unwrap_or(Value::Null),
                offset: map.remove("offset").unwrap_or(Value::Null),
            },
            _ => Self::None,
        }
    }
}

/// Row data for INSERT
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsertPayload {
    #[default]
    None,
    /// Column to value, rendered with a column list
    Columns(Vec<(String, Value)>),
    /// Positional values for every column, rendered without a column list
    Values(Vec<Value>),
}

impl InsertPayload {
    pub fn columns<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Columns(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Vec<Value>> for InsertPayload {
    fn from(values: Vec<Value>) -> Self {
        Self::Values(values)
    }
}

impl From<Value> for InsertPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Columns(map.into_iter().collect()),
            Value::Array(items) => Self::Values(items),
            _ => Self::None,
        }
    }
}

/// SET list for UPDATE
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UpdatePayload {
    #[default]
    None,
    Raw(String),
    /// Assignment fragments joined with `, `
    List(Vec<String>),
    /// Column to new value, rendered `` `col` = value ``
    Assignments(Vec<(String, Value)>),
}

impl UpdatePayload {
    pub fn assignments<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Assignments(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for UpdatePayload {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for UpdatePayload {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<Vec<&str>> for UpdatePayload {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(String::from).collect())
    }
}

impl From<Value> for UpdatePayload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Raw(s),
            Value::Array(items) => Self::List(items.iter().map(value_text).collect()),
            Value::Object(map) => Self::Assignments(map.into_iter().collect()),
            _ => Self::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_spec_from_json() {
        assert_eq!(FieldSpec::from(json!("a, b")), FieldSpec::Raw("a, b".into()));
        assert_eq!(
            FieldSpec::from(json!(["a", "b"])),
            FieldSpec::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            FieldSpec::from(json!({"a": "b"})),
            FieldSpec::Aliases(vec![("a".into(), "b".into())])
        );
        assert_eq!(FieldSpec::from(json!(10)), FieldSpec::All);
        assert_eq!(FieldSpec::from(json!(true)), FieldSpec::All);
        assert_eq!(FieldSpec::from(Value::Null), FieldSpec::All);
    }

    #[test]
    fn test_condition_spec_keeps_mapping_order() {
        let spec = ConditionSpec::from(json!({"z": 1, "a": [1, 2], "m": "x"}));
        let ConditionSpec::Map(pairs) = spec else {
            panic!("expected a mapping");
        };
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_condition_spec_invalid_types() {
        assert_eq!(ConditionSpec::from(json!(true)), ConditionSpec::None);
        assert_eq!(ConditionSpec::from(json!(10)), ConditionSpec::None);
        assert_eq!(ConditionSpec::from(Value::Null), ConditionSpec::None);
    }

    #[test]
    fn test_order_spec_helpers() {
        assert_eq!(
            OrderSpec::map([("count", "DESC")]),
            OrderSpec::Map(vec![("count".into(), json!("DESC"))])
        );
        assert_eq!(OrderSpec::from(["a ASC"]), OrderSpec::List(vec!["a ASC".into()]));
    }

    #[test]
    fn test_limit_spec_from_json() {
        assert_eq!(LimitSpec::from(json!(5)), LimitSpec::Raw("5".into()));
        assert_eq!(LimitSpec::from(json!("5 OFFSET 10")), LimitSpec::Raw("5 OFFSET 10".into()));
        assert_eq!(
            LimitSpec::from(json!([5, 10])),
            LimitSpec::Range(vec![json!(5), json!(10)])
        );
        assert_eq!(
            LimitSpec::from(json!({"offset": 5})),
            LimitSpec::Page {
                count: Value::Null,
                offset: json!(5)
            }
        );
        assert_eq!(LimitSpec::from(json!(true)), LimitSpec::None);
    }

    #[test]
    fn test_limit_spec_from_native() {
        assert_eq!(LimitSpec::from(1), LimitSpec::Raw("1".into()));
        assert_eq!(LimitSpec::from([1, 1]), LimitSpec::range(1, 1));
        assert_eq!(LimitSpec::rows(3), LimitSpec::Raw("3".into()));
    }

    #[test]
    fn test_insert_payload_from_json() {
        assert_eq!(InsertPayload::from(json!("abc")), InsertPayload::None);
        assert_eq!(InsertPayload::from(json!(5)), InsertPayload::None);
        assert_eq!(
            InsertPayload::from(json!([1, "a"])),
            InsertPayload::Values(vec![json!(1), json!("a")])
        );
        assert_eq!(
            InsertPayload::from(json!({"a": 1})),
            InsertPayload::columns([("a", 1)])
        );
    }

    #[test]
    fn test_update_payload_from_json() {
        assert_eq!(UpdatePayload::from(json!("a = 1")), UpdatePayload::Raw("a = 1".into()));
        assert_eq!(
            UpdatePayload::from(json!(["a = 1", "b = c"])),
            UpdatePayload::List(vec!["a = 1".into(), "b = c".into()])
        );
        assert_eq!(UpdatePayload::from(json!(7)), UpdatePayload::None);
    }
}
