//! SQL Value and Identifier Escaping
//!
//! Renders values and identifiers using the MySQL client conventions:
//! backtick-quoted identifiers and backslash-escaped string literals.

use serde_json::{Number, Value};

/// Quote a SQL identifier with backticks
///
/// Inner backticks are doubled and every `.`-separated part is quoted on its
/// own, so qualified names keep their meaning.
///
/// # Example
/// ```
/// use mysqler::escape_id;
///
/// assert_eq!(escape_id("my_table"), "`my_table`");
/// assert_eq!(escape_id("db.my_table"), "`db`.`my_table`");
/// ```
pub fn escape_id(identifier: &str) -> String {
    let escaped = identifier.replace('`', "``").replace('.', "`.`");
    format!("`{}`", escaped)
}

/// Render a value as a SQL literal
///
/// - null → `NULL`
/// - booleans → `true` / `false`
/// - numbers are left unquoted
/// - strings are single-quoted with special characters backslash-escaped
/// - arrays become a comma-separated list (nested arrays are parenthesised)
/// - objects become `` `key` = value `` pairs
///
/// # Example
/// ```
/// use mysqler::escape;
/// use serde_json::json;
///
/// assert_eq!(escape(&json!("a'b")), "'a\\'b'");
/// assert_eq!(escape(&json!([1, "x"])), "1, 'x'");
/// ```
pub fn escape(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => escape_string(s),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) => format!("({})", escape(item)),
                _ => escape(item),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(key, val)| format!("{} = {}", escape_id(key), escape(val)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Quote a string literal, escaping characters MySQL treats specially
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Print a number the way SQL expects it
///
/// Floats with no fractional part print without the trailing `.0`.
pub(crate) fn number_text(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

/// Plain-text rendering of a value for raw SQL fragments
///
/// Strings are used as-is, null renders empty, everything else prints the
/// way [`escape`] would leave it unquoted.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // escape_id Tests
    // =========================================================================

    #[test]
    fn test_escape_id_simple() {
        assert_eq!(escape_id("ab"), "`ab`");
        assert_eq!(escape_id("users"), "`users`");
    }

    #[test]
    fn test_escape_id_with_backticks() {
        assert_eq!(escape_id("we`ird"), "`we``ird`");
        assert_eq!(escape_id("`quoted`"), "```quoted```");
    }

    #[test]
    fn test_escape_id_qualified() {
        assert_eq!(escape_id("shop.products"), "`shop`.`products`");
        assert_eq!(escape_id("a.b.c"), "`a`.`b`.`c`");
    }

    #[test]
    fn test_escape_id_with_spaces() {
        assert_eq!(escape_id("column name"), "`column name`");
    }

    #[test]
    fn test_escape_id_unicode() {
        assert_eq!(escape_id("日本語"), "`日本語`");
    }

    #[test]
    fn test_escape_id_empty() {
        assert_eq!(escape_id(""), "``");
    }

    #[test]
    fn test_escape_id_reserved_keyword() {
        assert_eq!(escape_id("select"), "`select`");
        assert_eq!(escape_id("count"), "`count`");
    }

    // =========================================================================
    // escape Scalar Tests
    // =========================================================================

    #[test]
    fn test_escape_null_and_bool() {
        assert_eq!(escape(&Value::Null), "NULL");
        assert_eq!(escape(&json!(true)), "true");
        assert_eq!(escape(&json!(false)), "false");
    }

    #[test]
    fn test_escape_numbers_unquoted() {
        assert_eq!(escape(&json!(5)), "5");
        assert_eq!(escape(&json!(-12)), "-12");
        assert_eq!(escape(&json!(2.5)), "2.5");
        assert_eq!(escape(&json!(10.0)), "10");
    }

    #[test]
    fn test_escape_string_quotes() {
        assert_eq!(escape(&json!("a'b")), "'a\\'b'");
        assert_eq!(escape(&json!("say \"hi\"")), "'say \\\"hi\\\"'");
        assert_eq!(escape(&json!("")), "''");
    }

    #[test]
    fn test_escape_string_control_chars() {
        assert_eq!(escape_string("a\nb"), "'a\\nb'");
        assert_eq!(escape_string("a\tb\r"), "'a\\tb\\r'");
        assert_eq!(escape_string("nul\0"), "'nul\\0'");
        assert_eq!(escape_string("\u{1a}"), "'\\Z'");
        assert_eq!(escape_string("\u{8}"), "'\\b'");
    }

    #[test]
    fn test_escape_string_backslash() {
        assert_eq!(escape_string("C:\\tmp"), "'C:\\\\tmp'");
    }

    // =========================================================================
    // escape Collection Tests
    // =========================================================================

    #[test]
    fn test_escape_array_list() {
        assert_eq!(escape(&json!([1, 2, 3])), "1, 2, 3");
        assert_eq!(escape(&json!(["a", 1, null])), "'a', 1, NULL");
    }

    #[test]
    fn test_escape_nested_array() {
        assert_eq!(escape(&json!([[1, 2], [3, 4]])), "(1, 2), (3, 4)");
    }

    #[test]
    fn test_escape_empty_array() {
        assert_eq!(escape(&json!([])), "");
    }

    #[test]
    fn test_escape_object_pairs() {
        assert_eq!(escape(&json!({"a": 1, "b": "c"})), "`a` = 1, `b` = 'c'");
    }

    // =========================================================================
    // value_text Tests
    // =========================================================================

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("a = 1")), "a = 1");
        assert_eq!(value_text(&json!(5)), "5");
        assert_eq!(value_text(&Value::Null), "");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!([1, "b"])), "1,b");
    }
}
