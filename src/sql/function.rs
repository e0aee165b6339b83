//! Recognition of MySQL built-in function calls
//!
//! Values that look like a call to one of these functions are written into
//! statements verbatim instead of being quoted as string literals.

use std::sync::LazyLock;

use regex::Regex;

/// Date, aggregate and string functions passed through unescaped
pub const MYSQL_FUNCTIONS: &[&str] = &[
    "NOW",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "CURDATE",
    "CURTIME",
    "DATE",
    "ADDTIME",
    "SUBTIME",
    "TIMEDIFF",
    "ADDDATE",
    "SUBDATE",
    "DATEDIFF",
    "FROM_UNIXTIME",
    "UNIX_TIMESTAMP",
    "UTC_TIMESTAMP",
    "AVG",
    "COUNT",
    "MAX",
    "MIN",
    "SUM",
    "CONCAT",
    "HEX",
    "LEFT",
    "LENGTH",
    "LOWER",
    "REPLACE",
    "RIGHT",
    "SUBSTR",
    "UPPER",
];

static FUNCTION_CALL: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)^(?:{})\(.*\)$", MYSQL_FUNCTIONS.join("|"));
    Regex::new(&pattern).expect("function allow-list forms a valid pattern")
});

/// Check whether `text` is a call to an allow-listed MySQL function
///
/// Matching is case-insensitive and the whole text must be the call:
///
/// ```
/// use mysqler::sql::is_mysql_function;
///
/// assert!(is_mysql_function("NOW()"));
/// assert!(is_mysql_function("sum(`price`)"));
/// assert!(!is_mysql_function("price + NOW()"));
/// ```
pub fn is_mysql_function(text: &str) -> bool {
    FUNCTION_CALL.is_match(text)
}
