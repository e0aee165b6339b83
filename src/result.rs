//! Query results and the metadata derived from them
//!
//! Read statements produce rows; write statements produce a summary of
//! affected rows. [`ResultInfo`] is the one place that tells the two apart.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A result row, keyed by column name in column order
pub type Row = Map<String, Value>;

/// Outcome of a write statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    /// Rows matched by the statement
    pub affected_rows: u64,
    /// Rows whose values actually changed, when the actor reports it
    pub changed_rows: Option<u64>,
    /// First auto-increment id generated by an INSERT, 0 otherwise
    pub insert_id: u64,
}

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    Rows(Vec<Row>),
    Summary(WriteSummary),
}

impl QueryResult {
    /// Rows of a read statement; empty for write summaries
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Rows(rows) => rows,
            Self::Summary(_) => &[],
        }
    }

    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Self::Rows(rows) => rows,
            Self::Summary(_) => Vec::new(),
        }
    }

    pub fn summary(&self) -> Option<&WriteSummary> {
        match self {
            Self::Rows(_) => None,
            Self::Summary(summary) => Some(summary),
        }
    }

    /// First row, if this is a read result with at least one row
    pub fn into_first_row(self) -> Option<Row> {
        self.into_rows().into_iter().next()
    }

    pub fn affected_rows(&self) -> Option<u64> {
        self.summary().map(|s| s.affected_rows)
    }

    pub fn insert_id(&self) -> Option<u64> {
        self.summary().map(|s| s.insert_id)
    }
}

/// Metadata about the most recent statement run through a facade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultInfo {
    pub last_sql: String,
    pub num_rows: Option<u64>,
    pub affected_rows: Option<u64>,
    pub changed_rows: Option<u64>,
    pub insert_id: Option<u64>,
}

impl ResultInfo {
    /// Overwrite the counters from a fresh result
    ///
    /// Row results set `num_rows` and clear the write counters; summaries do
    /// the opposite.
    pub fn record(&mut self, result: &QueryResult) {
        match result {
            QueryResult::Rows(rows) => {
                self.num_rows = Some(rows.len() as u64);
                self.affected_rows = None;
                self.changed_rows = None;
                self.insert_id = None;
            }
            QueryResult::Summary(summary) => {
                self.num_rows = None;
                self.affected_rows = Some(summary.affected_rows);
                self.changed_rows = summary.changed_rows;
                self.insert_id = Some(summary.insert_id);
            }
        }
    }
}

/// Keywords that start a statement producing a result set
const ROW_KEYWORDS: &[&str] = &[
    "SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "WITH", "VALUES", "TABLE",
];

/// Whether a statement produces rows, judged by its leading keyword
///
/// Used to classify statements that returned no rows at all. Leading
/// `/* */`, `--` and `#` comments are skipped.
pub fn statement_returns_rows(sql: &str) -> bool {
    let sql = skip_leading_comments(sql);
    if sql.starts_with('(') {
        return true;
    }
    let keyword: String = sql
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase();
    ROW_KEYWORDS.contains(&keyword.as_str())
}

fn skip_leading_comments(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("/*") {
            sql = match rest.find("*/") {
                Some(end) => &rest[end + 2..],
                None => "",
            };
        } else if sql.starts_with("--") || sql.starts_with('#') {
            sql = match sql.find('\n') {
                Some(end) => &sql[end + 1..],
                None => "",
            };
        } else {
            return sql;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        match v {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    // =========================================================================
    // ResultInfo Tests
    // =========================================================================

    #[test]
    fn test_result_info_starts_empty() {
        let info = ResultInfo::default();
        assert_eq!(info.last_sql, "");
        assert!(info.num_rows.is_none());
        assert!(info.affected_rows.is_none());
        assert!(info.changed_rows.is_none());
        assert!(info.insert_id.is_none());
    }

    #[test]
    fn test_record_rows() {
        let mut info = ResultInfo::default();
        info.record(&QueryResult::Rows(vec![
            row(json!({"color": "red"})),
            row(json!({"color": "yellow"})),
        ]));

        assert_eq!(info.num_rows, Some(2));
        assert!(info.affected_rows.is_none());
        assert!(info.changed_rows.is_none());
        assert!(info.insert_id.is_none());
    }

    #[test]
    fn test_record_summary() {
        let mut info = ResultInfo::default();
        info.record(&QueryResult::Summary(WriteSummary {
            affected_rows: 2,
            changed_rows: Some(1),
            insert_id: 0,
        }));

        assert!(info.num_rows.is_none());
        assert_eq!(info.affected_rows, Some(2));
        assert_eq!(info.changed_rows, Some(1));
        assert_eq!(info.insert_id, Some(0));
    }

    #[test]
    fn test_record_overwrites_previous_shape() {
        let mut info = ResultInfo::default();
        info.record(&QueryResult::Summary(WriteSummary {
            affected_rows: 3,
            changed_rows: Some(3),
            insert_id: 7,
        }));
        info.record(&QueryResult::Rows(Vec::new()));

        assert_eq!(info.num_rows, Some(0));
        assert!(info.affected_rows.is_none());
        assert!(info.insert_id.is_none());
    }

    // =========================================================================
    // QueryResult Tests
    // =========================================================================

    #[test]
    fn test_first_row_of_summary_is_none() {
        let result = QueryResult::Summary(WriteSummary::default());
        assert!(result.rows().is_empty());
        assert!(result.into_first_row().is_none());
    }

    #[test]
    fn test_first_row_of_rows() {
        let result = QueryResult::Rows(vec![row(json!({"a": 1})), row(json!({"a": 2}))]);
        assert_eq!(result.affected_rows(), None);
        assert_eq!(result.into_first_row(), Some(row(json!({"a": 1}))));
    }

    #[test]
    fn test_serializes_like_driver_results() {
        let rows = QueryResult::Rows(vec![row(json!({"s1": 2}))]);
        assert_eq!(serde_json::to_value(&rows).unwrap(), json!([{"s1": 2}]));

        let summary = QueryResult::Summary(WriteSummary {
            affected_rows: 1,
            changed_rows: None,
            insert_id: 9,
        });
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"affected_rows": 1, "changed_rows": null, "insert_id": 9})
        );
    }

    // =========================================================================
    // statement_returns_rows Tests
    // =========================================================================

    #[test]
    fn test_row_returning_statements() {
        assert!(statement_returns_rows("SELECT 1"));
        assert!(statement_returns_rows("  select * from t"));
        assert!(statement_returns_rows("SHOW COLUMNS FROM `t`"));
        assert!(statement_returns_rows("DESC t"));
        assert!(statement_returns_rows("(SELECT 1) UNION (SELECT 2)"));
        assert!(statement_returns_rows("WITH x AS (SELECT 1) SELECT * FROM x"));
    }

    #[test]
    fn test_leading_comments_are_skipped() {
        assert!(statement_returns_rows("/* tag */ SELECT * FROM t WHERE 0"));
        assert!(statement_returns_rows("/* a */ /* b */\nSHOW TABLES"));
        assert!(statement_returns_rows("-- x\nSELECT 1"));
        assert!(statement_returns_rows("# note\n  select 1"));
        assert!(!statement_returns_rows("/* SELECT */ UPDATE t SET a = 1"));
        assert!(!statement_returns_rows("-- SELECT"));
        assert!(!statement_returns_rows("/* unterminated SELECT"));
    }

    #[test]
    fn test_write_statements() {
        assert!(!statement_returns_rows("INSERT INTO t () VALUES ()"));
        assert!(!statement_returns_rows("UPDATE t SET a = 1"));
        assert!(!statement_returns_rows("DELETE FROM t WHERE a = 1"));
        assert!(!statement_returns_rows("SELECTED"));
        assert!(!statement_returns_rows(""));
    }
}
