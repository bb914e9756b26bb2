//! Failures reported by the table matcher.

use serde_json::{Value as Json, json};
use thiserror::Error;

use crate::resolve::ResolveError;
use crate::rows::ExpectedRow;
use crate::value::Value;

/// A record that failed positional comparison against its expected row.
#[derive(Debug, Clone, PartialEq)]
pub struct UnmatchedRecord {
    /// Zero-based position of the record.
    pub index: usize,
    /// Row the record was compared with.
    pub expected: ExpectedRow,
    /// The offending record.
    pub record: Value,
}

impl UnmatchedRecord {
    fn to_json(&self) -> Json {
        json!({
            "index": self.index,
            "expected": self.expected.to_json(),
            "found": self.record.to_json(),
        })
    }
}

/// Errors raised when actual data does not satisfy expected rows.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// Exact matching needs one record per expected row.
    #[error("expected {expected} records but found {actual}")]
    LengthMismatch {
        /// Number of expected rows.
        expected: usize,
        /// Number of actual records.
        actual: usize,
    },
    /// Exact matching found records that differ from their rows.
    #[error("{} record(s) did not match:\n{}", .records.len(), render_unmatched(.records))]
    Unmatched {
        /// Every offending record, in order.
        records: Vec<UnmatchedRecord>,
    },
    /// No record matched a row that had to be present.
    #[error("no record matches expected row:\n{}", render_row(.row))]
    MissingRow {
        /// The row nothing matched.
        row: ExpectedRow,
    },
    /// A record matched a row that must not be present.
    #[error("record {index} matches unwanted row:\n{}", render_row(.row))]
    UnwantedRow {
        /// The row that matched.
        row: ExpectedRow,
        /// Zero-based position of the matching record.
        index: usize,
    },
    /// The actual value cannot be treated as records.
    #[error("expected a sequence of records but found {found}")]
    NotASequence {
        /// Type name of the actual value.
        found: &'static str,
    },
    /// A field path or expected expression could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

fn pretty(json: &Json) -> String {
    serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
}

fn render_row(row: &ExpectedRow) -> String {
    pretty(&row.to_json())
}

fn render_unmatched(records: &[UnmatchedRecord]) -> String {
    pretty(&Json::Array(
        records.iter().map(UnmatchedRecord::to_json).collect(),
    ))
}
