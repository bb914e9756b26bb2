//! Table matching of actual records against expected rows.
//!
//! A row matches a record when, for every `(field, expected)` pair, the field
//! path resolved inside the record displays as the same text as the expected
//! expression resolved against the store. Comparing displayed text makes
//! `"200"` equal to `200`; `Null` has no text and so never equals `"null"`.
//!
//! Three policies are offered:
//!
//! - [`match_exact`]: same number of records as rows, compared by position.
//! - [`match_at_least`]: every row matches some record.
//! - [`match_excludes`]: no row matches any record.

mod error;


use log::debug;
use propsworld_path::PropertyPath;

use crate::resolve::{ResolveError, lookup_path, resolve};
use crate::rows::ExpectedRow;
use crate::store::Store;
use crate::value::Value;

pub use error::{MatchError, UnmatchedRecord};

/// Returns `true` when `record` satisfies every pair of `row`.
///
/// # Errors
///
/// Returns [`MatchError::Resolve`] when a field path or expected expression
/// is malformed.
pub fn row_matches(row: &ExpectedRow, record: &Value, store: &Store) -> Result<bool, MatchError> {
    for (field, expected) in row.iter() {
        // Column names are always paths, even when they read like literals.
        let path = PropertyPath::parse(field).map_err(|source| ResolveError::Path {
            expr: field.to_owned(),
            source,
        })?;
        let found = lookup_path(&path, record);
        let wanted = resolve(expected, store)?;
        if found.display_text() != wanted.display_text() {
            debug!("field `{field}` mismatch: found {found}, expected {wanted}");
            return Ok(false);
        }
    }
    Ok(true)
}

/// View `actual` as a list of records.
///
/// Sequences are used as they are, `Null` is empty and a single record is a
/// list of one.
///
/// # Errors
///
/// Returns [`MatchError::NotASequence`] for any other value.
pub fn records_of(actual: &Value) -> Result<&[Value], MatchError> {
    match actual {
        Value::Sequence(items) => Ok(items),
        Value::Null => Ok(&[]),
        Value::Record(_) => Ok(std::slice::from_ref(actual)),
        other => Err(MatchError::NotASequence {
            found: other.type_name(),
        }),
    }
}

/// Require one record per row, each matching the row at its position.
///
/// Every mismatching record is reported, not just the first.
///
/// # Errors
///
/// Returns [`MatchError::LengthMismatch`] or [`MatchError::Unmatched`], or
/// the errors of [`records_of`] and [`row_matches`].
///
/// # Examples
///
/// ```
/// use propsworld::{ExpectedRow, Store, Value, match_exact};
/// use serde_json::json;
///
/// let people = Value::from(json!([{"name": "Alice"}, {"name": "Bob"}]));
/// let rows = [
///     ExpectedRow::from_pairs([("name", "Alice")]),
///     ExpectedRow::from_pairs([("name", "Bob")]),
/// ];
/// assert!(match_exact(&people, &rows, &Store::new()).is_ok());
/// ```
pub fn match_exact(actual: &Value, rows: &[ExpectedRow], store: &Store) -> Result<(), MatchError> {
    let records = records_of(actual)?;
    if rows.len() != records.len() {
        return Err(MatchError::LengthMismatch {
            expected: rows.len(),
            actual: records.len(),
        });
    }
    let mut unmatched = Vec::new();
    for (index, (row, record)) in rows.iter().zip(records).enumerate() {
        if !row_matches(row, record, store)? {
            unmatched.push(UnmatchedRecord {
                index,
                expected: row.clone(),
                record: record.clone(),
            });
        }
    }
    if unmatched.is_empty() {
        Ok(())
    } else {
        Err(MatchError::Unmatched { records: unmatched })
    }
}

/// Require every row to match at least one record.
///
/// # Errors
///
/// Returns [`MatchError::MissingRow`] for the first row nothing matches, or
/// the errors of [`records_of`] and [`row_matches`].
pub fn match_at_least(
    actual: &Value,
    rows: &[ExpectedRow],
    store: &Store,
) -> Result<(), MatchError> {
    let records = records_of(actual)?;
    for row in rows {
        if first_match(row, records, store)?.is_none() {
            return Err(MatchError::MissingRow { row: row.clone() });
        }
    }
    Ok(())
}

/// Require that no row matches any record.
///
/// # Errors
///
/// Returns [`MatchError::UnwantedRow`] for the first row that matches, or the
/// errors of [`records_of`] and [`row_matches`].
pub fn match_excludes(
    actual: &Value,
    rows: &[ExpectedRow],
    store: &Store,
) -> Result<(), MatchError> {
    let records = records_of(actual)?;
    for row in rows {
        if let Some(index) = first_match(row, records, store)? {
            return Err(MatchError::UnwantedRow {
                row: row.clone(),
                index,
            });
        }
    }
    Ok(())
}

fn first_match(
    row: &ExpectedRow,
    records: &[Value],
    store: &Store,
) -> Result<Option<usize>, MatchError> {
    for (index, record) in records.iter().enumerate() {
        if row_matches(row, record, store)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
