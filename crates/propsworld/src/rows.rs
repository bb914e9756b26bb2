//! Expected rows handed to the table matcher.
//!
//! An [`ExpectedRow`] is an ordered list of `(field path, expected
//! expression)` pairs. Rows are usually built from a tabular grid whose first
//! row names the field paths, one per column.

use std::fmt;
use std::ops::Deref;

use hashbrown::HashSet;
use serde_json::{Map, Value as Json};
use thiserror::Error;

/// Errors raised while building [`ExpectedRows`] from a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RowsError {
    /// The grid has no header row.
    #[error("expected rows require a header row")]
    MissingHeader,
    /// The header repeats a field path.
    #[error("expected rows header contains duplicate column '{column}'")]
    DuplicateHeader {
        /// Repeated field path.
        column: String,
    },
    /// A data row has more or fewer cells than the header.
    #[error("expected rows row {row_number} has {actual} cells but expected {expected}")]
    UnevenRow {
        /// 1-based index of the row, counting the header.
        row_number: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells present.
        actual: usize,
    },
}

/// One expected record: field paths paired with reference expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedRow {
    fields: Vec<(String, String)>,
}

impl ExpectedRow {
    /// Construct an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(field, expected)` pairs, keeping their order.
    ///
    /// # Examples
    ///
    /// ```
    /// use propsworld::ExpectedRow;
    ///
    /// let row = ExpectedRow::from_pairs([("name", "Alice"), ("value", "{100}")]);
    /// assert_eq!(row.len(), 2);
    /// assert_eq!(row.get("value"), Some("{100}"));
    /// ```
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(field, expected)| (field.into(), expected.into()))
                .collect(),
        }
    }

    /// Append a `(field, expected)` pair.
    pub fn push(&mut self, field: impl Into<String>, expected: impl Into<String>) {
        self.fields.push((field.into(), expected.into()));
    }

    /// Expected expression for `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, expected)| expected.as_str())
    }

    /// Iterate the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, expected)| (field.as_str(), expected.as_str()))
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the row has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object of the raw expressions, for diagnostics.
    #[must_use]
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.fields
                .iter()
                .map(|(field, expected)| (field.clone(), Json::String(expected.clone())))
                .collect::<Map<_, _>>(),
        )
    }
}

impl fmt::Display for ExpectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExpectedRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Ordered collection of [`ExpectedRow`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedRows(Vec<ExpectedRow>);

impl ExpectedRows {
    /// Wrap already-built rows.
    #[must_use]
    pub fn new(rows: Vec<ExpectedRow>) -> Self {
        Self(rows)
    }

    /// Consume the collection, returning the rows.
    #[must_use]
    pub fn into_inner(self) -> Vec<ExpectedRow> {
        self.0
    }
}

impl Deref for ExpectedRows {
    type Target = [ExpectedRow];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for ExpectedRows {
    type Item = ExpectedRow;
    type IntoIter = std::vec::IntoIter<ExpectedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExpectedRows {
    type Item = &'a ExpectedRow;
    type IntoIter = std::slice::Iter<'a, ExpectedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<ExpectedRow>> for ExpectedRows {
    fn from(rows: Vec<ExpectedRow>) -> Self {
        Self(rows)
    }
}

impl FromIterator<ExpectedRow> for ExpectedRows {
    fn from_iter<I: IntoIterator<Item = ExpectedRow>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<Vec<Vec<String>>> for ExpectedRows {
    type Error = RowsError;

    /// Interpret the first row as field paths and every later row as the
    /// expected expressions for those fields.
    fn try_from(grid: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        let mut grid = grid.into_iter();
        let header = grid.next().ok_or(RowsError::MissingHeader)?;
        let mut seen = HashSet::with_capacity(header.len());
        for column in &header {
            if !seen.insert(column.as_str()) {
                return Err(RowsError::DuplicateHeader {
                    column: column.clone(),
                });
            }
        }
        grid.enumerate()
            .map(|(index, cells)| {
                if cells.len() != header.len() {
                    return Err(RowsError::UnevenRow {
                        row_number: index + 2,
                        expected: header.len(),
                        actual: cells.len(),
                    });
                }
                Ok(header.iter().cloned().zip(cells).collect::<ExpectedRow>())
            })
            .collect()
    }
}
