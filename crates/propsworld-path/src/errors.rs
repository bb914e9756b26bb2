//! Syntax errors raised by [`PropertyPath::parse`](crate::PropertyPath::parse).

use std::fmt;

use thiserror::Error;

/// What made a property path malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PathErrorKind {
    /// The braces held nothing.
    EmptyPath,
    /// Two dots in a row, or a dot at either end.
    EmptySegment,
    /// A `]` inside a field name.
    StrayClosingBracket,
    /// Text after an index that does not open another one.
    MissingOpeningBracket,
    /// `[` not followed by decimal digits.
    MissingIndexDigits,
    /// Index digits not closed by `]`.
    UnterminatedIndex,
    /// An index too large for `usize`.
    IndexOverflow,
}

impl fmt::Display for PathErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmptyPath => "empty path",
            Self::EmptySegment => "empty segment",
            Self::StrayClosingBracket => "unexpected `]`",
            Self::MissingOpeningBracket => "expected `[` after index",
            Self::MissingIndexDigits => "expected index digits",
            Self::UnterminatedIndex => "unterminated index",
            Self::IndexOverflow => "index out of range",
        })
    }
}

/// A malformed property path.
///
/// # Examples
///
/// ```
/// use propsworld_path::{PathErrorKind, PropertyPath};
///
/// let Err(err) = PropertyPath::parse("orders..total") else {
///     panic!("double dot is malformed");
/// };
/// assert_eq!(err.kind(), PathErrorKind::EmptySegment);
/// assert_eq!(err.position(), 7);
/// assert_eq!(err.to_string(), "empty segment at byte 7 of `orders..total`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {position} of `{path}`")]
pub struct PathError {
    kind: PathErrorKind,
    position: usize,
    path: String,
}

impl PathError {
    pub(crate) fn new(kind: PathErrorKind, position: usize, path: &str) -> Self {
        Self {
            kind,
            position,
            path: path.to_owned(),
        }
    }

    /// The kind of mistake.
    #[must_use]
    pub fn kind(&self) -> PathErrorKind {
        self.kind
    }

    /// Zero-based byte offset of the mistake within [`path`](Self::path).
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The path text that failed to parse, without braces.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_kind_offset_and_path() {
        let err = PathError::new(PathErrorKind::UnterminatedIndex, 7, "items[3");
        assert_eq!(err.to_string(), "unterminated index at byte 7 of `items[3`");
        assert_eq!(err.position(), 7);
        assert_eq!(err.path(), "items[3");
    }
}
