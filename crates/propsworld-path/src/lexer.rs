//! Property path lexer splitting dotted paths into navigable segments.

use std::fmt;

use crate::errors::{PathError, PathErrorKind};

/// Trailing pseudo-segment requesting the cardinality of the preceding path.
const LENGTH_SEGMENT: &str = "length";

/// One dot-separated step of a [`PropertyPath`].
///
/// A segment names a field and may carry any number of zero-based indices,
/// so `rows[1][0]` addresses the first element of the second element of the
/// sequence bound to `rows`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    name: String,
    indices: Vec<usize>,
}

impl Segment {
    /// Construct a segment from a field name and its indices.
    #[must_use]
    pub fn new(name: impl Into<String>, indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            indices,
        }
    }

    /// Field name addressed by this segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based indices applied after the field lookup.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns `true` when the segment carries at least one index.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for index in &self.indices {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

/// A parsed dotted property path such as `orders[0].lines.length`.
///
/// A trailing `.length` is not kept as a segment; it sets
/// [`counts_length`](Self::counts_length) instead. A path consisting only of
/// `length` still names a field called `length`.
///
/// # Examples
///
/// ```
/// use propsworld_path::PropertyPath;
///
/// let path = PropertyPath::parse("orders[0].lines.length").expect("valid path");
/// assert_eq!(path.segments().len(), 2);
/// assert_eq!(path.segments()[0].indices(), &[0]);
/// assert!(path.counts_length());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<Segment>,
    counts_length: bool,
}

impl PropertyPath {
    /// Parse a dotted path.
    ///
    /// Dots always separate segments; there is no escaping for field names
    /// that contain `.`, `[` or `]`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for empty paths, empty segments, and
    /// malformed or overflowing indices.
    pub fn parse(source: &str) -> Result<Self, PathError> {
        if source.is_empty() {
            return Err(PathError::new(PathErrorKind::EmptyPath, 0, source));
        }
        let mut segments = Vec::new();
        let mut offset = 0;
        for raw in source.split('.') {
            segments.push(lex_segment(raw, offset, source)?);
            offset += raw.len() + 1;
        }
        let counts_length = segments.len() > 1
            && segments
                .last()
                .is_some_and(|last| last.name == LENGTH_SEGMENT && !last.is_indexed());
        if counts_length {
            segments.pop();
        }
        Ok(Self {
            segments,
            counts_length,
        })
    }

    /// Segments to navigate, excluding any trailing `.length`.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` when the path ended in `.length`.
    #[must_use]
    pub fn counts_length(&self) -> bool {
        self.counts_length
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            write!(f, "{segment}")?;
        }
        if self.counts_length {
            write!(f, ".{LENGTH_SEGMENT}")?;
        }
        Ok(())
    }
}

fn lex_segment(raw: &str, offset: usize, source: &str) -> Result<Segment, PathError> {
    let bytes = raw.as_bytes();
    let name_end = raw.find('[').unwrap_or(raw.len());
    let name = raw.get(..name_end).unwrap_or_default();
    if name.is_empty() {
        return Err(PathError::new(PathErrorKind::EmptySegment, offset, source));
    }
    if let Some(stray) = name.find(']') {
        return Err(PathError::new(PathErrorKind::StrayClosingBracket, offset + stray, source));
    }

    let mut indices = Vec::new();
    let mut pos = name_end;
    while pos < bytes.len() {
        if bytes.get(pos) != Some(&b'[') {
            return Err(PathError::new(PathErrorKind::MissingOpeningBracket, offset + pos, source));
        }
        let digits_start = pos + 1;
        let mut end = digits_start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end == digits_start {
            return Err(PathError::new(
                PathErrorKind::MissingIndexDigits,
                offset + digits_start,
                source,
            ));
        }
        if bytes.get(end) != Some(&b']') {
            return Err(PathError::new(PathErrorKind::UnterminatedIndex, offset + end, source));
        }
        let index = raw
            .get(digits_start..end)
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| {
                PathError::new(PathErrorKind::IndexOverflow, offset + digits_start, source)
            })?;
        indices.push(index);
        pos = end + 1;
    }

    Ok(Segment::new(name, indices))
}
