//! Classification of reference expressions.
//!
//! A reference expression is either a literal string, used verbatim, or a
//! braced expression `{…}`. The braced form is classified in a fixed order:
//! `null`, then the booleans, then numeric literals, and finally property
//! paths. Numeric literals include the spellings `NaN`, `Infinity` and
//! `-Infinity`, matched case-sensitively.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::PathError;
use crate::lexer::PropertyPath;

static NUMERIC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?|NaN|[+-]?Infinity)$")
        .unwrap_or_else(|_| unreachable!("numeric literal regex is valid"))
});

/// A classified reference expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'a> {
    /// Unbraced text used verbatim.
    Literal(&'a str),
    /// `{null}`.
    Null,
    /// `{true}` or `{false}`.
    Bool(bool),
    /// A numeric literal such as `{42}` or `{-1.5e3}`, always a 64-bit float.
    Number(f64),
    /// Any other braced content, parsed as a property path.
    Path(PropertyPath),
}

/// Return the text between the braces of a braced expression.
///
/// # Examples
///
/// ```
/// use propsworld_path::braced_inner;
///
/// assert_eq!(braced_inner("{a.b}"), Some("a.b"));
/// assert_eq!(braced_inner("a.b"), None);
/// assert_eq!(braced_inner("{"), None);
/// ```
#[must_use]
pub fn braced_inner(expr: &str) -> Option<&str> {
    expr.strip_prefix('{')?.strip_suffix('}')
}

/// Returns `true` when `text` is a decimal or exponent numeric literal, or
/// one of `NaN`, `Infinity`, `+Infinity` and `-Infinity`.
#[must_use]
pub fn is_numeric_literal(text: &str) -> bool {
    NUMERIC_LITERAL.is_match(text)
}

/// Classify a reference expression.
///
/// # Errors
///
/// Returns [`PathError`] when a braced expression falls through to path
/// parsing and the path is malformed.
///
/// # Examples
///
/// ```
/// use propsworld_path::{Expression, parse_expression};
///
/// assert_eq!(parse_expression("plain").ok(), Some(Expression::Literal("plain")));
/// assert_eq!(parse_expression("{null}").ok(), Some(Expression::Null));
/// assert_eq!(parse_expression("{2.5}").ok(), Some(Expression::Number(2.5)));
/// assert!(matches!(parse_expression("{a.b}"), Ok(Expression::Path(_))));
/// ```
pub fn parse_expression(expr: &str) -> Result<Expression<'_>, PathError> {
    let Some(inner) = braced_inner(expr) else {
        return Ok(Expression::Literal(expr));
    };
    match inner {
        "null" => Ok(Expression::Null),
        "true" => Ok(Expression::Bool(true)),
        "false" => Ok(Expression::Bool(false)),
        numeric if is_numeric_literal(numeric) => Ok(numeric
            .parse::<f64>()
            .map_or_else(|_| Expression::Literal(expr), Expression::Number)),
        path => PropertyPath::parse(path).map(Expression::Path),
    }
}
