//! Assertion steps over resolved values.
//!
//! Every assertion takes the subject as a reference expression, resolves it
//! against the store and reports a mismatch as an [`AssertionError`] naming
//! the expression.

use std::num::FpCategory;

use thiserror::Error;

use super::World;
use crate::matching::{self, MatchError};
use crate::resolve::ResolveError;
use crate::rows::ExpectedRow;
use crate::value::Value;

/// Failed assertion.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AssertionError {
    /// The subject did not have the expected shape or value.
    #[error("`{subject}`: expected {expected}, found {actual}")]
    Unexpected {
        /// Expression that was checked.
        subject: String,
        /// What the assertion required.
        expected: String,
        /// What the subject resolved to.
        actual: String,
    },
    /// A numeric comparison met text that is not a number.
    #[error("`{subject}`: '{text}' is not a number")]
    NotNumeric {
        /// Expression that was checked.
        subject: String,
        /// Text that failed to parse.
        text: String,
    },
    /// Row matching failed.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// An expression could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

fn unexpected(subject: &str, expected: impl Into<String>, actual: &Value) -> AssertionError {
    AssertionError::Unexpected {
        subject: subject.to_owned(),
        expected: expected.into(),
        actual: describe(actual),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Text(text) => format!("'{text}'"),
        other => format!("{} {other}", other.type_name()),
    }
}

fn is_zero(number: f64) -> bool {
    number.classify() == FpCategory::Zero
}

/// Loose truthiness used by the true/false assertions.
///
/// `Null` is false and booleans are themselves. Numbers are true unless zero.
/// Text is false when empty, when it parses as a zero number, or when it
/// reads `false` or `null` in any case. Every other value is true.
///
/// # Examples
///
/// ```
/// use propsworld::{Value, is_truthy};
///
/// assert!(is_truthy(&Value::from("yes")));
/// assert!(!is_truthy(&Value::from("0.0")));
/// assert!(!is_truthy(&Value::from("FALSE")));
/// assert!(!is_truthy(&Value::Null));
/// ```
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Integer(n) => *n != 0,
        Value::Number(n) => !is_zero(*n),
        Value::Text(text) => {
            if text.is_empty() {
                return false;
            }
            text.trim().parse::<f64>().map_or_else(
                |_| !text.eq_ignore_ascii_case("false") && !text.eq_ignore_ascii_case("null"),
                |n| !is_zero(n),
            )
        }
        Value::Sequence(_) | Value::Record(_) | Value::Failure(_) | Value::Callable(_) => true,
    }
}

impl World {
    fn numeric(&self, expr: &str) -> Result<f64, AssertionError> {
        let text = self.resolve(expr)?.to_string();
        text.trim()
            .parse()
            .map_err(|_| AssertionError::NotNumeric {
                subject: expr.to_owned(),
                text,
            })
    }

    fn check(
        &self,
        field: &str,
        expected: &str,
        holds: impl FnOnce(&Value) -> bool,
    ) -> Result<(), AssertionError> {
        let actual = self.resolve(field)?;
        if holds(&actual) {
            Ok(())
        } else {
            Err(unexpected(field, expected, &actual))
        }
    }

    /// Assert that `field` resolves to `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_null(&self, field: &str) -> Result<(), AssertionError> {
        self.check(field, "null", Value::is_null)
    }

    /// Assert that `field` resolves to anything but `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_not_null(&self, field: &str) -> Result<(), AssertionError> {
        self.check(field, "a value", |value| !value.is_null())
    }

    /// Assert that `field` is truthy, see [`is_truthy`].
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_true(&self, field: &str) -> Result<(), AssertionError> {
        self.check(field, "a true value", is_truthy)
    }

    /// Assert that `field` is not truthy.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_false(&self, field: &str) -> Result<(), AssertionError> {
        self.check(field, "a false value", |value| !is_truthy(value))
    }

    /// Assert that `field` is an empty sequence, empty text or `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] for non-empty values and for values that
    /// cannot be empty.
    pub fn assert_empty(&self, field: &str) -> Result<(), AssertionError> {
        self.check(field, "an empty sequence or text", |value| match value {
            Value::Null => true,
            Value::Sequence(items) => items.is_empty(),
            Value::Text(text) => text.is_empty(),
            _ => false,
        })
    }

    /// Assert that `field` holds a failure.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_error(&self, field: &str) -> Result<(), AssertionError> {
        self.check(field, "a failure", Value::is_failure)
    }

    /// Assert that `field` holds anything but a failure.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_not_error(&self, field: &str) -> Result<(), AssertionError> {
        self.check(field, "no failure", |value| !value.is_failure())
    }

    /// Assert that `field` holds a failure whose root cause reads `message`.
    ///
    /// `message` is compared as written, without resolution.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_error_with_message(
        &self,
        field: &str,
        message: &str,
    ) -> Result<(), AssertionError> {
        self.check(field, format!("a failure caused by '{message}'").as_str(), |value| {
            value
                .as_failure()
                .is_some_and(|failure| failure.root_message() == message)
        })
    }

    /// Assert that `field` and `expected` resolve to values that print the
    /// same.
    ///
    /// `Null` prints as `null`, so it equals the literal text `null` here.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_equals(&self, field: &str, expected: &str) -> Result<(), AssertionError> {
        let wanted = self.resolve(expected)?.to_string();
        self.check(field, format!("'{wanted}'").as_str(), |actual| {
            actual.to_string() == wanted
        })
    }

    /// Assert that the printed form of `field` contains `substring`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_contains(&self, field: &str, substring: &str) -> Result<(), AssertionError> {
        self.check(field, format!("text containing '{substring}'").as_str(), |actual| {
            actual.to_string().contains(substring)
        })
    }

    /// Assert that the printed form of `field` contains at least one of
    /// `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError`] when the assertion does not hold.
    pub fn assert_contains_one_of(
        &self,
        field: &str,
        candidates: &[&str],
    ) -> Result<(), AssertionError> {
        let expected = format!("text containing one of {candidates:?}");
        self.check(field, expected.as_str(), |actual| {
            let text = actual.to_string();
            candidates.iter().any(|candidate| text.contains(candidate))
        })
    }

    /// Assert that `field` is numerically greater than `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::NotNumeric`] when either side does not
    /// parse as a number, and [`AssertionError::Unexpected`] when the
    /// comparison fails.
    pub fn assert_greater_than(&self, field: &str, threshold: &str) -> Result<(), AssertionError> {
        let limit = self.numeric(threshold)?;
        let actual = self.numeric(field)?;
        if actual > limit {
            Ok(())
        } else {
            Err(unexpected(
                field,
                format!("a number greater than {limit}"),
                &Value::Number(actual),
            ))
        }
    }

    /// Assert that `field` is numerically less than `threshold`.
    ///
    /// # Errors
    ///
    /// As for [`World::assert_greater_than`].
    pub fn assert_less_than(&self, field: &str, threshold: &str) -> Result<(), AssertionError> {
        let limit = self.numeric(threshold)?;
        let actual = self.numeric(field)?;
        if actual < limit {
            Ok(())
        } else {
            Err(unexpected(
                field,
                format!("a number less than {limit}"),
                &Value::Number(actual),
            ))
        }
    }

    /// Assert that `field` matches `rows` exactly and in order.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::Match`] describing the mismatch.
    pub fn assert_array_contents(
        &self,
        field: &str,
        rows: &[ExpectedRow],
    ) -> Result<(), AssertionError> {
        let actual = self.resolve(field)?;
        Ok(matching::match_exact(&actual, rows, &self.store)?)
    }

    /// Assert that every row in `rows` matches some element of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::Match`] naming the first missing row.
    pub fn assert_array_at_least(
        &self,
        field: &str,
        rows: &[ExpectedRow],
    ) -> Result<(), AssertionError> {
        let actual = self.resolve(field)?;
        Ok(matching::match_at_least(&actual, rows, &self.store)?)
    }

    /// Assert that no row in `rows` matches any element of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::Match`] naming the first unwanted row.
    pub fn assert_array_excludes(
        &self,
        field: &str,
        rows: &[ExpectedRow],
    ) -> Result<(), AssertionError> {
        let actual = self.resolve(field)?;
        Ok(matching::match_excludes(&actual, rows, &self.store)?)
    }

    /// Assert that `field` has as many elements as `length` resolves to.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::NotNumeric`] when `length` is not a whole
    /// number and [`AssertionError::Unexpected`] on a different count.
    pub fn assert_array_length(&self, field: &str, length: &str) -> Result<(), AssertionError> {
        let text = self.resolve(length)?.to_string();
        let wanted: usize = text
            .trim()
            .parse()
            .map_err(|_| AssertionError::NotNumeric {
                subject: length.to_owned(),
                text,
            })?;
        let actual = self.resolve(field)?;
        let found = matching::records_of(&actual)?.len();
        if found == wanted {
            Ok(())
        } else {
            Err(unexpected(
                field,
                format!("{wanted} element(s)"),
                &Value::from(format!("{found} element(s)")),
            ))
        }
    }

    /// Assert that `field` is a sequence whose elements, read as the column
    /// `value`, match `rows` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::Match`] describing the mismatch.
    pub fn assert_string_array_values(
        &self,
        field: &str,
        rows: &[ExpectedRow],
    ) -> Result<(), AssertionError> {
        let actual = self.resolve(field)?;
        let wrapped = Value::sequence(
            matching::records_of(&actual)?
                .iter()
                .map(|item| Value::record([("value", item.clone())])),
        );
        Ok(matching::match_exact(&wrapped, rows, &self.store)?)
    }

    /// Assert that the single record at `field` matches the first of `rows`.
    ///
    /// An empty table holds trivially.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::Match`] when the record does not match.
    pub fn assert_object_contents(
        &self,
        field: &str,
        rows: &[ExpectedRow],
    ) -> Result<(), AssertionError> {
        let Some(row) = rows.first() else {
            return Ok(());
        };
        let actual = self.resolve(field)?;
        if matching::row_matches(row, &actual, &self.store)? {
            Ok(())
        } else {
            Err(MatchError::MissingRow { row: row.clone() }.into())
        }
    }
}
