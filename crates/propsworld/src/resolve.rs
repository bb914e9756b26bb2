//! Reference resolution against the scenario store or any value.
//!
//! A reference expression that is not wrapped in braces resolves to itself as
//! text. Braced expressions denote `null`, a boolean, a numeric literal, or a
//! property path looked up in a [`Scope`]. Path results that are numeric come
//! back as the decimal text of the value rounded half-up, so `{order.total}`
//! bound to `19.5` resolves to `"20"`.

use log::debug;
use propsworld_path::{Expression, PathError, PropertyPath, parse_expression};
use thiserror::Error;

use crate::failure::{Failure, FailureKind};
use crate::store::Store;
use crate::value::{Record, Value};

/// Errors raised while resolving a reference expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The braced expression was not a valid property path.
    #[error("cannot resolve `{expr}`: {source}")]
    Path {
        /// Expression as written in the step.
        expr: String,
        /// Underlying syntax error.
        #[source]
        source: PathError,
    },
}

impl From<ResolveError> for Failure {
    fn from(err: ResolveError) -> Self {
        Self::from_error(FailureKind::Resolution, &err)
    }
}

/// Anything a property path can start from.
pub trait Scope {
    /// Value bound to the first segment of a path.
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl Scope for Store {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name)
    }
}

impl Scope for Value {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.field(name)
    }
}

impl Scope for Record {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Resolve `expr` against the scenario store.
///
/// # Errors
///
/// Returns [`ResolveError::Path`] when a braced path is malformed.
///
/// # Examples
///
/// ```
/// use propsworld::{Store, Value, resolve};
///
/// let store = Store::new();
/// store.set("user", Value::record([("name", "Alice")]));
///
/// assert_eq!(resolve("plain", &store).ok(), Some(Value::from("plain")));
/// assert_eq!(resolve("{user.name}", &store).ok(), Some(Value::from("Alice")));
/// assert_eq!(resolve("{user.missing}", &store).ok(), Some(Value::Null));
/// assert_eq!(resolve("{7}", &store).ok(), Some(Value::Number(7.0)));
/// ```
pub fn resolve(expr: &str, store: &Store) -> Result<Value, ResolveError> {
    resolve_in(expr, store)
}

/// Resolve `expr` against an arbitrary scope.
///
/// # Errors
///
/// Returns [`ResolveError::Path`] when a braced path is malformed.
pub fn resolve_in<S: Scope + ?Sized>(expr: &str, scope: &S) -> Result<Value, ResolveError> {
    let expression = parse_expression(expr).map_err(|source| ResolveError::Path {
        expr: expr.to_owned(),
        source,
    })?;
    Ok(match expression {
        Expression::Literal(text) => Value::Text(text.to_owned()),
        Expression::Null => Value::Null,
        Expression::Bool(flag) => Value::Bool(flag),
        Expression::Number(number) => Value::Number(number),
        Expression::Path(path) => lookup_path(&path, scope),
    })
}

/// Follow `path` through `scope`.
///
/// Missing fields, out-of-range indices and indexing into non-sequences all
/// yield `Null`.
pub fn lookup_path<S: Scope + ?Sized>(path: &PropertyPath, scope: &S) -> Value {
    let walk = Walk::along(path, scope);
    if path.counts_length() {
        return Value::Text(walk.cardinality().to_string());
    }
    match walk.value {
        Some(Value::Integer(n)) => Value::Text(n.to_string()),
        Some(Value::Number(n)) => Value::Text(round_half_up(n).to_string()),
        Some(value) => value,
        None => {
            debug!("path `{path}` did not resolve to a value");
            Value::Null
        }
    }
}

/// Result of following a path.
#[derive(Default)]
struct Walk {
    value: Option<Value>,
    /// Sequence the final index was applied to, when the last segment is
    /// indexed.
    container: Option<Value>,
}

impl Walk {
    fn along<S: Scope + ?Sized>(path: &PropertyPath, scope: &S) -> Self {
        let mut walk = Self::default();
        for (position, segment) in path.segments().iter().enumerate() {
            walk.value = if position == 0 {
                scope.lookup(segment.name())
            } else {
                walk.value
                    .as_ref()
                    .and_then(|value| value.field(segment.name()))
            };
            walk.container = None;
            for &index in segment.indices() {
                let element = walk
                    .value
                    .as_ref()
                    .and_then(Value::as_sequence)
                    .and_then(|items| items.get(index))
                    .cloned();
                walk.container = walk.value.take();
                walk.value = element;
            }
        }
        walk
    }

    /// Number of elements denoted by a trailing `.length`.
    ///
    /// A sequence counts its elements. When the path ends in an index whose
    /// element is not a sequence, the indexed sequence is counted instead.
    /// Absent values count as zero and any other value as one.
    fn cardinality(&self) -> usize {
        match (&self.value, &self.container) {
            (Some(Value::Sequence(items)), _) | (_, Some(Value::Sequence(items))) => items.len(),
            (None | Some(Value::Null), _) => 0,
            (Some(_), _) => 1,
        }
    }
}

/// Round to the nearest integer with ties toward positive infinity.
///
/// Out-of-range values saturate and `NaN` becomes zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating float to integer conversion is intended"
)]
pub(crate) fn round_half_up(number: f64) -> i64 {
    let negative_tie = number.is_sign_negative() && number.fract().abs().total_cmp(&0.5).is_eq();
    let rounded = if negative_tie {
        number.ceil()
    } else {
        number.round()
    };
    rounded as i64
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests resolve well-formed expressions")]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn store() -> Store {
        let store = Store::new();
        store.set(
            "a",
            Value::from(json!({"b": [{"c": 1}, {"c": 2}, {"c": 3}], "name": "alpha"})),
        );
        store.set("price", 19.5);
        store.set("count", 4);
        store.set("words", Value::sequence(["x", "y"]));
        store.set("grid", Value::from(json!([[1, 2], [3, 4, 5]])));
        store
    }

    #[rstest]
    #[case("hello")]
    #[case("")]
    #[case("a.b")]
    #[case("{unbalanced")]
    fn literals_resolve_to_themselves(store: Store, #[case] expr: &str) {
        assert_eq!(resolve(expr, &store).unwrap(), Value::from(expr));
    }

    #[rstest]
    #[case("{null}", Value::Null)]
    #[case("{true}", Value::Bool(true))]
    #[case("{false}", Value::Bool(false))]
    #[case("{42}", Value::Number(42.0))]
    #[case("{-0.5}", Value::Number(-0.5))]
    #[case("{Infinity}", Value::Number(f64::INFINITY))]
    #[case("{-Infinity}", Value::Number(f64::NEG_INFINITY))]
    fn keywords_and_numbers(store: Store, #[case] expr: &str, #[case] expected: Value) {
        assert_eq!(resolve(expr, &store).unwrap(), expected);
    }

    #[rstest]
    #[case("{a.name}", "alpha")]
    #[case("{a.b[1].c}", "2")]
    #[case("{a.b.length}", "3")]
    #[case("{a.b[0].length}", "3")]
    #[case("{words[1]}", "y")]
    #[case("{words.length}", "2")]
    #[case("{grid[1][2]}", "5")]
    #[case("{grid[1].length}", "3")]
    #[case("{price}", "20")]
    #[case("{count}", "4")]
    fn paths_resolve_through_records_and_sequences(
        store: Store,
        #[case] expr: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve(expr, &store).unwrap(), Value::from(expected));
    }

    #[rstest]
    #[case("{missing}")]
    #[case("{a.missing.deeper}")]
    #[case("{a.b[9].c}")]
    #[case("{a.name[0]}")]
    fn unresolvable_paths_are_null(store: Store, #[case] expr: &str) {
        assert_eq!(resolve(expr, &store).unwrap(), Value::Null);
    }

    #[rstest]
    fn length_of_missing_or_scalar(store: Store) {
        assert_eq!(resolve("{missing.length}", &store).unwrap(), Value::from("0"));
        assert_eq!(resolve("{a.name.length}", &store).unwrap(), Value::from("1"));
    }

    #[rstest]
    fn malformed_paths_are_errors(store: Store) {
        let err = resolve("{a..b}", &store).unwrap_err();
        assert!(matches!(err, ResolveError::Path { ref expr, .. } if expr == "{a..b}"));
    }

    #[rstest]
    fn resolution_errors_become_failures(store: Store) {
        let failure = Failure::from(resolve("{a[1}", &store).unwrap_err());
        assert_eq!(failure.kind(), FailureKind::Resolution);
        assert!(failure.root_message().contains("unterminated index"));
    }

    #[rstest]
    fn non_numeric_values_come_back_unchanged(store: Store) {
        let expected = store.get("a").unwrap();
        assert_eq!(resolve("{a}", &store).unwrap(), expected);
        assert_eq!(resolve("{a}", &store).unwrap(), resolve("{a}", &store).unwrap());
    }

    #[test]
    fn value_scopes_navigate_failures() {
        let failure = Value::Failure(
            crate::Failure::raised("wrapper").caused_by(crate::Failure::raised("root")),
        );
        assert_eq!(
            resolve_in("{cause.message}", &failure).unwrap(),
            Value::from("root")
        );
    }

    #[rstest]
    #[case(2.5, 3)]
    #[case(2.4, 2)]
    #[case(-2.5, -2)]
    #[case(-2.6, -3)]
    #[case(0.0, 0)]
    #[case(f64::NAN, 0)]
    #[case(1e300, i64::MAX)]
    fn rounds_half_up(#[case] number: f64, #[case] expected: i64) {
        assert_eq!(round_half_up(number), expected);
    }
}
