//! The dynamic value model shared by the store, the resolver and the invoker.
//!
//! [`Value`] is a closed set of variants. Scenario data, operation arguments,
//! operation results and captured failures are all represented with it, so
//! every component can pass values along without knowing where they came from.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Number as JsonNumber, Value as Json};

use crate::failure::Failure;
use crate::invoke::Callable;

/// Ordered field map backing [`Value::Record`].
pub type Record = IndexMap<String, Value>;

/// A dynamically typed scenario value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integral number.
    Integer(i64),
    /// A floating point number.
    Number(f64),
    /// A string.
    Text(String),
    /// An ordered list of values.
    Sequence(Vec<Value>),
    /// Named fields in insertion order.
    Record(Record),
    /// A captured failure.
    Failure(Failure),
    /// Something that can be invoked.
    Callable(Callable),
}

impl Value {
    /// Build a record from field/value pairs, keeping their order.
    ///
    /// # Examples
    ///
    /// ```
    /// use propsworld::Value;
    ///
    /// let person = Value::record([("name", Value::from("Alice")), ("age", Value::from(30))]);
    /// assert_eq!(person.field("name"), Some(Value::from("Alice")));
    /// ```
    #[must_use]
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Record(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Build a sequence from anything convertible into values.
    #[must_use]
    pub fn sequence<V: Into<Self>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Short lower-case name of the variant, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Record(_) => "record",
            Self::Failure(_) => "failure",
            Self::Callable(_) => "callable",
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for [`Value::Failure`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "integers are widened for numeric comparison only"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integral payload. Floating values are truncated toward zero.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation toward zero is the documented conversion"
    )]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Number(n) => Some(*n as i64),
            _ => None,
        }
    }

    /// The string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The sequence payload, if any.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The record payload, if any.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// The failure payload, if any.
    #[must_use]
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// The callable payload, if any.
    #[must_use]
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    /// Look up a named field.
    ///
    /// Records expose their fields. Failures expose `message`, `kind` and
    /// `cause`; a failure without a cause reports `Null` for it. Every other
    /// variant has no fields.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Self> {
        match self {
            Self::Record(fields) => fields.get(name).cloned(),
            Self::Failure(failure) => match name {
                "message" => Some(Self::Text(failure.message().to_owned())),
                "kind" => Some(Self::Text(failure.kind().as_str().to_owned())),
                "cause" => Some(
                    failure
                        .cause()
                        .map_or(Self::Null, |cause| Self::Failure(cause.clone())),
                ),
                _ => None,
            },
            _ => None,
        }
    }

    /// Text used when comparing values for equality in assertions and row
    /// matching. `Null` has no text.
    ///
    /// # Examples
    ///
    /// ```
    /// use propsworld::Value;
    ///
    /// assert_eq!(Value::from(200).display_text().as_deref(), Some("200"));
    /// assert_eq!(Value::from(200.0).display_text().as_deref(), Some("200"));
    /// assert_eq!(Value::Null.display_text(), None);
    /// ```
    #[must_use]
    pub fn display_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Text(text) => Some(text.clone()),
            Self::Sequence(_) | Self::Record(_) => Some(self.to_json().to_string()),
            Self::Failure(failure) => Some(failure.message().to_owned()),
            Self::Callable(callable) => Some(format!("<callable {}>", callable.label())),
        }
    }

    /// Convert to JSON for diagnostics.
    ///
    /// Non-finite numbers, failures and callables have no JSON form and are
    /// rendered as strings.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(flag) => Json::Bool(*flag),
            Self::Integer(n) => Json::Number(JsonNumber::from(*n)),
            Self::Number(n) => {
                JsonNumber::from_f64(*n).map_or_else(|| Json::String(n.to_string()), Json::Number)
            }
            Self::Text(text) => Json::String(text.clone()),
            Self::Sequence(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Record(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Self::Failure(failure) => {
                let mut object = Map::new();
                object.insert("failure".into(), Json::String(failure.message().to_owned()));
                object.insert("kind".into(), Json::String(failure.kind().as_str().to_owned()));
                Json::Object(object)
            }
            Self::Callable(callable) => Json::String(format!("<callable {}>", callable.label())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text().as_deref().unwrap_or("null"))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::sequence(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Failure> for Value {
    fn from(value: Failure) -> Self {
        Self::Failure(value)
    }
}

impl From<Callable> for Value {
    fn from(value: Callable) -> Self {
        Self::Callable(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Result<Self, Failure>> for Value {
    fn from(outcome: Result<Self, Failure>) -> Self {
        outcome.unwrap_or_else(Self::Failure)
    }
}

impl From<Json> for Value {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => Self::Null,
            Json::Bool(flag) => Self::Bool(flag),
            Json::Number(n) => n.as_i64().map_or_else(
                || Self::Number(n.as_f64().unwrap_or(f64::NAN)),
                Self::Integer,
            ),
            Json::String(text) => Self::Text(text),
            Json::Array(items) => Self::sequence(items),
            Json::Object(fields) => Self::record(fields),
        }
    }
}
