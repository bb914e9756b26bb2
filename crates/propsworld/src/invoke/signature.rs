//! Parameter types and the specificity ordering used for overload selection.

use std::fmt;

use crate::value::Value;

/// Runtime type of a value as seen by overload selection.
///
/// `Any` sits above everything and `Number` above `Integer` and `Float`. All
/// other kinds are unrelated leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Accepts every value.
    Any,
    /// Integral or floating numbers.
    Number,
    /// Integral numbers.
    Integer,
    /// Floating numbers.
    Float,
    /// Booleans.
    Boolean,
    /// Strings.
    Text,
    /// Sequences.
    Sequence,
    /// Records.
    Record,
    /// Callables.
    Callable,
    /// Captured failures.
    Failure,
}

impl TypeKind {
    /// Kind of a runtime value; `Null` has none.
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Boolean),
            Value::Integer(_) => Some(Self::Integer),
            Value::Number(_) => Some(Self::Float),
            Value::Text(_) => Some(Self::Text),
            Value::Sequence(_) => Some(Self::Sequence),
            Value::Record(_) => Some(Self::Record),
            Value::Failure(_) => Some(Self::Failure),
            Value::Callable(_) => Some(Self::Callable),
        }
    }

    /// Returns `true` when every value of `self` is also a value of `other`.
    #[must_use]
    pub fn is_subtype_of(self, other: Self) -> bool {
        self == other
            || other == Self::Any
            || (other == Self::Number && matches!(self, Self::Integer | Self::Float))
    }

    fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Sequence => "sequence",
            Self::Record => "record",
            Self::Callable => "callable",
            Self::Failure => "failure",
        }
    }
}

/// Declared type of one operation parameter.
///
/// A primitive parameter rejects `Null` and is considered narrower than the
/// non-primitive parameter of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamType {
    kind: TypeKind,
    primitive: bool,
}

impl ParamType {
    /// Accepts anything, including `Null`.
    pub const ANY: Self = Self::of(TypeKind::Any);
    /// Any number or `Null`.
    pub const NUMBER: Self = Self::of(TypeKind::Number);
    /// An integer or `Null`.
    pub const INTEGER: Self = Self::of(TypeKind::Integer);
    /// A float or `Null`.
    pub const FLOAT: Self = Self::of(TypeKind::Float);
    /// A boolean or `Null`.
    pub const BOOLEAN: Self = Self::of(TypeKind::Boolean);
    /// A string or `Null`.
    pub const TEXT: Self = Self::of(TypeKind::Text);
    /// A sequence or `Null`.
    pub const SEQUENCE: Self = Self::of(TypeKind::Sequence);
    /// A record or `Null`.
    pub const RECORD: Self = Self::of(TypeKind::Record);
    /// A callable or `Null`.
    pub const CALLABLE: Self = Self::of(TypeKind::Callable);
    /// A failure or `Null`.
    pub const FAILURE: Self = Self::of(TypeKind::Failure);

    /// Non-primitive parameter of `kind`.
    #[must_use]
    pub const fn of(kind: TypeKind) -> Self {
        Self {
            kind,
            primitive: false,
        }
    }

    /// The primitive form of this parameter.
    #[must_use]
    pub const fn primitive(self) -> Self {
        Self {
            kind: self.kind,
            primitive: true,
        }
    }

    /// Declared kind.
    #[must_use]
    pub fn kind(self) -> TypeKind {
        self.kind
    }

    /// Returns `true` for primitive parameters.
    #[must_use]
    pub fn is_primitive(self) -> bool {
        self.primitive
    }

    /// Returns `true` when `value` may be passed for this parameter.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        TypeKind::of(value).map_or(!self.primitive, |kind| kind.is_subtype_of(self.kind))
    }

    /// Returns `true` when `self` is the same type as `other` or narrower.
    #[must_use]
    pub fn narrows(self, other: Self) -> bool {
        if self.kind == other.kind {
            self.primitive || !other.primitive
        } else {
            self.kind.is_subtype_of(other.kind)
        }
    }

    /// Returns `true` when `self` is strictly narrower than `other`.
    #[must_use]
    pub fn strictly_narrows(self, other: Self) -> bool {
        self != other && self.narrows(other)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primitive {
            write!(f, "{}!", self.kind.name())
        } else {
            f.write_str(self.kind.name())
        }
    }
}

/// Name and parameter list of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    params: Vec<ParamType>,
}

impl Signature {
    /// Construct a signature.
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<ParamType>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types.
    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` when `args` match the arity and every parameter type.
    #[must_use]
    pub fn accepts(&self, args: &[Value]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| param.accepts(arg))
    }

    /// Returns `true` when `self` should replace `other` as the best match.
    ///
    /// Every parameter must be the same or narrower and at least one strictly
    /// narrower. Signatures of different arity are never compared.
    #[must_use]
    pub fn is_more_specific_than(&self, other: &Self) -> bool {
        let pairs = || self.params.iter().zip(&other.params);
        self.params.len() == other.params.len()
            && pairs().all(|(mine, theirs)| mine.narrows(*theirs))
            && pairs().any(|(mine, theirs)| mine.strictly_narrows(*theirs))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (position, param) in self.params.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}
