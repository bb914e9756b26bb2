//! First-class failure values.
//!
//! A [`Failure`] is what an operation, a deferred result, or a task leaves
//! behind when it does not produce a value. Failures are stored in the scenario
//! store like any other value so that later steps can assert on them; they are
//! never used to unwind past a step boundary.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Classification of a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FailureKind {
    /// The invoked operation reported an error.
    Raised,
    /// A bounded wait elapsed before the deferred result settled.
    Timeout,
    /// No overload accepted the supplied arguments.
    NoMatchingOperation,
    /// The invocation target is not callable.
    NotCallable,
    /// The operation panicked.
    Panicked,
    /// A reference expression could not be parsed.
    Resolution,
    /// Deferred work ended without reporting an outcome.
    Abandoned,
}

impl FailureKind {
    /// Stable lower-case label used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raised => "raised",
            Self::Timeout => "timeout",
            Self::NoMatchingOperation => "no-matching-operation",
            Self::NotCallable => "not-callable",
            Self::Panicked => "panicked",
            Self::Resolution => "resolution",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured failure with an optional chain of causes.
///
/// # Examples
///
/// ```
/// use propsworld::{Failure, FailureKind};
///
/// let root = Failure::raised("connection refused");
/// let wrapped = Failure::raised("could not load account").caused_by(root);
/// assert_eq!(wrapped.message(), "could not load account");
/// assert_eq!(wrapped.root_message(), "connection refused");
/// assert_eq!(wrapped.kind(), FailureKind::Raised);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    kind: FailureKind,
    message: String,
    cause: Option<Arc<Failure>>,
}

impl Failure {
    /// Construct a failure of the given kind.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// An error reported by an invoked operation.
    #[must_use]
    pub fn raised(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Raised, message)
    }

    /// A bounded wait that elapsed after `timeout`.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            FailureKind::Timeout,
            format!("timed out after {}ms", timeout.as_millis()),
        )
    }

    /// No overload named `name` accepted `arity` arguments.
    #[must_use]
    pub fn no_matching_operation(name: &str, arity: usize) -> Self {
        let noun = if arity == 1 { "argument" } else { "arguments" };
        Self::new(
            FailureKind::NoMatchingOperation,
            format!("no operation `{name}` accepts {arity} {noun} of the given types"),
        )
    }

    /// The target of an invocation is not callable.
    #[must_use]
    pub fn not_callable(type_name: &str) -> Self {
        Self::new(
            FailureKind::NotCallable,
            format!("cannot invoke a {type_name} value"),
        )
    }

    /// The operation panicked with `message`.
    #[must_use]
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Panicked, message)
    }

    /// Deferred work ended without reporting an outcome.
    #[must_use]
    pub fn abandoned(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Abandoned, message)
    }

    /// Capture an error and its `source()` chain as nested failures.
    ///
    /// Every link keeps its own display message; the outermost error becomes
    /// the returned failure.
    #[must_use]
    pub fn from_error(kind: FailureKind, error: &(dyn StdError + 'static)) -> Self {
        let mut messages = vec![error.to_string()];
        let mut source = error.source();
        while let Some(next) = source {
            messages.push(next.to_string());
            source = next.source();
        }
        let mut chain = messages.into_iter().rev();
        let innermost = Self::new(kind, chain.next().unwrap_or_default());
        chain.fold(innermost, |cause, message| {
            Self::new(kind, message).caused_by(cause)
        })
    }

    /// Attach `cause` as the failure this one wraps.
    #[must_use]
    pub fn caused_by(mut self, cause: Self) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Classification of this failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Message of this link, ignoring any cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The directly wrapped failure, when present.
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    /// Walk the cause chain to its innermost link.
    ///
    /// The walk stops early if a link refers back to one already visited.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut visited: Vec<*const Self> = vec![std::ptr::from_ref(self)];
        let mut root = self;
        while let Some(next) = root.cause.as_deref() {
            let marker = std::ptr::from_ref(next);
            if visited.contains(&marker) {
                break;
            }
            visited.push(marker);
            root = next;
        }
        root
    }

    /// Message of the innermost failure in the cause chain.
    #[must_use]
    pub fn root_message(&self) -> &str {
        self.root_cause().message()
    }

    /// Returns `true` for failures produced by an elapsed wait.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}
