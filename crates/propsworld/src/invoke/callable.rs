//! Callables: named, typed operations backed by closures.

use std::fmt;
use std::sync::Arc;

use crate::deferred::Awaitable;
use crate::failure::Failure;
use crate::panic::catch_failure;
use crate::value::Value;

use super::signature::{ParamType, Signature};

/// Closure implementing an operation.
///
/// Arguments have already been checked against the operation's signature.
pub type OperationBody = Arc<dyn Fn(&[Value]) -> Result<Awaitable, Failure> + Send + Sync>;

/// One overload of a callable.
#[derive(Clone)]
pub struct Operation {
    signature: Signature,
    body: OperationBody,
}

impl Operation {
    /// Signature used for selection.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Run the body with panics captured.
    ///
    /// # Errors
    ///
    /// Returns the failure raised by the body, or a `Panicked` failure.
    pub fn call(&self, args: &[Value]) -> Result<Awaitable, Failure> {
        catch_failure(|| (self.body)(args))
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operation").field(&self.signature).finish()
    }
}

struct CallableInner {
    label: String,
    operations: Vec<Operation>,
}

/// A shareable set of operations, stored in scenarios as [`Value::Callable`].
///
/// Operation order matters: when two overloads are equally specific the one
/// registered first wins.
///
/// # Examples
///
/// ```
/// use propsworld::{Awaitable, Callable, ParamType, Value};
///
/// let greet = Callable::function("greet", [ParamType::TEXT], |args| {
///     let name = args.first().and_then(Value::as_str).unwrap_or("stranger");
///     Ok(Awaitable::ready(format!("hello {name}")))
/// });
/// assert_eq!(greet.candidates("apply", 1).count(), 1);
/// ```
#[derive(Clone)]
pub struct Callable {
    inner: Arc<CallableInner>,
}

impl Callable {
    /// Start building a callable with the given diagnostic label.
    #[must_use]
    pub fn builder(label: impl Into<String>) -> CallableBuilder {
        CallableBuilder {
            label: label.into(),
            operations: Vec::new(),
        }
    }

    /// A function invoked through the `apply` entry point.
    #[must_use]
    pub fn function<F>(
        label: impl Into<String>,
        params: impl IntoIterator<Item = ParamType>,
        body: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Result<Awaitable, Failure> + Send + Sync + 'static,
    {
        Self::builder(label).operation("apply", params, body).build()
    }

    /// A zero-argument producer invoked through the `get` entry point.
    #[must_use]
    pub fn supplier<F>(label: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> Result<Awaitable, Failure> + Send + Sync + 'static,
    {
        Self::builder(label)
            .operation("get", [], move |_| body())
            .build()
    }

    /// A zero-argument action invoked through the `run` entry point.
    ///
    /// The action's outcome is always `Null` unless it fails.
    #[must_use]
    pub fn runnable<F>(label: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> Result<(), Failure> + Send + Sync + 'static,
    {
        Self::builder(label)
            .operation("run", [], move |_| body().map(|()| Awaitable::Ready(Value::Null)))
            .build()
    }

    /// Diagnostic label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// All operations in registration order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.inner.operations
    }

    /// Operations called `name` taking `arity` arguments.
    pub fn candidates<'a>(
        &'a self,
        name: &'a str,
        arity: usize,
    ) -> impl Iterator<Item = &'a Operation> + 'a {
        self.inner
            .operations
            .iter()
            .filter(move |op| op.signature.name() == name && op.signature.arity() == arity)
    }

    /// Returns `true` when both handles refer to the same callable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("label", &self.inner.label)
            .field("operations", &self.inner.operations)
            .finish()
    }
}

/// Builder returned by [`Callable::builder`].
#[must_use]
pub struct CallableBuilder {
    label: String,
    operations: Vec<Operation>,
}

impl CallableBuilder {
    /// Register an overload.
    pub fn operation<F>(
        mut self,
        name: impl Into<String>,
        params: impl IntoIterator<Item = ParamType>,
        body: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Result<Awaitable, Failure> + Send + Sync + 'static,
    {
        self.operations.push(Operation {
            signature: Signature::new(name, params.into_iter().collect()),
            body: Arc::new(body),
        });
        self
    }

    /// Finish the callable.
    pub fn build(self) -> Callable {
        Callable {
            inner: Arc::new(CallableInner {
                label: self.label,
                operations: self.operations,
            }),
        }
    }
}
