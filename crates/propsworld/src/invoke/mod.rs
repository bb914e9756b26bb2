//! Dynamic invocation with overload selection.
//!
//! A [`Callable`] carries any number of named operations, several of which may
//! share a name. Invocation picks the operations with the requested name and
//! arity, keeps those whose parameter types accept the arguments, and runs the
//! most specific one. Its [`Awaitable`](crate::Awaitable) result is then
//! normalized, so callers always receive a settled [`Outcome`].

mod callable;
mod signature;


use std::time::Duration;

use log::debug;

use crate::deferred::Outcome;
use crate::failure::Failure;
use crate::value::Value;

pub use callable::{Callable, CallableBuilder, Operation, OperationBody};
pub use signature::{ParamType, Signature, TypeKind};

/// Entry point names tried, in order, when a callable is invoked directly.
pub const CALL_ENTRY_POINTS: [&str; 5] = ["apply", "accept", "call", "get", "run"];

/// Choose the operation `name` that best fits `args`.
///
/// Among compatible overloads a later one replaces the current choice only
/// when it is strictly more specific, so ties keep registration order.
#[must_use]
pub fn select_operation<'a>(
    callable: &'a Callable,
    name: &str,
    args: &[Value],
) -> Option<&'a Operation> {
    let mut best: Option<&Operation> = None;
    for candidate in callable
        .operations()
        .iter()
        .filter(|op| op.signature().name() == name && op.signature().accepts(args))
    {
        if best.is_none_or(|current| {
            candidate
                .signature()
                .is_more_specific_than(current.signature())
        }) {
            best = Some(candidate);
        }
    }
    best
}

/// Invoke the operation `name` on `target`.
///
/// Callables are searched for a matching overload. A record whose field
/// `name` holds a callable has that callable invoked through its entry
/// points.
///
/// # Errors
///
/// Returns a `NotCallable` failure for other targets, a
/// `NoMatchingOperation` failure when no overload accepts `args`, and any
/// failure raised by the operation or its deferred result.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use propsworld::{Awaitable, Callable, ParamType, Value, invoke};
///
/// let calculator = Callable::builder("calculator")
///     .operation("Describe", [ParamType::NUMBER], |_| Ok(Awaitable::ready("number")))
///     .operation("Describe", [ParamType::INTEGER], |_| Ok(Awaitable::ready("integer")))
///     .build();
/// let target = Value::from(calculator);
/// let timeout = Duration::from_secs(1);
///
/// assert_eq!(
///     invoke(&target, "Describe", &[Value::Integer(3)], timeout),
///     Ok(Value::from("integer"))
/// );
/// assert_eq!(
///     invoke(&target, "Describe", &[Value::Number(3.5)], timeout),
///     Ok(Value::from("number"))
/// );
/// ```
pub fn invoke(target: &Value, name: &str, args: &[Value], timeout: Duration) -> Outcome {
    match target {
        Value::Callable(callable) => select_operation(callable, name, args).map_or_else(
            || Err(no_match(callable, name, args)),
            |operation| run(callable, operation, args, timeout),
        ),
        Value::Record(fields) => match fields.get(name) {
            Some(Value::Callable(function)) => call_callable(function, args, timeout),
            _ => Err(Failure::no_matching_operation(name, args.len())),
        },
        other => Err(Failure::not_callable(other.type_name())),
    }
}

/// Invoke `function` through the first entry point that accepts `args`.
///
/// # Errors
///
/// As for [`invoke`].
pub fn call(function: &Value, args: &[Value], timeout: Duration) -> Outcome {
    match function {
        Value::Callable(callable) => call_callable(callable, args, timeout),
        other => Err(Failure::not_callable(other.type_name())),
    }
}

fn call_callable(callable: &Callable, args: &[Value], timeout: Duration) -> Outcome {
    CALL_ENTRY_POINTS
        .iter()
        .find_map(|entry| select_operation(callable, entry, args))
        .map_or_else(
            || Err(no_match(callable, &CALL_ENTRY_POINTS.join("|"), args)),
            |operation| run(callable, operation, args, timeout),
        )
}

fn run(callable: &Callable, operation: &Operation, args: &[Value], timeout: Duration) -> Outcome {
    debug!("invoking {} on {}", operation.signature(), callable.label());
    operation.call(args)?.resolve(timeout)
}

fn no_match(callable: &Callable, name: &str, args: &[Value]) -> Failure {
    let types: Vec<_> = args.iter().map(Value::type_name).collect();
    debug!(
        "{} has no operation `{name}` accepting ({})",
        callable.label(),
        types.join(", ")
    );
    Failure::no_matching_operation(name, args.len())
}
