//! Panic capture for operation bodies and producers.
//!
//! Operations supplied by test code may panic. The invoker and the normalizer
//! run them through [`catch_failure`] so that a panic becomes a
//! [`Failure`](crate::Failure) of kind `Panicked` rather than unwinding through
//! the step that triggered it.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::failure::Failure;

/// Formats a panic payload into a readable message.
///
/// String payloads are extracted directly, integer and float payloads are
/// rendered with `Display`, and everything else falls back to `Debug`.
///
/// # Examples
///
/// ```
/// use propsworld::panic_message;
/// use std::any::Any;
///
/// let payload: Box<dyn Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .or_else(|| payload.downcast_ref::<i32>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<i64>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<u32>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<u64>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<usize>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<f64>().map(ToString::to_string))
        .unwrap_or_else(|| format!("{payload:?}"))
}

/// Run `body`, converting a panic into a `Panicked` failure.
///
/// Errors returned by `body` pass through untouched.
pub(crate) fn catch_failure<T>(body: impl FnOnce() -> Result<T, Failure>) -> Result<T, Failure> {
    catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(Failure::panicked(panic_message(payload.as_ref()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;
    use rstest::rstest;

    #[rstest]
    #[case(Box::new("static") as Box<dyn Any + Send>, "static")]
    #[case(Box::new(String::from("owned")) as Box<dyn Any + Send>, "owned")]
    #[case(Box::new(7_i32) as Box<dyn Any + Send>, "7")]
    #[case(Box::new(2.5_f64) as Box<dyn Any + Send>, "2.5")]
    fn formats_common_payloads(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        assert_eq!(panic_message(payload.as_ref()), expected);
    }

    #[test]
    fn panics_become_failures() {
        let outcome: Result<(), Failure> = catch_failure(|| panic!("exploded"));
        let Err(failure) = outcome else {
            panic!("panic should be captured");
        };
        assert_eq!(failure.kind(), FailureKind::Panicked);
        assert_eq!(failure.message(), "exploded");
    }

    #[test]
    fn errors_pass_through() {
        let outcome: Result<(), Failure> = catch_failure(|| Err(Failure::raised("nope")));
        assert_eq!(outcome, Err(Failure::raised("nope")));
    }
}
