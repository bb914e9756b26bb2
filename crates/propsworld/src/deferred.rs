//! Normalization of immediate, lazy and pending results.
//!
//! Operations return an [`Awaitable`]: a value that is ready now, a producer
//! that yields the next layer when run, or a [`Pending`] handle to work on the
//! scheduler. [`Awaitable::resolve`] collapses all three into one outcome,
//! blocking the calling thread for at most the given timeout.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::config::DEFAULT_TIMEOUT;
use crate::failure::Failure;
use crate::panic::catch_failure;
use crate::value::Value;

/// Result of running or awaiting an operation.
pub type Outcome = Result<Value, Failure>;

/// Deferred computation run by [`Awaitable::Lazy`].
pub type Producer = Box<dyn FnOnce() -> Result<Awaitable, Failure> + Send>;

/// An operation result that may not have been computed yet.
pub enum Awaitable {
    /// A value available immediately.
    Ready(Value),
    /// A producer run on the resolving thread to obtain the next layer.
    Lazy(Producer),
    /// Work running on the scheduler.
    Pending(Pending),
}

impl Awaitable {
    /// Wrap a value that is already available.
    #[must_use]
    pub fn ready(value: impl Into<Value>) -> Self {
        Self::Ready(value.into())
    }

    /// Defer `producer` until the awaitable is resolved.
    #[must_use]
    pub fn lazy(producer: impl FnOnce() -> Result<Self, Failure> + Send + 'static) -> Self {
        Self::Lazy(Box::new(producer))
    }

    /// Collapse the awaitable into its final outcome.
    ///
    /// Lazy layers are run in turn, with panics captured as failures. A
    /// pending layer blocks for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the [`Failure`] raised by a producer, reported by pending work,
    /// or produced when `timeout` elapses.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use propsworld::{Awaitable, Value};
    ///
    /// let nested = Awaitable::lazy(|| Ok(Awaitable::lazy(|| Ok(Awaitable::ready("done")))));
    /// assert_eq!(nested.resolve(Duration::from_secs(1)), Ok(Value::from("done")));
    /// ```
    pub fn resolve(self, timeout: Duration) -> Outcome {
        let mut layer = self;
        loop {
            layer = match layer {
                Self::Ready(value) => return Ok(value),
                Self::Pending(pending) => return pending.wait(timeout),
                Self::Lazy(producer) => catch_failure(producer)?,
            };
        }
    }
}

impl From<Value> for Awaitable {
    fn from(value: Value) -> Self {
        Self::Ready(value)
    }
}

impl From<Pending> for Awaitable {
    fn from(pending: Pending) -> Self {
        Self::Pending(pending)
    }
}

impl fmt::Debug for Awaitable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
            Self::Pending(pending) => f.debug_tuple("Pending").field(pending).finish(),
        }
    }
}

/// Resolve `awaitable`, falling back to the default timeout.
///
/// # Errors
///
/// See [`Awaitable::resolve`].
pub fn normalize(awaitable: Awaitable, timeout: Option<Duration>) -> Outcome {
    awaitable.resolve(timeout.unwrap_or(DEFAULT_TIMEOUT))
}

/// Handle to work whose outcome is published once it settles.
///
/// Clones observe the same outcome, and a handle may be waited on any number
/// of times. A wait that times out leaves the work running.
#[derive(Clone)]
pub struct Pending {
    receiver: watch::Receiver<Option<Outcome>>,
    runtime: Option<Handle>,
}

impl Pending {
    pub(crate) fn new(receiver: watch::Receiver<Option<Outcome>>, runtime: Handle) -> Self {
        Self {
            receiver,
            runtime: Some(runtime),
        }
    }

    /// A handle that is already settled with `outcome`.
    #[must_use]
    pub fn settled(outcome: Outcome) -> Self {
        let (_, receiver) = watch::channel(Some(outcome));
        Self {
            receiver,
            runtime: None,
        }
    }

    /// Returns `true` once the outcome is available.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    /// The outcome, if the work has settled.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.receiver.borrow().clone()
    }

    /// Block until the work settles or `timeout` elapses.
    ///
    /// Must not be called from inside an async context.
    ///
    /// # Errors
    ///
    /// Returns the failure the work settled with, a `Timeout` failure when
    /// `timeout` elapses first, or an `Abandoned` failure when the work ended
    /// without publishing an outcome.
    pub fn wait(&self, timeout: Duration) -> Outcome {
        if let Some(outcome) = self.outcome() {
            return outcome;
        }
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(abandoned());
        };
        let mut receiver = self.receiver.clone();
        // The timer has to be created inside the runtime to find its driver.
        let settled = runtime.block_on(async move {
            tokio::time::timeout(timeout, async move {
                receiver
                    .wait_for(Option::is_some)
                    .await
                    .ok()
                    .and_then(|settled| (*settled).clone())
            })
            .await
        });
        match settled {
            Ok(Some(outcome)) => outcome,
            Ok(None) => Err(abandoned()),
            Err(_) => Err(Failure::timeout(timeout)),
        }
    }
}

fn abandoned() -> Failure {
    Failure::abandoned("deferred work ended without reporting an outcome")
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("settled", &self.is_settled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;
    use crate::scheduler::Scheduler;
    use rstest::{fixture, rstest};

    #[fixture]
    fn scheduler() -> Scheduler {
        Scheduler::new(2).unwrap_or_else(|err| panic!("scheduler should start: {err}"))
    }

    #[test]
    fn ready_values_pass_through() {
        let outcome = Awaitable::ready(5).resolve(Duration::ZERO);
        assert_eq!(outcome, Ok(Value::Integer(5)));
    }

    #[test]
    fn lazy_failures_surface() {
        let outcome =
            Awaitable::lazy(|| Err(Failure::raised("lazy boom"))).resolve(DEFAULT_TIMEOUT);
        assert_eq!(outcome, Err(Failure::raised("lazy boom")));
    }

    #[test]
    fn lazy_panics_are_captured() {
        let outcome = Awaitable::lazy(|| panic!("producer panicked")).resolve(DEFAULT_TIMEOUT);
        assert!(matches!(outcome, Err(ref failure) if failure.kind() == FailureKind::Panicked));
    }

    #[test]
    fn settled_handles_resolve_without_runtime() {
        let pending = Pending::settled(Ok(Value::from("now")));
        assert!(pending.is_settled());
        assert_eq!(normalize(pending.into(), None), Ok(Value::from("now")));
    }

    #[rstest]
    fn short_waits_time_out_and_later_waits_succeed(scheduler: Scheduler) {
        let pending = scheduler.delayed(Duration::from_millis(200), Value::from("late"));
        let early = pending.wait(Duration::from_millis(10));
        assert!(matches!(early, Err(ref failure) if failure.is_timeout()));
        assert_eq!(pending.wait(Duration::from_secs(5)), Ok(Value::from("late")));
    }

    #[rstest]
    fn every_waiter_observes_the_same_outcome(scheduler: Scheduler) {
        let pending = scheduler.spawn_blocking(|| Err(Failure::raised("shared")));
        let other = pending.clone();
        assert_eq!(pending.wait(DEFAULT_TIMEOUT), Err(Failure::raised("shared")));
        assert_eq!(other.wait(DEFAULT_TIMEOUT), Err(Failure::raised("shared")));
    }

    #[rstest]
    fn plain_threads_can_wait_on_unsettled_work(scheduler: Scheduler) {
        let pending = scheduler.delayed(Duration::from_millis(50), Value::from("later"));
        let waiter = std::thread::spawn(move || {
            let early = pending.wait(Duration::from_millis(1));
            (early, pending.wait(Duration::from_secs(5)))
        });
        let (early, late) = waiter
            .join()
            .unwrap_or_else(|_| panic!("waiting thread should not panic"));
        assert!(matches!(early, Err(ref failure) if failure.is_timeout()));
        assert_eq!(late, Ok(Value::from("later")));
    }

    #[rstest]
    fn lazy_layers_may_yield_pending_work(scheduler: Scheduler) {
        let pending = scheduler.delayed(Duration::from_millis(5), Value::Integer(9));
        let awaitable = Awaitable::lazy(move || Ok(Awaitable::Pending(pending)));
        assert_eq!(awaitable.resolve(DEFAULT_TIMEOUT), Ok(Value::Integer(9)));
    }
}
