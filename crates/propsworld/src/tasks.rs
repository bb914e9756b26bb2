//! Named background tasks.
//!
//! A task is an invocation started on the scheduler and remembered under a
//! name until a later step waits for it. Starting a task with a name already
//! in use replaces the earlier entry; the earlier work keeps running but can
//! no longer be awaited by name.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use hashbrown::HashMap;
use log::{debug, warn};
use thiserror::Error;

use crate::deferred::Pending;
use crate::invoke;
use crate::scheduler::Scheduler;
use crate::store::{RESULT_KEY, Store};
use crate::value::Value;

/// Errors raised by the task registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TaskError {
    /// No task was started under the requested name.
    #[error("no task named '{name}' has been started")]
    UnknownTask {
        /// Requested task name.
        name: String,
    },
}

/// Registry of started tasks keyed by name.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<String, Pending>>,
}

impl TaskRegistry {
    /// Construct an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<String, Pending>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start calling `function` with already-resolved `args` on the blocking
    /// pool and remember it as `name`.
    ///
    /// Deferred results produced by the call are waited on for at most
    /// `timeout` inside the task.
    pub fn start(
        &self,
        name: impl Into<String>,
        scheduler: &Scheduler,
        function: Value,
        args: Vec<Value>,
        timeout: Duration,
    ) {
        let name = name.into();
        debug!("starting task '{name}' with {} argument(s)", args.len());
        let pending = scheduler.spawn_blocking(move || invoke::call(&function, &args, timeout));
        self.insert(name, pending);
    }

    /// Remember existing pending work as `name`, replacing any prior entry.
    pub fn insert(&self, name: impl Into<String>, pending: Pending) {
        self.tasks().insert(name.into(), pending);
    }

    /// Wait for the task `name` and record its outcome.
    ///
    /// The outcome, a value or a failure, is stored under both
    /// [`RESULT_KEY`] and `name`. A timed-out wait records a `Timeout`
    /// failure and leaves the task registered so it can be awaited again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::UnknownTask`] when no task is registered as
    /// `name`.
    pub fn await_task(
        &self,
        name: &str,
        timeout: Duration,
        store: &Store,
    ) -> Result<Value, TaskError> {
        let pending = self
            .tasks()
            .get(name)
            .cloned()
            .ok_or_else(|| TaskError::UnknownTask {
                name: name.to_owned(),
            })?;
        let outcome = pending.wait(timeout);
        if outcome.as_ref().is_err_and(|failure| failure.is_timeout()) {
            warn!("gave up waiting for task '{name}' after {}ms", timeout.as_millis());
        }
        let value = Value::from(outcome);
        store.set(RESULT_KEY, value.clone());
        store.set(name, value.clone());
        Ok(value)
    }

    /// Returns `true` when a task is registered as `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tasks().contains_key(name)
    }

    /// Returns `Some(true)` once the task `name` has settled.
    #[must_use]
    pub fn is_settled(&self, name: &str) -> Option<bool> {
        self.tasks().get(name).map(Pending::is_settled)
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    /// Returns `true` when no task is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }

    /// Forget every task. Running work is not cancelled.
    pub fn clear(&self) {
        self.tasks().clear();
    }
}
