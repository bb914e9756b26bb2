//! Worker pool running background operations and timed results.
//!
//! The [`Scheduler`] owns a multi-thread Tokio runtime. Blocking operations
//! run on its blocking pool, timers and watchers on its workers. Every piece
//! of scheduled work is exposed as a [`Pending`] handle that settles exactly
//! once with the work's [`Outcome`].

use std::fmt;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use crate::config::Config;
use crate::deferred::{Outcome, Pending};
use crate::failure::Failure;
use crate::panic::{catch_failure, panic_message};
use crate::value::Value;

/// Errors raised while starting the worker pool.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The Tokio runtime could not be built.
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] io::Error),
}

/// Shuts the runtime down without waiting for outstanding work.
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// Cheaply clonable handle to the scenario's worker pool.
#[derive(Clone)]
pub struct Scheduler {
    handle: Handle,
    _runtime: Arc<OwnedRuntime>,
}

impl Scheduler {
    /// Start a pool with `worker_threads` async workers.
    ///
    /// A request for zero workers starts one.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Runtime`] when the runtime cannot be built.
    pub fn new(worker_threads: usize) -> Result<Self, SchedulerError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("propsworld-worker")
            .enable_all()
            .build()?;
        Ok(Self {
            handle: runtime.handle().clone(),
            _runtime: Arc::new(OwnedRuntime(Some(runtime))),
        })
    }

    /// Start a pool sized by `config`.
    ///
    /// # Errors
    ///
    /// See [`Scheduler::new`].
    pub fn from_config(config: &Config) -> Result<Self, SchedulerError> {
        Self::new(config.worker_threads)
    }

    /// Handle to the underlying runtime.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Run `work` on the blocking pool.
    ///
    /// A panic inside `work` settles the handle with a `Panicked` failure.
    pub fn spawn_blocking<F>(&self, work: F) -> Pending
    where
        F: FnOnce() -> Outcome + Send + 'static,
    {
        let job = self.handle.spawn_blocking(move || catch_failure(work));
        self.settle(job)
    }

    /// Drive `future` on the async workers.
    pub fn spawn<F>(&self, future: F) -> Pending
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let job = self.handle.spawn(future);
        self.settle(job)
    }

    /// A handle that settles with `value` once `delay` has passed.
    pub fn delayed(&self, delay: Duration, value: Value) -> Pending {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            Ok(value)
        })
    }

    /// Publish the outcome of `job` through a watch channel.
    fn settle(&self, job: JoinHandle<Outcome>) -> Pending {
        let (sender, receiver) = watch::channel(None);
        self.handle.spawn(async move {
            let outcome = job.await.unwrap_or_else(|err| Err(join_failure(err)));
            sender.send_replace(Some(outcome));
        });
        Pending::new(receiver, self.handle.clone())
    }
}

fn join_failure(err: JoinError) -> Failure {
    if err.is_panic() {
        Failure::panicked(panic_message(err.into_panic().as_ref()))
    } else {
        Failure::abandoned("scheduled work was cancelled")
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("workers", &self.handle.metrics().num_workers())
            .finish_non_exhaustive()
    }
}
