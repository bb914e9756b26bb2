//! Step-facing facade over one scenario.
//!
//! A [`World`] owns the scenario [`Store`], the worker [`Scheduler`], the
//! [`TaskRegistry`] and the [`Config`]. Its methods take step arguments in the
//! textual form they appear in a feature file, resolve them, and record what
//! happened in the store. Call surfaces never return an engine failure as an
//! `Err`: the failure is stored under [`RESULT_KEY`] like any other result so
//! a later step can assert on it.
//!
//! # Examples
//!
//! ```
//! use propsworld::{Awaitable, Callable, ParamType, Value, World};
//!
//! let world = World::new().expect("world should start");
//! world.store().set(
//!     "greet",
//!     Callable::function("greet", [ParamType::TEXT], |args| {
//!         let name = args.first().and_then(Value::as_str).unwrap_or("nobody");
//!         Ok(Awaitable::ready(format!("hello {name}")))
//!     }),
//! );
//! world.store().set("user", Value::record([("name", "Alice")]));
//!
//! world.call_function("{greet}", &["{user.name}"]);
//! assert!(world.assert_equals("{result}", "hello Alice").is_ok());
//!
//! world.call_function("{greet}", &[]);
//! assert!(world.assert_error("{result}").is_ok());
//! ```

mod assertions;

#[cfg(test)]
mod tests;

use std::thread;
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::deferred::{Awaitable, Outcome, Pending};
use crate::failure::Failure;
use crate::invoke::{self, Callable};
use crate::resolve::{ResolveError, resolve};
use crate::scheduler::{Scheduler, SchedulerError};
use crate::store::{RESULT_KEY, Store};
use crate::tasks::{TaskError, TaskRegistry};
use crate::value::Value;

pub use assertions::{AssertionError, is_truthy};

/// Errors raised while setting up a world.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorldError {
    /// Configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The worker pool could not be started.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// State and behaviour shared by the generic steps of one scenario.
#[derive(Debug)]
pub struct World {
    store: Store,
    scheduler: Scheduler,
    tasks: TaskRegistry,
    config: Config,
}

impl World {
    /// Start a world with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Scheduler`] when the worker pool cannot start.
    pub fn new() -> Result<Self, WorldError> {
        Self::with_config(Config::default())
    }

    /// Start a world configured from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] for unusable environment values and
    /// [`WorldError::Scheduler`] when the worker pool cannot start.
    pub fn from_env() -> Result<Self, WorldError> {
        Self::with_config(Config::from_env()?)
    }

    /// Start a world with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Scheduler`] when the worker pool cannot start.
    pub fn with_config(config: Config) -> Result<Self, WorldError> {
        let scheduler = Scheduler::from_config(&config)?;
        Ok(Self {
            store: Store::new(),
            scheduler,
            tasks: TaskRegistry::new(),
            config,
        })
    }

    /// The scenario store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The worker pool.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Tasks started in this scenario.
    #[must_use]
    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Value bound to `key` in the store.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    /// Resolve `expr` against the store.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a braced path is malformed.
    pub fn resolve(&self, expr: &str) -> Result<Value, ResolveError> {
        resolve(expr, &self.store)
    }

    /// Write a scenario log line.
    #[expect(clippy::unused_self, reason = "log lines belong to the scenario")]
    pub fn log(&self, message: &str) {
        info!("{message}");
    }

    fn resolve_all(&self, exprs: &[&str]) -> Result<Vec<Value>, ResolveError> {
        exprs.iter().map(|expr| self.resolve(expr)).collect()
    }

    /// Store `outcome` under [`RESULT_KEY`] and return the stored value.
    fn record(&self, outcome: Outcome) -> Value {
        if let Err(failure) = &outcome {
            debug!("recording failure: {failure}");
        }
        let value = Value::from(outcome);
        self.store.set(RESULT_KEY, value.clone());
        value
    }

    // Invocation

    /// Call `method` on the value `object` resolves to.
    ///
    /// Every parameter is resolved first. The outcome is stored under
    /// [`RESULT_KEY`] and returned.
    pub fn call_method(&self, object: &str, method: &str, params: &[&str]) -> Value {
        let outcome = self.prepare(object, params).and_then(|(target, args)| {
            invoke::invoke(&target, method, &args, self.config.default_timeout)
        });
        self.record(outcome)
    }

    /// Call the function `function` resolves to with `params`.
    ///
    /// The outcome is stored under [`RESULT_KEY`] and returned.
    pub fn call_function(&self, function: &str, params: &[&str]) -> Value {
        let outcome = self.prepare(function, params).and_then(|(target, args)| {
            invoke::call(&target, &args, self.config.default_timeout)
        });
        self.record(outcome)
    }

    /// Call `function` and wait for its result.
    ///
    /// Deferred results are awaited for the default timeout, so this behaves
    /// as [`World::call_function`].
    pub fn wait_for(&self, function: &str, params: &[&str]) -> Value {
        self.call_function(function, params)
    }

    /// Run `function` on the worker pool and wait at most `timeout`.
    ///
    /// A call still running when `timeout` elapses records a `Timeout`
    /// failure and keeps running in the background.
    pub fn wait_for_within(&self, function: &str, params: &[&str], timeout: Duration) -> Value {
        let outcome = self.prepare(function, params).and_then(|(target, args)| {
            let inner = self.config.default_timeout;
            self.scheduler
                .spawn_blocking(move || invoke::call(&target, &args, inner))
                .wait(timeout)
        });
        self.record(outcome)
    }

    /// Resolve a call target and its parameters.
    fn prepare(&self, target: &str, params: &[&str]) -> Result<(Value, Vec<Value>), Failure> {
        let target = self.resolve(target)?;
        let args = self.resolve_all(params)?;
        Ok((target, args))
    }

    // Reference

    /// Bind the value of `from` to the key `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `from` is malformed.
    pub fn refer_to(&self, from: &str, to: &str) -> Result<(), ResolveError> {
        let value = self.resolve(from)?;
        self.store.set(to, value);
        Ok(())
    }

    /// Bind the value of `value` to the key `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `value` is malformed.
    pub fn set(&self, field: &str, value: &str) -> Result<(), ResolveError> {
        self.refer_to(value, field)
    }

    /// Block the scenario for `period`.
    #[expect(clippy::unused_self, reason = "waiting is a scenario step")]
    pub fn wait_period(&self, period: Duration) {
        debug!("waiting {}ms", period.as_millis());
        thread::sleep(period);
    }

    // Tasks

    /// Start calling `function` with `params` in the background as `task`.
    ///
    /// Parameters are resolved before the task starts. A resolution failure
    /// is remembered as the task's outcome.
    pub fn start_task(&self, function: &str, params: &[&str], task: &str) {
        match self.prepare(function, params) {
            Ok((target, args)) => self.tasks.start(
                task,
                &self.scheduler,
                target,
                args,
                self.config.default_timeout,
            ),
            Err(failure) => self.tasks.insert(task, Pending::settled(Err(failure))),
        }
    }

    /// Wait for `task` for the default timeout.
    ///
    /// The outcome is stored under [`RESULT_KEY`] and under `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::UnknownTask`] when no task was started as `task`.
    pub fn wait_for_task(&self, task: &str) -> Result<Value, TaskError> {
        self.wait_for_task_within(task, self.config.default_timeout)
    }

    /// Wait for `task` for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::UnknownTask`] when no task was started as `task`.
    pub fn wait_for_task_within(&self, task: &str, timeout: Duration) -> Result<Value, TaskError> {
        self.tasks.await_task(task, timeout, &self.store)
    }

    // Fixtures

    /// Bind `handler` to a runnable that increments the integer at
    /// `counter`, which starts at zero.
    ///
    /// Increments are atomic, so concurrent tasks never lose a count.
    pub fn invocation_counter(&self, handler: &str, counter: &str) {
        self.store.set(counter, 0);
        let store = self.store.downgrade();
        let counter = counter.to_owned();
        let runnable = Callable::runnable(handler, move || {
            let store = store
                .upgrade()
                .ok_or_else(|| Failure::abandoned("scenario store has been dropped"))?;
            store.update(&counter, |count| {
                *count = Value::Integer(count.as_i64().unwrap_or(0).saturating_add(1));
            });
            Ok(())
        });
        self.store.set(handler, runnable);
    }

    /// Bind `function` to a supplier whose result is an already settled
    /// pending value holding `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `value` is malformed.
    pub fn async_function_returning(
        &self,
        function: &str,
        value: &str,
    ) -> Result<(), ResolveError> {
        let value = self.resolve(value)?;
        let supplier = Callable::supplier(function, move || {
            Ok(Awaitable::Pending(Pending::settled(Ok(value.clone()))))
        });
        self.store.set(function, supplier);
        Ok(())
    }

    /// Bind `function` to a supplier whose pending result settles with
    /// `value` once `delay` has passed.
    ///
    /// The delay starts on each call.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `value` is malformed.
    pub fn async_function_returning_after(
        &self,
        function: &str,
        value: &str,
        delay: Duration,
    ) -> Result<(), ResolveError> {
        let value = self.resolve(value)?;
        let scheduler = self.scheduler.clone();
        let supplier = Callable::supplier(function, move || {
            Ok(Awaitable::Pending(scheduler.delayed(delay, value.clone())))
        });
        self.store.set(function, supplier);
        Ok(())
    }
}

