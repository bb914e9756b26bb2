//! Scenario configuration parsed from environment variables.
//!
//! Every setting has a default and can be overridden through an environment
//! variable prefixed with `PROPSWORLD_`.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default bound on waits for deferred results and tasks.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of async worker threads in the scheduler.
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Environment variable overriding [`Config::default_timeout`], in milliseconds.
pub const TIMEOUT_VAR: &str = "PROPSWORLD_TIMEOUT_MS";

/// Environment variable overriding [`Config::worker_threads`].
pub const WORKER_THREADS_VAR: &str = "PROPSWORLD_WORKER_THREADS";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable held a value that could not be used.
    #[error("invalid value '{value}' for {variable}: expected {expected}")]
    InvalidValue {
        /// Variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
        /// Description of an acceptable value.
        expected: &'static str,
    },
}

/// Configuration for a scenario world.
///
/// # Environment Variables
///
/// - `PROPSWORLD_TIMEOUT_MS`: bound on waits that do not name their own
///   timeout
/// - `PROPSWORLD_WORKER_THREADS`: async workers in the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bound on waits that do not name their own timeout.
    pub default_timeout: Duration,
    /// Async worker threads in the scheduler.
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set to an
    /// unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps variable names to
    /// their values.
    ///
    /// # Errors
    ///
    /// As for [`Config::from_env`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use propsworld::Config;
    ///
    /// let config = Config::from_lookup(|name| {
    ///     (name == "PROPSWORLD_TIMEOUT_MS").then(|| "1500".to_owned())
    /// })
    /// .expect("valid configuration");
    /// assert_eq!(config.default_timeout, Duration::from_millis(1500));
    /// assert_eq!(config.worker_threads, 4);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_timeout = lookup(TIMEOUT_VAR)
            .map(parse_timeout)
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);
        let worker_threads = lookup(WORKER_THREADS_VAR)
            .map(parse_worker_threads)
            .transpose()?
            .unwrap_or(DEFAULT_WORKER_THREADS);

        Ok(Self {
            default_timeout,
            worker_threads,
        })
    }

    /// Apply optional overrides that take precedence over the environment.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        default_timeout: Option<Duration>,
        worker_threads: Option<usize>,
    ) -> Self {
        if let Some(timeout) = default_timeout {
            self.default_timeout = timeout;
        }

        if let Some(threads) = worker_threads {
            self.worker_threads = threads;
        }

        self
    }

    /// Create a new configuration with the specified default timeout.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Create a new configuration with the specified worker count.
    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }
}

fn parse_timeout(val: String) -> Result<Duration, ConfigError> {
    val.trim()
        .parse()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidValue {
            variable: TIMEOUT_VAR,
            value: val,
            expected: "a whole number of milliseconds",
        })
}

fn parse_worker_threads(val: String) -> Result<usize, ConfigError> {
    val.trim()
        .parse::<usize>()
        .ok()
        .filter(|threads| *threads > 0)
        .ok_or(ConfigError::InvalidValue {
            variable: WORKER_THREADS_VAR,
            value: val,
            expected: "a positive integer",
        })
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_timeout, Duration::from_secs(30));
        assert_eq!(config.worker_threads, 4);
    }

    #[test]
    fn reads_both_variables() {
        let config = Config::from_lookup(lookup(&[
            (TIMEOUT_VAR, "250"),
            (WORKER_THREADS_VAR, " 8 "),
        ]))
        .unwrap();
        assert_eq!(config.default_timeout, Duration::from_millis(250));
        assert_eq!(config.worker_threads, 8);
    }

    #[rstest]
    #[case(TIMEOUT_VAR, "soon")]
    #[case(TIMEOUT_VAR, "-5")]
    #[case(WORKER_THREADS_VAR, "0")]
    #[case(WORKER_THREADS_VAR, "many")]
    fn rejects_invalid_values(#[case] variable: &str, #[case] value: &str) {
        let err = Config::from_lookup(lookup(&[(variable, value)])).unwrap_err();
        assert!(err.to_string().contains(variable));
        assert!(err.to_string().contains(value));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = Config::default()
            .apply_overrides(Some(Duration::from_millis(5)), None)
            .with_worker_threads(2);
        assert_eq!(config.default_timeout, Duration::from_millis(5));
        assert_eq!(config.worker_threads, 2);
    }
}
