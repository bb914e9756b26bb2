//! Scenario store shared by steps, operations and background tasks.
//!
//! The [`Store`] maps names to [`Value`]s for the lifetime of one scenario.
//! It is a cheaply clonable handle; every clone observes the same entries, so
//! callables scheduled on the worker pool can read and update the scenario
//! state the main flow sees.
//!
//! # Examples
//!
//! ```
//! use propsworld::{Store, Value};
//!
//! let store = Store::new();
//! assert!(store.is_empty());
//!
//! store.set("answer", 42);
//! assert_eq!(store.get("answer"), Some(Value::Integer(42)));
//! assert!(store.contains("answer"));
//! assert_eq!(store.remove("answer"), Some(Value::Integer(42)));
//! assert!(store.is_empty());
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use hashbrown::HashMap;

use crate::value::Value;

/// Key under which step-level calls record their outcome.
pub const RESULT_KEY: &str = "result";

/// Shared, thread-safe name to value map for one scenario.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<HashMap<String, Value>>>,
}

impl Store {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind `value` to `key`, returning the value it replaced.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries().insert(key.into(), value.into())
    }

    /// Read the value bound to `key` by cloning it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries().get(key).cloned()
    }

    /// Return `true` when `key` is bound.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Remove and return the value bound to `key`.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries().remove(key)
    }

    /// Apply `update` to the entry for `key` while holding the lock.
    ///
    /// The closure receives the current value, or `Null` when the key is
    /// unbound. Whatever it leaves behind is stored, and its return value is
    /// passed back to the caller. This is the only way to perform a
    /// read-modify-write that other handles cannot interleave with.
    pub fn update<R>(&self, key: &str, update: impl FnOnce(&mut Value) -> R) -> R {
        let mut entries = self.entries();
        let slot = entries.entry(key.to_owned()).or_default();
        update(slot)
    }

    /// Names of all bound keys in unspecified order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    /// Number of bound keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Return `true` when no key is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// A handle that does not keep the entries alive.
    ///
    /// Callables stored in the scenario use this to refer back to the store
    /// without forming a reference cycle.
    #[must_use]
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle returned by [`Store::downgrade`].
#[derive(Clone, Debug)]
pub struct WeakStore {
    inner: Weak<Mutex<HashMap<String, Value>>>,
}

impl WeakStore {
    /// The store, if any owning handle is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries().iter()).finish()
    }
}
