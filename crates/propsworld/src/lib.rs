//! Scenario state, dynamic invocation and table matching for generic
//! behaviour-test steps.
//!
//! Steps written against this crate refer to scenario values with reference
//! expressions such as `{order.items[0].price}`, call callables chosen by name
//! and argument types, wait on results that may be deferred, and compare
//! structured data with expected tables.
//!
//! The pieces, from the bottom up:
//!
//! - [`Value`] is the closed value model and [`Store`] the shared scenario map.
//! - [`resolve`] turns a reference expression into a value.
//! - [`Awaitable`] and [`Pending`] collapse immediate, lazy and scheduled
//!   results into one outcome with a bounded wait.
//! - [`invoke`] and [`call`] pick the most specific overload of a
//!   [`Callable`] for the given arguments.
//! - [`match_exact`], [`match_at_least`] and [`match_excludes`] check records
//!   against [`ExpectedRow`]s.
//! - [`TaskRegistry`] runs named background invocations.
//! - [`World`] ties them together behind one method per generic step.
//!
//! ```
//! use propsworld::{ExpectedRow, Value, World};
//!
//! let world = World::new().expect("world should start");
//! world.store().set(
//!     "people",
//!     Value::sequence([
//!         Value::record([("name", "Alice"), ("city", "Leeds")]),
//!         Value::record([("name", "Bob"), ("city", "York")]),
//!     ]),
//! );
//!
//! let rows = [ExpectedRow::from_pairs([("name", "Bob")])];
//! assert!(world.assert_array_at_least("{people}", &rows).is_ok());
//! assert!(world.assert_array_excludes("{people}", &rows).is_err());
//! ```

pub mod config;
pub mod deferred;
pub mod failure;
pub mod invoke;
pub mod matching;
mod panic;
pub mod resolve;
pub mod rows;
pub mod scheduler;
pub mod store;
pub mod tasks;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod value;
pub mod world;

pub use config::{Config, ConfigError, DEFAULT_TIMEOUT};
pub use deferred::{Awaitable, Outcome, Pending, Producer, normalize};
pub use failure::{Failure, FailureKind};
pub use invoke::{
    CALL_ENTRY_POINTS, Callable, CallableBuilder, Operation, OperationBody, ParamType, Signature,
    TypeKind, call, invoke, select_operation,
};
pub use matching::{
    MatchError, UnmatchedRecord, match_at_least, match_exact, match_excludes, records_of,
    row_matches,
};
pub use panic::panic_message;
pub use resolve::{ResolveError, Scope, lookup_path, resolve, resolve_in};
pub use rows::{ExpectedRow, ExpectedRows, RowsError};
pub use scheduler::{Scheduler, SchedulerError};
pub use store::{RESULT_KEY, Store, WeakStore};
pub use tasks::{TaskError, TaskRegistry};
pub use value::{Record, Value};
pub use world::{AssertionError, World, WorldError, is_truthy};

pub use propsworld_path::{PathError, PropertyPath};
