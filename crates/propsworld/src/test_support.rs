//! Sample scenario data for exercising the generic steps.
//!
//! [`seed_sample_data`] fills a world's store with the fixtures the step
//! library's own scenarios rely on: sample sequences and records, functions
//! of one to four arguments, functions that always fail, and a calculator
//! object with overloaded operations.

use serde_json::json;

use crate::deferred::{Awaitable, Pending};
use crate::failure::Failure;
use crate::invoke::{Callable, ParamType};
use crate::value::Value;
use crate::world::World;

/// Message raised by every failing sample function.
pub const SAMPLE_ERROR: &str = "Test error message";

/// Value held by the sample calculator.
pub const CALCULATOR_BASE: i64 = 42;

/// Populate the store of `world` with the sample fixtures.
///
/// # Examples
///
/// ```
/// use propsworld::World;
/// use propsworld::test_support::seed_sample_data;
///
/// let world = World::new().expect("world should start");
/// seed_sample_data(&world);
/// assert!(world.assert_equals("{sampleObject.name}", "John").is_ok());
/// assert!(world.assert_equals("{sampleArray.length}", "2").is_ok());
/// ```
pub fn seed_sample_data(world: &World) {
    let store = world.store();
    let data = [
        (
            "sampleArray",
            json!([{"name": "Alice", "value": 100}, {"name": "Bob", "value": 200}]),
        ),
        ("sampleStringArray", json!(["one", "two", "three"])),
        ("sampleEmptyArray", json!([])),
        ("sampleObject", json!({"name": "John", "age": 30})),
        (
            "nestedObject",
            json!({"name": "parent", "level1": {"level2": "deep-value"}}),
        ),
        (
            "arrayWithObjects",
            json!([
                {"id": "1", "name": "first"},
                {"id": "2", "name": "second"},
                {"id": "3", "name": "third"},
            ]),
        ),
        ("deeplyNested", json!({"a": {"b": {"c": {"d": "found"}}}})),
        (
            "userArray",
            json!([
                {"name": "Alice", "address": {"city": "New York", "zip": "10001"}},
                {"name": "Bob", "address": {"city": "Los Angeles", "zip": "90001"}},
            ]),
        ),
    ];
    for (key, value) in data {
        store.set(key, Value::from(value));
    }

    store.set(
        "singleArgFn",
        Callable::function("singleArgFn", [ParamType::ANY], |args| {
            let arg = args.first().cloned().unwrap_or_default();
            Ok(Awaitable::Pending(Pending::settled(Ok(arg))))
        }),
    );
    store.set("twoArgFn", concatenating("twoArgFn", 2));
    store.set("threeArgConcatFn", concatenating("threeArgConcatFn", 3));
    store.set("fourArgConcatFn", concatenating("fourArgConcatFn", 4));

    store.set(
        "errorThrowingFn",
        Callable::supplier("errorThrowingFn", || Err(Failure::raised(SAMPLE_ERROR))),
    );
    store.set("errorWithArgFn", failing("errorWithArgFn", 1));
    store.set("errorWith2ArgsFn", failing("errorWith2ArgsFn", 2));
    store.set("errorWith3ArgsFn", failing("errorWith3ArgsFn", 3));
    store.set("errorWith4ArgsFn", failing("errorWith4ArgsFn", 4));
    store.set(
        "wrappedErrorFn",
        Callable::supplier("wrappedErrorFn", || {
            Err(Failure::raised("operation failed").caused_by(Failure::raised(SAMPLE_ERROR)))
        }),
    );

    store.set("testCalculator", calculator());
}

/// A function of `arity` arguments returning their printed forms joined,
/// as a settled pending value.
fn concatenating(label: &str, arity: usize) -> Callable {
    Callable::function(label, vec![ParamType::ANY; arity], |args| {
        let joined: String = args.iter().map(ToString::to_string).collect();
        Ok(Awaitable::Pending(Pending::settled(Ok(Value::from(joined)))))
    })
}

fn failing(label: &str, arity: usize) -> Callable {
    Callable::function(label, vec![ParamType::ANY; arity], |_| {
        Err(Failure::raised(SAMPLE_ERROR))
    })
}

fn int_arg(args: &[Value], position: usize) -> i64 {
    args.get(position).and_then(Value::as_i64).unwrap_or_default()
}

fn sum(args: &[Value]) -> Result<Awaitable, Failure> {
    let total = args
        .iter()
        .map(|arg| arg.as_i64().unwrap_or_default())
        .fold(0, i64::saturating_add);
    Ok(Awaitable::ready(total))
}

fn describe(prefix: &'static str) -> impl Fn(&[Value]) -> Result<Awaitable, Failure> + Send + Sync {
    move |args| {
        let shown = args.first().map(ToString::to_string).unwrap_or_default();
        Ok(Awaitable::ready(format!("{prefix}:{shown}")))
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "the calculator adds to floating arguments"
)]
fn add_double(args: &[Value]) -> Result<Awaitable, Failure> {
    const BASE: f64 = 42.0;
    let n = args.first().and_then(Value::as_f64).unwrap_or_default();
    Ok(Awaitable::ready(BASE + n))
}

/// Object whose operations exercise overload selection.
fn calculator() -> Callable {
    Callable::builder("testCalculator")
        .operation("GetValue", [], |_| Ok(Awaitable::ready(CALCULATOR_BASE)))
        .operation("Add", [ParamType::NUMBER], |args| {
            Ok(Awaitable::ready(CALCULATOR_BASE.saturating_add(int_arg(args, 0))))
        })
        .operation("Multiply", [ParamType::NUMBER; 2], |args| {
            Ok(Awaitable::ready(int_arg(args, 0).saturating_mul(int_arg(args, 1))))
        })
        .operation("Sum3", [ParamType::NUMBER; 3], sum)
        .operation("Sum4", [ParamType::NUMBER; 4], sum)
        .operation("Describe", [ParamType::ANY], describe("object"))
        .operation("Describe", [ParamType::NUMBER], describe("number"))
        .operation("Describe", [ParamType::INTEGER], describe("integer"))
        .operation("AddInt", [ParamType::INTEGER.primitive()], |args| {
            Ok(Awaitable::ready(CALCULATOR_BASE.saturating_add(int_arg(args, 0))))
        })
        .operation("AddDouble", [ParamType::FLOAT.primitive()], add_double)
        .operation("IsPositive", [ParamType::INTEGER.primitive()], |args| {
            Ok(Awaitable::ready(int_arg(args, 0) > 0))
        })
        .build()
}
