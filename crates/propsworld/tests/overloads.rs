//! Overload selection over the sample calculator and hand-built callables.

mod common;

use std::time::Duration;

use common::world;
use propsworld::{
    Awaitable, Callable, FailureKind, ParamType, Signature, Value, World, invoke, select_operation,
};
use rstest::rstest;

const TIMEOUT: Duration = Duration::from_secs(2);

fn calculator(world: &World) -> Value {
    world
        .get("testCalculator")
        .unwrap_or_else(|| panic!("calculator should be seeded"))
}

#[rstest]
#[case(Value::Integer(7), "integer:7")]
#[case(Value::Number(7.5), "number:7.5")]
#[case(Value::from("seven"), "object:seven")]
#[case(Value::Bool(true), "object:true")]
#[case(Value::Null, "integer:null")]
fn describe_picks_the_narrowest_overload(
    world: World,
    #[case] arg: Value,
    #[case] expected: &str,
) {
    assert_eq!(
        invoke(&calculator(&world), "Describe", &[arg], TIMEOUT),
        Ok(Value::from(expected))
    );
}

#[rstest]
fn primitive_parameters_reject_null_and_wrong_kinds(world: World) {
    let target = calculator(&world);
    assert_eq!(
        invoke(&target, "AddInt", &[Value::Integer(8)], TIMEOUT),
        Ok(Value::Integer(50))
    );
    assert_eq!(
        invoke(&target, "IsPositive", &[Value::Integer(-1)], TIMEOUT),
        Ok(Value::Bool(false))
    );
    for arg in [Value::Null, Value::Number(8.0), Value::from("8")] {
        let outcome = invoke(&target, "AddInt", &[arg], TIMEOUT);
        assert_eq!(
            outcome.map_err(|failure| failure.kind()),
            Err(FailureKind::NoMatchingOperation)
        );
    }
}

#[rstest]
fn number_parameters_accept_both_numeric_kinds(world: World) {
    let target = calculator(&world);
    assert_eq!(
        invoke(&target, "Add", &[Value::Integer(1)], TIMEOUT),
        Ok(Value::Integer(43))
    );
    assert_eq!(
        invoke(&target, "Add", &[Value::Number(1.9)], TIMEOUT),
        Ok(Value::Integer(43))
    );
}

#[test]
fn multi_parameter_specificity_needs_every_position_to_narrow() {
    let mixed = Callable::builder("mixed")
        .operation("pair", [ParamType::NUMBER, ParamType::INTEGER], |_| {
            Ok(Awaitable::ready("number-integer"))
        })
        .operation("pair", [ParamType::INTEGER, ParamType::NUMBER], |_| {
            Ok(Awaitable::ready("integer-number"))
        })
        .operation("pair", [ParamType::INTEGER, ParamType::INTEGER], |_| {
            Ok(Awaitable::ready("integer-integer"))
        })
        .build();
    let args = [Value::Integer(1), Value::Integer(2)];
    let chosen = select_operation(&mixed, "pair", &args)
        .unwrap_or_else(|| panic!("an overload should match"));
    assert_eq!(
        chosen.signature(),
        &Signature::new("pair", vec![ParamType::INTEGER, ParamType::INTEGER])
    );

    let args = [Value::Integer(1), Value::Number(2.5)];
    assert_eq!(
        invoke(&Value::from(mixed), "pair", &args, TIMEOUT),
        Ok(Value::from("integer-number"))
    );
}

#[test]
fn panicking_operations_become_failures() {
    let fragile = Value::from(Callable::supplier("fragile", || panic!("snapped")));
    let Err(failure) = propsworld::call(&fragile, &[], TIMEOUT) else {
        panic!("panics should be captured as failures");
    };
    assert_eq!(failure.kind(), FailureKind::Panicked);
    assert_eq!(failure.message(), "snapped");
}
