//! Behavioural tests driving the generic steps over the sample fixtures.

mod common;

use common::{table, world};
use propsworld::{AssertionError, MatchError, RESULT_KEY, Value, World};
use rstest::rstest;

#[rstest]
#[case("{singleArgFn}", &["{sampleObject.name}"], "John")]
#[case("{twoArgFn}", &["a", "b"], "ab")]
#[case("{threeArgConcatFn}", &["a", "b", "c"], "abc")]
#[case("{fourArgConcatFn}", &["a", "{true}", "{null}", "{7}"], "atruenull7")]
fn functions_are_called_with_resolved_arguments(
    world: World,
    #[case] function: &str,
    #[case] params: &[&str],
    #[case] expected: &str,
) {
    world.call_function(function, params);
    assert_eq!(world.assert_equals("{result}", expected), Ok(()));
    assert_eq!(world.assert_not_error("{result}"), Ok(()));
}

#[rstest]
#[case("{errorThrowingFn}", &[])]
#[case("{errorWithArgFn}", &["x"])]
#[case("{errorWith2ArgsFn}", &["x", "y"])]
#[case("{errorWith3ArgsFn}", &["x", "y", "z"])]
#[case("{errorWith4ArgsFn}", &["w", "x", "y", "z"])]
#[case("{wrappedErrorFn}", &[])]
fn raised_failures_are_stored_as_results(
    world: World,
    #[case] function: &str,
    #[case] params: &[&str],
) {
    world.call_function(function, params);
    assert_eq!(world.assert_error("{result}"), Ok(()));
    assert_eq!(
        world.assert_error_with_message("{result}", "Test error message"),
        Ok(())
    );
}

#[rstest]
fn wrapped_failures_expose_their_cause(world: World) {
    world.call_function("{wrappedErrorFn}", &[]);
    assert_eq!(world.assert_equals("{result.message}", "operation failed"), Ok(()));
    assert_eq!(
        world.assert_equals("{result.cause.message}", "Test error message"),
        Ok(())
    );
    assert_eq!(world.assert_null("{result.cause.cause}"), Ok(()));
}

#[rstest]
fn calling_with_the_wrong_arity_is_a_failure(world: World) {
    world.call_function("{twoArgFn}", &["only one"]);
    assert_eq!(world.assert_error("{result}"), Ok(()));
    assert_eq!(
        world.assert_contains("{result}", "accepts 1 argument of the given types"),
        Ok(())
    );
    assert_eq!(world.assert_equals("{result.kind}", "no-matching-operation"), Ok(()));
}

#[rstest]
#[case("GetValue", &[], "42")]
#[case("Add", &["{5}"], "47")]
#[case("Multiply", &["{6}", "{7}"], "42")]
#[case("Sum3", &["{1}", "{2}", "{3}"], "6")]
#[case("Sum4", &["{1}", "{2}", "{3}", "{4}"], "10")]
fn calculator_methods(
    world: World,
    #[case] method: &str,
    #[case] params: &[&str],
    #[case] expected: &str,
) {
    world.call_method("{testCalculator}", method, params);
    assert_eq!(world.assert_equals("{result}", expected), Ok(()));
}

#[rstest]
fn literal_numbers_do_not_reach_integer_only_methods(world: World) {
    world.call_method("{testCalculator}", "IsPositive", &["{3}"]);
    assert_eq!(world.assert_error("{result}"), Ok(()));
    let value = world.call_method("{testCalculator}", "AddDouble", &["{0.5}"]);
    assert_eq!(value, Value::Number(42.5));
    // Numeric path results are rounded half-up.
    assert_eq!(world.assert_equals("{result}", "43"), Ok(()));
}

#[rstest]
fn unknown_methods_are_failures(world: World) {
    world.call_method("{testCalculator}", "Divide", &["{1}"]);
    assert_eq!(world.assert_error("{result}"), Ok(()));
    assert_eq!(
        world.assert_contains("{result.message}", "Divide"),
        Ok(())
    );
}

#[rstest]
#[case("{nestedObject.level1.level2}", "deep-value")]
#[case("{deeplyNested.a.b.c.d}", "found")]
#[case("{userArray[1].address.city}", "Los Angeles")]
#[case("{arrayWithObjects[2].name}", "third")]
#[case("{sampleArray.length}", "2")]
#[case("{sampleStringArray[0].length}", "3")]
#[case("{sampleObject.age}", "30")]
fn paths_navigate_the_fixtures(world: World, #[case] field: &str, #[case] expected: &str) {
    assert_eq!(world.assert_equals(field, expected), Ok(()));
}

#[rstest]
fn missing_paths_are_null(world: World) {
    assert_eq!(world.assert_null("{nestedObject.level1.missing}"), Ok(()));
    assert_eq!(world.assert_null("{sampleArray[5]}"), Ok(()));
    assert_eq!(world.assert_not_null("{sampleObject}"), Ok(()));
}

#[rstest]
fn array_of_objects_contents(world: World) {
    let rows = table(&[&["name", "value"], &["Alice", "100"], &["Bob", "{200}"]]);
    assert_eq!(world.assert_array_contents("{sampleArray}", &rows), Ok(()));
    assert_eq!(world.assert_array_length("{sampleArray}", "2"), Ok(()));

    let reordered = table(&[&["name", "value"], &["Bob", "200"], &["Alice", "100"]]);
    assert!(matches!(
        world.assert_array_contents("{sampleArray}", &reordered),
        Err(AssertionError::Match(MatchError::Unmatched { .. }))
    ));
}

#[rstest]
fn array_of_objects_at_least(world: World) {
    let rows = table(&[&["name", "value"], &["Bob", "200"]]);
    assert_eq!(world.assert_array_at_least("{sampleArray}", &rows), Ok(()));

    let rows = table(&[&["id"], &["2"], &["3"]]);
    assert_eq!(
        world.assert_array_at_least("{arrayWithObjects}", &rows),
        Ok(())
    );
}

#[rstest]
fn array_of_objects_excludes(world: World) {
    let absent = table(&[&["id"], &["9"]]);
    assert_eq!(
        world.assert_array_excludes("{arrayWithObjects}", &absent),
        Ok(())
    );
    let present = table(&[&["id"], &["1"]]);
    assert!(world
        .assert_array_excludes("{arrayWithObjects}", &present)
        .is_err());
}

#[rstest]
fn nested_fields_in_tables(world: World) {
    let rows = table(&[
        &["name", "address.city", "address.zip"],
        &["Alice", "New York", "10001"],
        &["Bob", "Los Angeles", "90001"],
    ]);
    assert_eq!(world.assert_array_contents("{userArray}", &rows), Ok(()));
}

#[rstest]
fn string_arrays_and_empty_arrays(world: World) {
    let rows = table(&[&["value"], &["one"], &["two"], &["three"]]);
    assert_eq!(
        world.assert_string_array_values("{sampleStringArray}", &rows),
        Ok(())
    );
    assert_eq!(world.assert_empty("{sampleEmptyArray}"), Ok(()));
    assert_eq!(world.assert_array_length("{sampleEmptyArray}", "0"), Ok(()));
    assert!(world.assert_empty("{sampleObject}").is_err());
}

#[rstest]
fn object_contents(world: World) {
    let rows = table(&[&["name", "age"], &["John", "30"]]);
    assert_eq!(world.assert_object_contents("{sampleObject}", &rows), Ok(()));
}

#[rstest]
fn references_and_settings(world: World) {
    assert_eq!(world.refer_to("{sampleArray[0]}", "first"), Ok(()));
    assert_eq!(world.assert_equals("{first.name}", "Alice"), Ok(()));

    assert_eq!(world.set("answer", "{42}"), Ok(()));
    assert_eq!(world.get("answer"), Some(Value::Number(42.0)));
    assert_eq!(world.assert_greater_than("{answer}", "{41.5}"), Ok(()));
    assert_eq!(world.assert_less_than("{answer}", "100"), Ok(()));

    assert_eq!(world.set("enabled", "{true}"), Ok(()));
    assert_eq!(world.assert_true("{enabled}"), Ok(()));
    assert_eq!(world.set("disabled", "false"), Ok(()));
    assert_eq!(world.assert_false("{disabled}"), Ok(()));
}

#[rstest]
fn string_containment(world: World) {
    world.call_function("{twoArgFn}", &["hello ", "world"]);
    assert_eq!(world.assert_contains("{result}", "lo wo"), Ok(()));
    assert_eq!(
        world.assert_contains_one_of("{result}", &["planet", "world"]),
        Ok(())
    );
    assert_eq!(world.get(RESULT_KEY), Some(Value::from("hello world")));
}
