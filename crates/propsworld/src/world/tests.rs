//! Unit tests for the scenario world.

use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use super::*;
use crate::failure::FailureKind;
use crate::invoke::ParamType;
use crate::matching::MatchError;
use crate::rows::ExpectedRow;

#[fixture]
fn world() -> World {
    let config = Config::default()
        .with_default_timeout(Duration::from_secs(5))
        .with_worker_threads(2);
    World::with_config(config).unwrap_or_else(|err| panic!("world should start: {err}"))
}

fn failure_kind(value: &Value) -> Option<FailureKind> {
    value.as_failure().map(Failure::kind)
}

#[rstest]
fn call_surfaces_record_failures_instead_of_returning_them(world: World) {
    let value = world.call_function("{missing}", &[]);
    assert_eq!(failure_kind(&value), Some(FailureKind::NotCallable));
    assert_eq!(world.get(RESULT_KEY), Some(value));

    let value = world.call_function("{bad..path}", &[]);
    assert_eq!(failure_kind(&value), Some(FailureKind::Resolution));
}

#[rstest]
fn call_method_dispatches_on_record_fields(world: World) {
    let shout = Callable::function("shout", [ParamType::TEXT], |args| {
        let text = args.first().and_then(Value::as_str).unwrap_or_default();
        Ok(Awaitable::ready(text.to_uppercase()))
    });
    world
        .store()
        .set("speaker", Value::record([("shout", Value::from(shout))]));
    let value = world.call_method("{speaker}", "shout", &["hi"]);
    assert_eq!(value, Value::from("HI"));
}

#[rstest]
fn refer_to_and_set_copy_resolved_values(world: World) {
    world.store().set("source", Value::record([("id", "x1")]));
    assert_eq!(world.refer_to("{source.id}", "copy"), Ok(()));
    assert_eq!(world.get("copy"), Some(Value::from("x1")));
    assert_eq!(world.set("flag", "{true}"), Ok(()));
    assert_eq!(world.get("flag"), Some(Value::Bool(true)));
    assert!(world.set("flag", "{a..b}").is_err());
}

#[rstest]
fn invocation_counter_counts_every_call(world: World) {
    world.invocation_counter("handler", "count");
    assert_eq!(world.get("count"), Some(Value::Integer(0)));
    for _ in 0..3 {
        assert_eq!(world.call_function("{handler}", &[]), Value::Null);
    }
    assert_eq!(world.get("count"), Some(Value::Integer(3)));
}

#[rstest]
fn invocation_counter_is_atomic_across_tasks(world: World) {
    world.invocation_counter("handler", "count");
    let names: Vec<String> = (0..16).map(|n| format!("job{n}")).collect();
    for name in &names {
        world.start_task("{handler}", &[], name);
    }
    for name in &names {
        assert_eq!(world.wait_for_task(name), Ok(Value::Null));
    }
    assert_eq!(world.get("count"), Some(Value::Integer(16)));
}

#[rstest]
fn async_functions_settle_with_their_value(world: World) {
    assert_eq!(world.async_function_returning("now", "ready"), Ok(()));
    assert_eq!(world.wait_for("{now}", &[]), Value::from("ready"));

    assert_eq!(
        world.async_function_returning_after("later", "{42}", Duration::from_millis(20)),
        Ok(())
    );
    assert_eq!(world.wait_for("{later}", &[]), Value::Number(42.0));
}

#[rstest]
fn bounded_waits_time_out(world: World) {
    world
        .async_function_returning_after("slow", "done", Duration::from_millis(500))
        .unwrap_or_else(|err| panic!("value should resolve: {err}"));
    let started = Instant::now();
    let value = world.wait_for_within("{slow}", &[], Duration::from_millis(20));
    assert!(started.elapsed() < Duration::from_millis(400));
    assert_eq!(failure_kind(&value), Some(FailureKind::Timeout));
    assert_eq!(world.get(RESULT_KEY), Some(value));
}

#[rstest]
fn unresolvable_task_arguments_settle_the_task_as_failed(world: World) {
    world.start_task("{handler}", &["{x[}"], "broken");
    let value = world
        .wait_for_task("broken")
        .unwrap_or_else(|err| panic!("task should exist: {err}"));
    assert_eq!(failure_kind(&value), Some(FailureKind::Resolution));
    assert_eq!(world.get("broken"), Some(value));
}

#[rstest]
fn waiting_for_an_unknown_task_is_an_error(world: World) {
    assert_eq!(
        world.wait_for_task("ghost"),
        Err(TaskError::UnknownTask {
            name: "ghost".into()
        })
    );
}

#[rstest]
fn assertions_report_the_subject(world: World) {
    world.store().set("name", "Ann");
    assert_eq!(world.assert_equals("{name}", "Ann"), Ok(()));
    let Err(err) = world.assert_equals("{name}", "Bob") else {
        panic!("Ann is not Bob");
    };
    assert!(err.to_string().starts_with("`{name}`: expected 'Bob'"));
}

#[rstest]
fn null_prints_as_null_in_equality(world: World) {
    assert_eq!(world.assert_equals("{nothing}", "null"), Ok(()));
    assert_eq!(world.assert_null("{nothing}"), Ok(()));
    assert!(world.assert_not_null("{nothing}").is_err());
}

#[rstest]
#[case(Value::Null, true)]
#[case(Value::from(""), true)]
#[case(Value::sequence(Vec::<Value>::new()), true)]
#[case(Value::sequence(["a"]), false)]
#[case(Value::Integer(0), false)]
fn emptiness(world: World, #[case] value: Value, #[case] empty: bool) {
    world.store().set("subject", value);
    assert_eq!(world.assert_empty("{subject}").is_ok(), empty);
}

#[rstest]
fn numeric_comparisons_parse_printed_values(world: World) {
    world.store().set("score", 7.5);
    assert_eq!(world.assert_greater_than("{score}", "{7}"), Ok(()));
    assert_eq!(world.assert_less_than("{score}", "9"), Ok(()));
    assert!(world.assert_less_than("{score}", "{8}").is_err());
    assert!(matches!(
        world.assert_greater_than("{score}", "lots"),
        Err(AssertionError::NotNumeric { ref text, .. }) if text == "lots"
    ));
}

#[rstest]
fn error_messages_come_from_the_root_cause(world: World) {
    let failing = Callable::supplier("failing", || {
        Err(Failure::raised("outer").caused_by(Failure::raised("inner")))
    });
    world.store().set("failing", failing);
    world.call_function("{failing}", &[]);
    assert_eq!(world.assert_error("{result}"), Ok(()));
    assert_eq!(world.assert_error_with_message("{result}", "inner"), Ok(()));
    assert!(world.assert_error_with_message("{result}", "outer").is_err());
    assert!(world.assert_not_error("{result}").is_err());
    assert_eq!(world.assert_equals("{result.message}", "outer"), Ok(()));
}

#[rstest]
fn contains_checks_printed_text(world: World) {
    world.store().set("greeting", "hello world");
    assert_eq!(world.assert_contains("{greeting}", "lo wo"), Ok(()));
    assert_eq!(
        world.assert_contains_one_of("{greeting}", &["xyz", "world"]),
        Ok(())
    );
    assert!(world.assert_contains_one_of("{greeting}", &["xyz"]).is_err());
}

#[rstest]
fn string_arrays_match_by_value_column(world: World) {
    world.store().set("words", Value::sequence(["one", "two"]));
    let rows = [
        ExpectedRow::from_pairs([("value", "one")]),
        ExpectedRow::from_pairs([("value", "two")]),
    ];
    assert_eq!(world.assert_string_array_values("{words}", &rows), Ok(()));
    assert_eq!(world.assert_array_length("{words}", "2"), Ok(()));
    assert!(world.assert_array_length("{words}", "3").is_err());
}

#[rstest]
fn object_contents_use_the_first_row(world: World) {
    world
        .store()
        .set("person", Value::record([("name", "John"), ("city", "Hull")]));
    let john = ExpectedRow::from_pairs([("name", "John")]);
    let nobody = ExpectedRow::from_pairs([("name", "Nobody")]);
    assert_eq!(
        world.assert_object_contents("{person}", &[john.clone(), nobody.clone()]),
        Ok(())
    );
    assert_eq!(world.assert_object_contents("{person}", &[]), Ok(()));
    assert_eq!(
        world.assert_object_contents("{person}", &[nobody.clone(), john]),
        Err(AssertionError::Match(MatchError::MissingRow { row: nobody }))
    );
}
