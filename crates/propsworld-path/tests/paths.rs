//! Property path and expression parsing through the public API.

#![expect(clippy::expect_used, reason = "test asserts parse results")]

use propsworld_path::{Expression, PathErrorKind, PropertyPath, Segment, parse_expression};

#[test]
fn literal_expressions_are_returned_verbatim() {
    for text in ["hello", "", "a.b[0]", "{ spaced", "42"] {
        assert_eq!(
            parse_expression(text).expect("literal should parse"),
            Expression::Literal(text)
        );
    }
}

#[test]
fn braced_numbers_are_floats() {
    assert_eq!(
        parse_expression("{100}").expect("number should parse"),
        Expression::Number(100.0)
    );
}

#[test]
fn braced_paths_expose_segments() {
    let Expression::Path(path) =
        parse_expression("{userArray[1].address.city}").expect("path should parse")
    else {
        panic!("expected a path expression");
    };
    assert_eq!(
        path.segments(),
        [
            Segment::new("userArray", vec![1]),
            Segment::new("address", vec![]),
            Segment::new("city", vec![]),
        ]
    );
}

#[test]
fn malformed_braced_paths_surface_errors() {
    let err = parse_expression("{items[oops]}").expect_err("path should be rejected");
    assert_eq!(err.kind(), PathErrorKind::MissingIndexDigits);
    assert_eq!(err.path(), "items[oops]");
    assert!(err.to_string().contains("expected index digits"));
}

#[test]
fn field_names_with_hyphens_and_spaces_are_accepted() {
    let path = PropertyPath::parse("first name.zip-code").expect("path should parse");
    assert_eq!(path.segments().len(), 2);
    assert_eq!(
        path.segments().first().map(Segment::name),
        Some("first name")
    );
}
