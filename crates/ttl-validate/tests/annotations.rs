//! Annotation-level tests: full source strings through parse and validate.

use ttl_validate::{parse_and_validate, ValidationCode};

fn assert_ok(source: &str) {
    let result = parse_and_validate(source, "annotations.js", 1, 0);
    assert!(
        result.parse_errors.is_empty(),
        "parse errors for `{source}`: {:?}",
        result.parse_errors
    );
    assert!(
        result.is_valid(),
        "warnings for `{source}`: {:?}",
        result.warnings
    );
}

#[test]
fn accepts_representative_annotations() {
    for source in [
        "T",
        "'Array'",
        "all()",
        "none()",
        "unknown()",
        "type('Array', T)",
        "type(T, 'number', 'string')",
        "union(T, S)",
        "union('number', 'string', 'boolean')",
        "record({a: 'number'})",
        "record({a: T, [k]: S, b: union(T, S)})",
        "rawTypeOf(T)",
        "templateTypeOf(T, 0)",
        "templateTypeOf(type('Array', 'number'), 1)",
        "cond(eq(T, S), T, S)",
        "cond(sub(T, 'number'), 'string', T)",
        "cond(streq(k, 'prop'), T, S)",
        "cond(streq(j, k), T, S)",
        "mapunion(T, (x) => x)",
        "mapunion(union(T, S), (x) => type('Array', x))",
        "maprecord(R, (k, v) => record({[k]: v}))",
        "typeOfVar(someVariable)",
        "mapunion(T, (x) => cond(eq(x, 'number'), none(), x))",
    ] {
        assert_ok(source);
    }
}

#[test]
fn rejects_representative_annotations() {
    for source in [
        "42",
        "(x) => x",
        "{a: T}",
        "eq(T, S)",
        "streq(a, b)",
        "notakeyword(T)",
        "type(T)",
        "union(T)",
        "none(T)",
        "record({})",
        "record(T)",
        "templateTypeOf(T, x)",
        "templateTypeOf(T, 1.5)",
        "cond(T, S, R)",
        "mapunion(T, S)",
        "mapunion(T, (x, y) => x)",
        "maprecord(R, (k) => k)",
        "typeOfVar('quoted')",
    ] {
        let result = parse_and_validate(source, "annotations.js", 1, 0);
        assert!(!result.is_valid(), "`{source}` should be rejected");
        assert!(
            !result.warnings.is_empty(),
            "`{source}` produced no warnings"
        );
    }
}

#[test]
fn an_invalid_annotation_reports_the_whole_context_chain() {
    let result = parse_and_validate(
        "cond(eq(T, type(union(S, R), S)), T, S)",
        "annotations.js",
        7,
        3,
    );
    assert!(!result.is_valid());
    let codes: Vec<_> = result.warnings.iter().map(|w| w.code).collect();
    assert_eq!(
        codes,
        vec![
            ValidationCode::Invalid,       // type name or type variable
            ValidationCode::InvalidInside, // template type operation
            ValidationCode::InvalidInside, // boolean
            ValidationCode::InvalidInside, // conditional
        ]
    );
    assert_eq!(result.position.line, 7);
    assert_eq!(result.position.column, 3);
}

#[test]
fn parse_failures_surface_both_errors_and_a_warning() {
    let result = parse_and_validate("type('Array',", "annotations.js", 1, 0);
    assert!(!result.is_valid());
    assert!(!result.parse_errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].code, ValidationCode::InvalidExpression);
}

#[test]
fn spans_point_into_the_annotation_source() {
    let source = "union(T, frobnicate(S))";
    let result = parse_and_validate(source, "annotations.js", 1, 0);
    assert!(!result.is_valid());
    // The innermost warning covers the offending call.
    let inner = &result.warnings[0];
    assert_eq!(&source[inner.span.range.clone()], "frobnicate(S)");
}
