use super::*;
use ttl_ast::{Node, NodeKind};

fn validate_src(src: &str) -> (Option<Term>, Vec<ValidationWarning>) {
    let parsed = ttl_parser::parse_str(src);
    let node = parsed.node.expect("parse failed");
    let mut validator = Validator::new();
    let term = validator.validate(&node);
    (term, validator.into_warnings())
}

fn assert_valid(src: &str) -> Term {
    let (term, warnings) = validate_src(src);
    assert!(warnings.is_empty(), "warnings for `{src}`: {warnings:?}");
    term.unwrap_or_else(|| panic!("`{src}` should be valid"))
}

fn assert_invalid(src: &str) -> Vec<ValidationWarning> {
    let (term, warnings) = validate_src(src);
    assert!(term.is_none(), "`{src}` should be invalid");
    assert!(!warnings.is_empty(), "`{src}` produced no warnings");
    warnings
}

fn codes(warnings: &[ValidationWarning]) -> Vec<ValidationCode> {
    warnings.iter().map(|w| w.code).collect()
}

#[test]
fn leaf_terms_are_always_valid() {
    assert!(matches!(assert_valid("T").kind, TermKind::TypeVar(ref v) if v == "T"));
    assert!(matches!(assert_valid("'Array'").kind, TermKind::TypeName(ref n) if n == "Array"));
}

#[test]
fn nullary_constructors() {
    assert!(matches!(assert_valid("all()").kind, TermKind::All));
    assert!(matches!(assert_valid("none()").kind, TermKind::None));
    assert!(matches!(assert_valid("unknown()").kind, TermKind::Unknown));
}

#[test]
fn nullary_constructor_rejects_arguments() {
    let warnings = assert_invalid("none(T)");
    assert_eq!(codes(&warnings), vec![ValidationCode::ExtraParam]);
    assert_eq!(warnings[0].subject, "none");
}

#[test]
fn arity_bounds_per_keyword() {
    // Below the minimum.
    for (src, subject) in [
        ("type('Array')", "type"),
        ("union(T)", "union"),
        ("record()", "record"),
        ("rawTypeOf()", "rawTypeOf"),
        ("templateTypeOf(T)", "templateTypeOf"),
        ("cond(eq(T, S), T)", "cond"),
        ("mapunion(T)", "mapunion"),
        ("maprecord(R)", "maprecord"),
        ("typeOfVar()", "typeOfVar"),
    ] {
        let warnings = assert_invalid(src);
        assert_eq!(warnings[0].code, ValidationCode::MissingParam, "for `{src}`");
        assert_eq!(warnings[0].subject, subject, "for `{src}`");
    }
    // Above the maximum.
    for (src, subject) in [
        ("record({a: T}, {b: T})", "record"),
        ("rawTypeOf(T, S)", "rawTypeOf"),
        ("templateTypeOf(T, 0, 1)", "templateTypeOf"),
        ("cond(eq(T, S), T, S, T)", "cond"),
        ("mapunion(T, (x) => x, T)", "mapunion"),
        ("maprecord(R, (k, v) => v, R)", "maprecord"),
        ("typeOfVar(x, y)", "typeOfVar"),
    ] {
        let warnings = assert_invalid(src);
        assert_eq!(warnings[0].code, ValidationCode::ExtraParam, "for `{src}`");
        assert_eq!(warnings[0].subject, subject, "for `{src}`");
    }
}

#[test]
fn unknown_keyword_is_an_invalid_expression() {
    let warnings = assert_invalid("frobnicate(T)");
    assert_eq!(codes(&warnings), vec![ValidationCode::InvalidExpression]);
    assert_eq!(warnings[0].subject, "type transformation");
}

#[test]
fn boolean_predicate_outside_cond_is_rejected() {
    let warnings = assert_invalid("eq(T, S)");
    assert_eq!(codes(&warnings), vec![ValidationCode::InvalidExpression]);
}

#[test]
fn bare_function_or_number_is_rejected() {
    assert_invalid("(x) => x");
    let parsed = ttl_parser::parse_str("42");
    let mut validator = Validator::new();
    assert!(validator.validate(&parsed.node.unwrap()).is_none());
}

#[test]
fn keyword_lookup_is_case_insensitive() {
    assert!(matches!(assert_valid("UNION(T, S)").kind, TermKind::Union(_)));
}

#[test]
fn templatized_base_must_be_name_or_string() {
    let warnings = assert_invalid("type(union(T, S), T)");
    assert_eq!(
        codes(&warnings),
        vec![ValidationCode::Invalid, ValidationCode::InvalidInside]
    );
    assert_eq!(warnings[0].subject, "type name or type variable");
    assert_eq!(warnings[1].subject, "template type operation");
}

#[test]
fn templatized_lowers_base_and_params() {
    let term = assert_valid("type('Array', T, S)");
    match term.kind {
        TermKind::Templatized { base, params } => {
            assert!(matches!(base.kind, TermKind::TypeName(ref n) if n == "Array"));
            assert_eq!(params.len(), 2);
        }
        other => panic!("expected templatized term, got {other:?}"),
    }
}

#[test]
fn invalid_union_member_reports_context() {
    let warnings = assert_invalid("union(T, frobnicate(S))");
    assert_eq!(
        codes(&warnings),
        vec![
            ValidationCode::InvalidExpression,
            ValidationCode::InvalidInside
        ]
    );
    assert_eq!(warnings[1].subject, "union type");
}

#[test]
fn template_type_of_index_must_be_a_number() {
    let warnings = assert_invalid("templateTypeOf(T, S)");
    assert_eq!(
        codes(&warnings),
        vec![ValidationCode::Invalid, ValidationCode::InvalidInside]
    );
    assert_eq!(warnings[0].subject, "index");
}

#[test]
fn template_type_of_index_must_be_an_integer() {
    assert_invalid("templateTypeOf(T, 1.5)");
}

#[test]
fn template_type_of_index_must_be_non_negative() {
    // A negative index cannot be written in the surface syntax, but the
    // validator also guards ASTs built programmatically.
    let node = Node {
        kind: NodeKind::Call {
            head: ttl_ast::Ident {
                name: "templateTypeOf".to_string(),
                span: Span::new(0, 14),
            },
            args: vec![
                Node {
                    kind: NodeKind::Name("T".to_string()),
                    span: Span::new(15, 16),
                },
                Node {
                    kind: NodeKind::Num(-1.0),
                    span: Span::new(18, 20),
                },
            ],
        },
        span: Span::new(0, 21),
    };
    let mut validator = Validator::new();
    assert!(validator.validate(&node).is_none());
    assert_eq!(validator.warnings()[0].subject, "index");
}

#[test]
fn template_type_of_lowers_index() {
    let term = assert_valid("templateTypeOf(type('Array', T), 0)");
    assert!(matches!(term.kind, TermKind::TemplateTypeOf { index: 0, .. }));
}

#[test]
fn record_argument_must_be_an_object_literal() {
    let warnings = assert_invalid("record(T)");
    assert_eq!(codes(&warnings), vec![ValidationCode::Invalid]);
    assert_eq!(warnings[0].subject, "record expression");
}

#[test]
fn record_requires_at_least_one_property() {
    let warnings = assert_invalid("record({})");
    assert_eq!(codes(&warnings), vec![ValidationCode::MissingParam]);
    assert_eq!(warnings[0].subject, "record expression");
}

#[test]
fn record_property_requires_a_value() {
    let warnings = assert_invalid("record({a})");
    assert_eq!(
        codes(&warnings),
        vec![ValidationCode::Invalid, ValidationCode::InvalidInside]
    );
    assert_eq!(warnings[0].subject, "property, missing type");
    assert_eq!(warnings[1].subject, "record");
}

#[test]
fn record_accepts_plain_and_computed_properties() {
    let term = assert_valid("record({a: T, [k]: S})");
    match term.kind {
        TermKind::Record(entries) => {
            assert_eq!(entries.len(), 2);
            assert!(matches!(&entries[0], RecordEntry::Plain { name, .. } if name == "a"));
            assert!(matches!(&entries[1], RecordEntry::Computed { key, .. } if key.name == "k"));
        }
        other => panic!("expected record term, got {other:?}"),
    }
}

#[test]
fn cond_requires_a_boolean_predicate_head() {
    let warnings = assert_invalid("cond(union(T, S), T, S)");
    assert_eq!(
        codes(&warnings),
        vec![ValidationCode::Invalid, ValidationCode::InvalidInside]
    );
    assert_eq!(warnings[0].subject, "boolean predicate");
    assert_eq!(warnings[1].subject, "conditional");
}

#[test]
fn cond_requires_a_call_in_predicate_position() {
    let warnings = assert_invalid("cond(T, T, S)");
    assert_eq!(warnings[0].code, ValidationCode::InvalidExpression);
    assert_eq!(warnings[0].subject, "boolean");
}

#[test]
fn cond_lowers_all_three_branches() {
    let term = assert_valid("cond(eq(T, 'number'), 'string', T)");
    match term.kind {
        TermKind::Cond { pred, .. } => {
            assert!(matches!(pred.kind, BoolKind::Eq(_, _)));
        }
        other => panic!("expected cond term, got {other:?}"),
    }
    assert_valid("cond(sub(T, S), T, S)");
}

#[test]
fn streq_accepts_names_and_nonempty_strings() {
    let term = assert_valid("cond(streq(k, 'foo'), T, S)");
    match term.kind {
        TermKind::Cond { pred, .. } => match pred.kind {
            BoolKind::StrEq(lhs, rhs) => {
                assert!(matches!(lhs, StrArg::Var(ref id) if id.name == "k"));
                assert!(matches!(rhs, StrArg::Lit { ref value, .. } if value == "foo"));
            }
            other => panic!("expected streq, got {other:?}"),
        },
        other => panic!("expected cond term, got {other:?}"),
    }
}

#[test]
fn streq_rejects_empty_string_literal() {
    let warnings = assert_invalid("cond(streq(k, ''), T, S)");
    assert_eq!(warnings[0].code, ValidationCode::Invalid);
    assert_eq!(warnings[0].subject, "string parameter");
}

#[test]
fn streq_rejects_non_string_arguments() {
    let warnings = assert_invalid("cond(streq(k, union(T, S)), T, S)");
    assert_eq!(warnings[0].code, ValidationCode::Invalid);
    assert_eq!(warnings[0].subject, "string");
}

#[test]
fn mapunion_requires_a_function_argument() {
    let warnings = assert_invalid("mapunion(T, S)");
    assert_eq!(
        codes(&warnings),
        vec![ValidationCode::Invalid, ValidationCode::InvalidInside]
    );
    assert_eq!(warnings[0].subject, "map function");
    assert_eq!(warnings[1].subject, "mapunion");
}

#[test]
fn mapunion_function_takes_exactly_one_parameter() {
    let missing = assert_invalid("mapunion(T, () => S)");
    assert_eq!(missing[0].code, ValidationCode::MissingParam);
    assert_eq!(missing[0].subject, "map function");

    let extra = assert_invalid("mapunion(T, (x, y) => x)");
    assert_eq!(extra[0].code, ValidationCode::ExtraParam);
}

#[test]
fn mapunion_body_must_be_valid() {
    let warnings = assert_invalid("mapunion(T, (x) => frobnicate(x))");
    assert!(warnings
        .iter()
        .any(|w| w.code == ValidationCode::InvalidInside && w.subject == "map function body"));
}

#[test]
fn mapunion_lowers_binder_and_body() {
    let term = assert_valid("mapunion(T, (x) => type('Array', x))");
    match term.kind {
        TermKind::Mapunion { binder, .. } => assert_eq!(binder.name, "x"),
        other => panic!("expected mapunion term, got {other:?}"),
    }
}

#[test]
fn maprecord_function_takes_exactly_two_parameters() {
    let missing = assert_invalid("maprecord(R, (k) => k)");
    assert_eq!(missing[0].code, ValidationCode::MissingParam);

    let extra = assert_invalid("maprecord(R, (k, v, w) => v)");
    assert_eq!(extra[0].code, ValidationCode::ExtraParam);
}

#[test]
fn maprecord_lowers_both_binders() {
    let term = assert_valid("maprecord(R, (k, v) => record({[k]: v}))");
    match term.kind {
        TermKind::Maprecord { key, value, .. } => {
            assert_eq!(key.name, "k");
            assert_eq!(value.name, "v");
        }
        other => panic!("expected maprecord term, got {other:?}"),
    }
}

#[test]
fn type_of_var_requires_a_name() {
    let warnings = assert_invalid("typeOfVar('x')");
    assert_eq!(
        codes(&warnings),
        vec![ValidationCode::Invalid, ValidationCode::InvalidInside]
    );
    assert_eq!(warnings[0].subject, "name");
    assert_eq!(warnings[1].subject, "typeOfVar");
}

#[test]
fn nested_invalidity_reports_every_level() {
    // The inner failure warns, then each enclosing form adds its context.
    let warnings = assert_invalid("union(T, type(union(S, T), S))");
    assert_eq!(
        codes(&warnings),
        vec![
            ValidationCode::Invalid,
            ValidationCode::InvalidInside,
            ValidationCode::InvalidInside
        ]
    );
    assert_eq!(warnings[2].subject, "union type");
}

#[test]
fn parse_and_validate_reports_parse_failures() {
    let result = parse_and_validate("union(T,", "test.js", 3, 1);
    assert!(!result.is_valid());
    assert!(!result.parse_errors.is_empty());
    assert_eq!(
        result.warnings[0].code,
        ValidationCode::InvalidExpression
    );
    assert_eq!(result.position.file, "test.js");
    assert_eq!(result.position.line, 3);
}

#[test]
fn parse_and_validate_accepts_a_full_annotation() {
    let result = parse_and_validate(
        "cond(eq(T, 'number'), 'string', mapunion(T, (x) => x))",
        "test.js",
        1,
        0,
    );
    assert!(result.is_valid());
    assert!(result.parse_errors.is_empty());
    assert!(result.warnings.is_empty());
}
