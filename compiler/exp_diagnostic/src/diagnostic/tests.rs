use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E2003)
        .with_message("test error")
        .with_label(Span::new(0, 5), "here")
        .with_note("some context");

    assert_eq!(diag.code, ErrorCode::E2003);
    assert_eq!(diag.message, "test error");
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 1);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn test_expected_token_points_at_offset() {
    let diag = expected_token(8, "`;`");
    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.primary_span(), Some(Span::point(8)));
    assert!(diag.message.contains("`;`"));
    assert!(diag.message.contains('8'));
}

#[test]
fn test_type_mismatch_names_both_types() {
    let diag = type_mismatch(Span::new(10, 15), "Int", "Bool", "return value");
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.message, "can't assign Bool to Int");
    assert_eq!(diag.primary_span(), Some(Span::new(10, 15)));
}

#[test]
fn test_duplicate_name_has_secondary_label() {
    let diag = duplicate_name(Span::new(20, 24), Span::new(2, 6), "A", "size");
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert!(!diag.labels[1].is_primary);
}

#[test]
fn test_display() {
    let diag = unknown_identifier(Span::new(3, 4), "x");
    let text = diag.to_string();
    assert!(text.starts_with("error [E2003]: cannot find `x`"));
    assert!(text.contains("--> 3..4: not found"));
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E2005);
    assert!(!diag.is_error());
}

#[test]
fn test_semantic_helpers_use_their_codes() {
    assert_eq!(unknown_member(Span::DUMMY, "A", "c").code, ErrorCode::E2004);
    assert_eq!(cannot_infer(Span::DUMMY, "x").code, ErrorCode::E2005);
    assert_eq!(unknown_type(Span::DUMMY, "Foo").code, ErrorCode::E2008);
    let diag = undefined_operator(Span::new(0, 8), "+", "Int", "Bool");
    assert_eq!(diag.code, ErrorCode::E2007);
    assert_eq!(diag.message, "operator `+` is not defined for `Int` and `Bool`");
}

#[test]
fn test_wrong_arg_count_message() {
    let exact = wrong_arg_count(Span::new(0, 4), "f", 2, 2, 3);
    assert_eq!(exact.code, ErrorCode::E2002);
    assert_eq!(exact.message, "`f` takes 2 argument(s) but 3 were supplied");
    let ranged = wrong_arg_count(Span::new(0, 4), "g", 1, 3, 0);
    assert_eq!(ranged.message, "`g` takes 1 to 3 argument(s) but 0 were supplied");
}
