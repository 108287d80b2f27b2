use super::*;

#[test]
fn test_format_message_substitutes_placeholders() {
    assert_eq!(
        format_message(diagnostic_messages::REDECLARATION, &["x"]),
        "Identifier 'x' has already been declared."
    );
    assert_eq!(format_message("{0} and {1}", &["a", "b"]), "a and b");
}

#[test]
fn test_bag_counts_by_severity() {
    let mut bag = DiagnosticBag::with_file("input.js");
    bag.error(Span::new(0, 1), "bad", diagnostic_codes::UNEXPECTED_TOKEN);
    bag.warning(
        Span::new(2, 3),
        "meh",
        diagnostic_codes::DROPPING_UNUSED_VARIABLE,
    );
    bag.warning(
        Span::new(4, 5),
        "meh again",
        diagnostic_codes::DROPPING_UNUSED_VARIABLE,
    );

    assert_eq!(bag.len(), 3);
    assert!(bag.has_errors());
    assert_eq!(bag.error_count(), 1);
    assert_eq!(bag.warning_count(), 2);
    assert_eq!(
        bag.with_code(diagnostic_codes::DROPPING_UNUSED_VARIABLE)
            .count(),
        2
    );
    assert!(bag.iter().all(|d| d.file_name == "input.js"));
}

#[test]
fn test_format_uses_one_based_line_and_column() {
    let source = "var a;\nvar b = 1;";
    let map = LineMap::build(source);
    let diagnostic = Diagnostic::warning(
        "input.js",
        Span::new(11, 12),
        "Dropping unused variable 'b'.",
        diagnostic_codes::DROPPING_UNUSED_VARIABLE,
    );
    assert_eq!(
        diagnostic.format(&map),
        "input.js:2:5: warning JSZ3001: Dropping unused variable 'b'."
    );
}

#[test]
fn test_extend_merges_counts() {
    let mut a = DiagnosticBag::new();
    a.error(Span::at(0), "x", 1);
    let mut b = DiagnosticBag::new();
    b.warning(Span::at(0), "y", 3001);
    a.extend(b);
    assert_eq!(a.error_count(), 1);
    assert_eq!(a.warning_count(), 1);
    a.clear();
    assert!(a.is_empty());
    assert!(!a.has_errors());
}
