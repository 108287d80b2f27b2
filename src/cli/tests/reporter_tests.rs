use super::reporter::Reporter;
use jsz_common::Span;
use jsz_common::diagnostics::Diagnostic;

#[test]
fn test_formats_location_code_and_snippet() {
    let mut reporter = Reporter::new(false);
    reporter.add_source("a.js", "var a = 1;\nvar unused = 2;\n");
    let diagnostic = Diagnostic::warning("a.js", Span { start: 15, end: 21 }, "Dropping unused variable unused.", 3001);

    let rendered = reporter.format_diagnostic(&diagnostic);

    assert!(rendered.starts_with("a.js:2:5 - warning JSZ3001: Dropping unused variable unused."), "{rendered}");
    assert!(rendered.contains("\n    2   var unused = 2;\n"), "{rendered}");
    assert!(rendered.ends_with("            ~~~~~~"), "{rendered:?}");
}

#[test]
fn test_unknown_files_have_no_snippet() {
    let reporter = Reporter::new(false);
    let diagnostic = Diagnostic::error("missing.js", Span { start: 0, end: 1 }, "Boom.", 2001);

    assert_eq!(reporter.format_diagnostic(&diagnostic), "missing.js - error JSZ2001: Boom.");
}

#[test]
fn test_render_joins_diagnostics_by_line() {
    let reporter = Reporter::new(false);
    let diagnostics = vec![
        Diagnostic::error("x.js", Span { start: 0, end: 0 }, "One.", 1),
        Diagnostic::error("x.js", Span { start: 0, end: 0 }, "Two.", 2),
    ];
    assert_eq!(reporter.render(&diagnostics), "x.js - error JSZ1: One.\nx.js - error JSZ2: Two.");
}
