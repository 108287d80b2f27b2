use crate::evaluate::ConstantValue;
use crate::{Analysis, analyze};
use jsz_binder::{BinderOptions, BinderState};
use jsz_common::LineMap;
use jsz_parser::{NodeIndex, ParseOutput, ParserState, descendants};

fn analyze_source(source: &str, toplevel: bool) -> (ParseOutput, BinderState, Analysis) {
    let output = ParserState::new("test.js".to_string(), source.to_string()).parse();
    assert!(
        !output.diagnostics.has_errors(),
        "unexpected parse errors: {:?}",
        output.diagnostics.diagnostics()
    );
    let mut binder = BinderState::new("test.js", BinderOptions::default());
    let line_map = LineMap::build(source);
    if let Err(err) = binder.bind_source_file(&output.arena, output.root, &line_map) {
        panic!("unexpected bind error: {err}");
    }
    let analysis = analyze(&output.arena, &mut binder, output.root, toplevel);
    (output, binder, analysis)
}

/// Last identifier named `name`, which the cases below arrange to be the
/// read under test.
fn last_ident(output: &ParseOutput, name: &str) -> NodeIndex {
    descendants(&output.arena, output.root)
        .into_iter()
        .filter(|&idx| output.arena.identifier_name(idx) == Some(name))
        .last()
        .unwrap_or_else(|| panic!("no identifier {name}"))
}

fn value_of_last(source: &str, name: &str) -> Option<ConstantValue> {
    let (output, binder, analysis) = analyze_source(source, false);
    let read = last_ident(&output, name);
    analysis.constant_value(&output.arena, &binder, read)
}

#[test]
fn test_straight_line_value_is_known() {
    assert_eq!(
        value_of_last("function f() { var a = 1; return a; }", "a"),
        Some(ConstantValue::Number(1.0))
    );
}

#[test]
fn test_conditional_reassignment_makes_read_unsafe() {
    let source = "function outer() { let y = 1; if (cond) { y = 2; } return y; }";
    let (output, _, analysis) = analyze_source(source, false);
    assert!(analysis.fixed_value(last_ident(&output, "y")).is_none());
}

#[test]
fn test_compound_assignment_chains_fold() {
    assert_eq!(
        value_of_last("function f() { var a = 1; a += 2; return a; }", "a"),
        Some(ConstantValue::Number(3.0))
    );
    assert_eq!(
        value_of_last("function f() { var a = 1; a++; return a; }", "a"),
        Some(ConstantValue::Number(2.0))
    );
}

#[test]
fn test_loop_updates_are_not_trusted_after_the_loop() {
    assert_eq!(
        value_of_last("function f() { var i = 0; while (g()) { i++; } return i; }", "i"),
        None
    );
}

#[test]
fn test_iife_parameters_take_their_arguments() {
    assert_eq!(
        value_of_last("(function (a) { return a; })(5);", "a"),
        Some(ConstantValue::Number(5.0))
    );
    assert_eq!(
        value_of_last("(function (a, b) { return b; })(5);", "b"),
        Some(ConstantValue::Undefined)
    );
}

#[test]
fn test_arguments_use_keeps_iife_parameters_unknown() {
    assert_eq!(
        value_of_last("(function (a) { return arguments.length + a; })(5);", "a"),
        None
    );
}

#[test]
fn test_writes_from_closures_clear_the_binding() {
    assert_eq!(
        value_of_last("function f() { var x = 1; g(function () { x = 2; }); return x; }", "x"),
        None
    );
}

#[test]
fn test_script_globals_are_exposed_unless_toplevel() {
    let source = "var a = 1; f(a);";
    let (output, binder, analysis) = analyze_source(source, false);
    assert_eq!(analysis.constant_value(&output.arena, &binder, last_ident(&output, "a")), None);

    let (output, binder, analysis) = analyze_source(source, true);
    assert_eq!(
        analysis.constant_value(&output.arena, &binder, last_ident(&output, "a")),
        Some(ConstantValue::Number(1.0))
    );
}

#[test]
fn test_eval_pins_bindings() {
    assert_eq!(
        value_of_last("function f() { var a = 1; eval('a = 2'); return a; }", "a"),
        None
    );
}

#[test]
fn test_escaped_objects_do_not_fold_properties() {
    let source = "function f() { var o = { p: 1 }; g(o); return o.p; }";
    let (output, binder, analysis) = analyze_source(source, false);
    let read = last_ident(&output, "o");
    assert!(analysis.property_value(&output.arena, &binder, read, "p").is_none());

    let source = "function f() { var o = { p: 1 }; return o.p; }";
    let (output, binder, analysis) = analyze_source(source, false);
    let read = last_ident(&output, "o");
    assert_eq!(
        analysis.property_value(&output.arena, &binder, read, "p"),
        Some(ConstantValue::Number(1.0))
    );
}

#[test]
fn test_write_after_labeled_break_is_not_trusted() {
    let source = "function f(c) { var x = 0; a: { if (c) break a; x = 1; } return x; }";
    assert_eq!(value_of_last(source, "x"), None);
}

#[test]
fn test_writes_inside_optional_chains_are_conditional() {
    for source in [
        "function f(o) { var x = 0; o?.m(x = 1); return x; }",
        "function f(o) { var x = 0; o?.a.m(x = 1); return x; }",
        "function f(o) { var x = 0; o?.[x = 1]; return x; }",
    ] {
        assert_eq!(value_of_last(source, "x"), None, "{source}");
    }
}

#[test]
fn test_non_optional_call_arguments_still_dominate() {
    assert_eq!(
        value_of_last("function f(o) { var x = 0; o.m(x = 1); return x; }", "x"),
        Some(ConstantValue::Number(1.0))
    );
}
