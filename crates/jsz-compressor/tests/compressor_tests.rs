use crate::{CompressOptions, CompressOutput, Compressor, RetainPredicate};
use jsz_binder::BinderOptions;
use jsz_common::LineMap;
use jsz_common::diagnostics::diagnostic_codes;
use jsz_emitter::Printer;
use jsz_parser::ParserState;

fn compress_with(source: &str, options: &CompressOptions) -> (String, CompressOutput) {
    let output = ParserState::new("test.js".to_string(), source.to_string()).parse();
    assert!(!output.diagnostics.has_errors(), "parse errors in {source}");
    let mut arena = output.arena;
    let line_map = LineMap::build(source);
    let compressor = Compressor::new("test.js", &line_map, BinderOptions::default(), options);
    let result = compressor
        .compress(&mut arena, output.root)
        .unwrap_or_else(|err| panic!("bind error: {err}"));
    (Printer::print(&arena, output.root), result)
}

fn compress(source: &str) -> String {
    compress_with(source, &CompressOptions::default()).0
}

fn toplevel() -> CompressOptions {
    CompressOptions {
        toplevel: true,
        ..CompressOptions::default()
    }
}

fn codes(output: &CompressOutput) -> Vec<u32> {
    output.diagnostics.diagnostics().iter().map(|d| d.code).collect()
}

#[test]
fn test_folds_straight_line_constants() {
    assert_eq!(
        compress("function f() { var a = 1; return a + 2; } f();"),
        "function f(){return 1+2}f()"
    );
}

#[test]
fn test_folds_compound_assignment_chain() {
    assert_eq!(
        compress("function f() { var a = 1; a += 2; return a; } f();"),
        "function f(){return 3}f()"
    );
}

#[test]
fn test_keeps_conditionally_reassigned_binding() {
    let code = compress("function outer() { let y = 1; if (cond) { y = 2; } return y; } outer();");
    assert!(code.contains("return y"), "{code}");
    assert!(code.contains("y=2"), "{code}");
}

#[test]
fn test_keeps_loop_counter() {
    let code = compress("function f() { var i = 0; while (g()) { i++; } return i; } f();");
    assert!(code.contains("return i"), "{code}");
}

#[test]
fn test_drops_code_after_return() {
    let (code, output) = compress_with(
        "function f() { return 1; var x = 2; g(); function h() {} } f();",
        &CompressOptions::default(),
    );
    assert_eq!(code, "function f(){return 1}f()");
    assert!(codes(&output).contains(&diagnostic_codes::DROPPING_UNREACHABLE_CODE));
}

#[test]
fn test_folds_constant_if() {
    let (code, output) = compress_with("if (false) { a(); } else { b(); }", &CompressOptions::default());
    assert_eq!(code, "b()");
    assert!(
        output
            .diagnostics
            .diagnostics()
            .iter()
            .any(|d| d.message == "Condition always false.")
    );
}

#[test]
fn test_trims_trailing_parameters() {
    assert_eq!(
        compress("function f(a, b, c) { return a; } f(1, 2, 3);"),
        "function f(a){return a}f(1,2,3)"
    );
}

#[test]
fn test_keeps_parameters_when_arguments_is_used() {
    let code = compress("function f(a, b) { return arguments[0]; } f(1, 2);");
    assert_eq!(code, "function f(a,b){return arguments[0]}f(1,2)");
}

#[test]
fn test_duplicate_var_keeps_initializer_effects() {
    let (code, output) = compress_with("var x = f(); var x = g();", &toplevel());
    assert_eq!(code, "f(),g()");
    let effects = codes(&output)
        .into_iter()
        .filter(|&code| code == diagnostic_codes::SIDE_EFFECTS_IN_UNUSED_INITIALIZER)
        .count();
    assert_eq!(effects, 2);
}

#[test]
fn test_unused_class_keeps_heritage_effects() {
    assert_eq!(compress_with("class A extends f() {}", &toplevel()).0, "f()");
}

#[test]
fn test_script_globals_survive_without_toplevel() {
    assert_eq!(compress("var x = 1;"), "var x=1");
}

#[test]
fn test_retain_predicate_keeps_top_level_names() {
    let options = CompressOptions {
        toplevel: true,
        retain: Some(RetainPredicate::new(|name| name == "keep")),
        ..CompressOptions::default()
    };
    assert_eq!(compress_with("var keep = 1, drop = 2;", &options).0, "var keep=1");
}

#[test]
fn test_dead_store_then_declaration() {
    assert_eq!(
        compress("function f() { var x; x = g(); } f();"),
        "function f(){g()}f()"
    );
}

#[test]
fn test_folds_property_of_local_object() {
    assert_eq!(
        compress("function f() { var o = { a: 1 }; return o.a; } f();"),
        "function f(){return 1}f()"
    );
}

#[test]
fn test_disabled_passes_leave_tree_alone() {
    let options = CompressOptions {
        drop_unused: false,
        dead_code: false,
        reduce_vars: false,
        inline_constants: false,
        ..CompressOptions::default()
    };
    let (code, output) = compress_with("function f() { var a = 1; return a; } f();", &options);
    assert_eq!(code, "function f(){var a=1;return a}f()");
    assert_eq!(output.changes, 0);
}

#[test]
fn test_rounds_stop_at_fixpoint() {
    let options = CompressOptions {
        passes: 5,
        ..CompressOptions::default()
    };
    let (_, output) = compress_with("f();", &options);
    assert_eq!(output.rounds, 1);
}

#[test]
fn test_labeled_break_keeps_earlier_value_reachable() {
    let code = compress("function f(c) { var x = 0; a: { if (c) break a; x = 1; } return x; } f();");
    assert!(code.contains("return x"), "{code}");
}

#[test]
fn test_optional_call_arguments_do_not_fold() {
    let code = compress("function f(o) { var x = 0; o?.m(x = 1); return x; } f();");
    assert!(code.contains("return x"), "{code}");
}

#[test]
fn test_parameter_store_observed_through_arguments() {
    assert_eq!(
        compress("function f(a) { a = 2; return arguments[0]; } f(1);"),
        "function f(a){a=2;return arguments[0]}f(1)"
    );
}
