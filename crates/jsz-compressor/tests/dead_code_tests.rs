use crate::{CompressOptions, CompressOutput, Compressor};
use jsz_binder::BinderOptions;
use jsz_common::LineMap;
use jsz_common::diagnostics::diagnostic_codes;
use jsz_emitter::Printer;
use jsz_parser::ParserState;

/// Dead code removal on literal conditions only.
fn remove_dead_code(source: &str) -> (String, CompressOutput) {
    let output = ParserState::new("test.js".to_string(), source.to_string()).parse();
    assert!(!output.diagnostics.has_errors(), "parse errors in {source}");
    let mut arena = output.arena;
    let line_map = LineMap::build(source);
    let options = CompressOptions {
        drop_unused: false,
        reduce_vars: false,
        inline_constants: false,
        ..CompressOptions::default()
    };
    let result = Compressor::new("test.js", &line_map, BinderOptions::default(), &options)
        .compress(&mut arena, output.root)
        .unwrap_or_else(|err| panic!("bind error: {err}"));
    (Printer::print(&arena, output.root), result)
}

fn has_code(output: &CompressOutput, code: u32) -> bool {
    output.diagnostics.diagnostics().iter().any(|d| d.code == code)
}

#[test]
fn test_takes_the_true_branch() {
    let (code, output) = remove_dead_code("if (1) { a(); } else { b(); }");
    assert_eq!(code, "a()");
    assert!(has_code(&output, diagnostic_codes::CONDITION_ALWAYS));
}

#[test]
fn test_false_branch_without_else_disappears() {
    let (code, _) = remove_dead_code("if (0) a(); b();");
    assert_eq!(code, "b()");
}

#[test]
fn test_var_in_dropped_branch_is_hoisted() {
    let (code, _) = remove_dead_code("if (false) { var x = f(); } g(x);");
    assert_eq!(code, "var x;g(x)");
}

#[test]
fn test_lexical_block_stays_a_block() {
    let (code, _) = remove_dead_code("if (true) { let a = f(); g(a); }");
    assert_eq!(code, "{let a=f();g(a)}");
}

#[test]
fn test_impure_condition_is_left_alone() {
    let (code, output) = remove_dead_code("if (f()) a();");
    assert_eq!(code, "if(f())a()");
    assert!(!has_code(&output, diagnostic_codes::CONDITION_ALWAYS));
}

#[test]
fn test_conditional_expression_folds() {
    let (code, _) = remove_dead_code("x = 0 ? a : b;");
    assert_eq!(code, "x=b");
}

#[test]
fn test_while_false_is_removed() {
    let (code, _) = remove_dead_code("while (false) { f(); } g();");
    assert_eq!(code, "g()");
}

#[test]
fn test_unreachable_statements_after_throw() {
    let (code, output) = remove_dead_code("function f() { throw e; g(); } f();");
    assert_eq!(code, "function f(){throw e}f()");
    assert!(has_code(&output, diagnostic_codes::DROPPING_UNREACHABLE_CODE));
}

#[test]
fn test_hoisted_declarations_survive_unreachable_code() {
    let (code, output) = remove_dead_code("function f() { return h(); var v = 1; function h() {} } f();");
    assert_eq!(code, "function f(){return h();var v;function h(){}}f()");
    assert!(has_code(&output, diagnostic_codes::DECLARATIONS_IN_UNREACHABLE_CODE));
}
