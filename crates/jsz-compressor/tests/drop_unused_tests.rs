use crate::{CompressOptions, Compressor};
use jsz_binder::BinderOptions;
use jsz_common::LineMap;
use jsz_common::diagnostics::diagnostic_codes;
use jsz_emitter::Printer;
use jsz_parser::ParserState;

/// Only unused-binding elimination, so other rewrites do not mask it.
fn eliminate(source: &str, module: bool) -> (String, Vec<u32>) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    parser.set_module(module);
    let output = parser.parse();
    assert!(!output.diagnostics.has_errors(), "parse errors in {source}");
    let mut arena = output.arena;
    let line_map = LineMap::build(source);
    let options = CompressOptions {
        toplevel: true,
        reduce_vars: false,
        inline_constants: false,
        dead_code: false,
        ..CompressOptions::default()
    };
    let binder_options = BinderOptions {
        is_module: module,
        ..BinderOptions::default()
    };
    let result = Compressor::new("test.js", &line_map, binder_options, &options)
        .compress(&mut arena, output.root)
        .unwrap_or_else(|err| panic!("bind error: {err}"));
    let codes = result.diagnostics.diagnostics().iter().map(|d| d.code).collect();
    (Printer::print(&arena, output.root), codes)
}

#[test]
fn test_drops_unreferenced_declarations() {
    let (code, codes) = eliminate("var a = 1; function b() {} class C {} use();", false);
    assert_eq!(code, "use()");
    assert!(codes.contains(&diagnostic_codes::DROPPING_UNUSED_VARIABLE));
    assert!(codes.contains(&diagnostic_codes::DROPPING_UNUSED_FUNCTION));
    assert!(codes.contains(&diagnostic_codes::DROPPING_UNUSED_CLASS));
}

#[test]
fn test_keeps_referenced_declarations() {
    let (code, _) = eliminate("var a = 1; use(a);", false);
    assert_eq!(code, "var a=1;use(a)");
}

#[test]
fn test_self_recursive_function_is_still_unused() {
    let (code, _) = eliminate("function f() { return f(); }", false);
    assert_eq!(code, "");
}

#[test]
fn test_chains_of_unused_bindings_collapse() {
    let (code, _) = eliminate("var a = 1; var b = a; var c = b;", false);
    assert_eq!(code, "");
}

#[test]
fn test_impure_initializer_is_kept_as_statement() {
    let (code, codes) = eliminate("var a = f();", false);
    assert_eq!(code, "f()");
    assert!(codes.contains(&diagnostic_codes::SIDE_EFFECTS_IN_UNUSED_INITIALIZER));
}

#[test]
fn test_only_unused_declarators_are_removed() {
    let (code, _) = eliminate("var a = 1, b = 2; use(b);", false);
    assert_eq!(code, "var b=2;use(b)");
}

#[test]
fn test_drops_dead_store_to_unread_local() {
    let (code, codes) = eliminate("function f() { var x; x = g(); } f();", false);
    assert_eq!(code, "function f(){g()}f()");
    assert!(codes.contains(&diagnostic_codes::DROPPING_DEAD_STORE));
}

#[test]
fn test_keeps_exports_and_drops_unused_imports() {
    let (code, codes) = eliminate(
        "import { used, unused } from 'mod'; export const x = used;",
        true,
    );
    assert_eq!(code, "import{used}from\"mod\";export const x=used");
    assert!(codes.contains(&diagnostic_codes::DROPPING_UNUSED_IMPORT));
}

#[test]
fn test_setter_parameter_survives() {
    let (code, _) = eliminate("use({ set v(value) {} });", false);
    assert_eq!(code, "use({set v(value){}})");
}

#[test]
fn test_eval_keeps_everything_in_reach() {
    let (code, _) = eliminate("function f() { var a = 1; eval(s); } f();", false);
    assert_eq!(code, "function f(){var a=1;eval(s)}f()");
}

#[test]
fn test_unused_catch_parameter_is_kept() {
    let (code, _) = eliminate("try { f(); } catch (e) {}", false);
    assert_eq!(code, "try{f()}catch(e){}");
}

#[test]
fn test_stores_to_parameters_aliased_by_arguments_are_kept() {
    let (code, codes) = eliminate("function f(a) { a = 2; a++; return arguments[0]; } f(1);", false);
    assert!(code.contains("a=2"), "{code}");
    assert!(code.contains("a++"), "{code}");
    assert!(!codes.contains(&diagnostic_codes::DROPPING_DEAD_STORE));
}

#[test]
fn test_dead_store_to_parameter_without_arguments_is_dropped() {
    let (code, _) = eliminate("function f(a) { a = g(); return 1; } f(1);", false);
    assert!(!code.contains("a="), "{code}");
    assert!(code.contains("g()"), "{code}");
}
