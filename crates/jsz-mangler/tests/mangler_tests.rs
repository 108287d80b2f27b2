use crate::*;
use jsz_binder::{BinderOptions, BinderState};
use jsz_common::LineMap;
use jsz_emitter::Printer;
use jsz_parser::ParserState;
use jsz_scanner::is_reserved_word;
use rustc_hash::FxHashSet;

fn mangle_with(
    source: &str,
    binder_options: BinderOptions,
    options: &MangleOptions,
    cache: Option<&mut NameCache>,
) -> (String, BinderState) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    parser.set_module(binder_options.is_module);
    let output = parser.parse();
    assert!(!output.diagnostics.has_errors(), "parse errors in {source}");
    let mut arena = output.arena;
    let mut binder = BinderState::new("test.js", binder_options);
    let line_map = LineMap::build(source);
    if let Err(err) = binder.bind_source_file(&arena, output.root, &line_map) {
        panic!("unexpected bind error: {err}");
    }
    mangle_names(&mut arena, &mut binder, options, &Alphabet::default(), cache);
    (Printer::print(&arena, output.root), binder)
}

fn mangle(source: &str) -> String {
    mangle_with(source, BinderOptions::default(), &MangleOptions::default(), None).0
}

fn top_level() -> MangleOptions {
    MangleOptions {
        mangle_top_level: true,
        ..MangleOptions::default()
    }
}

#[test]
fn test_parameters_take_shortest_names() {
    assert_eq!(
        mangle("function f(longName, other) { return longName + other; } f(1, 2);"),
        "function f(a,b){return a+b}f(1,2)"
    );
}

#[test]
fn test_sibling_blocks_share_a_name() {
    assert_eq!(
        mangle("function f() { { let x = 1; g(x); } { let y = 2; g(y); } } f();"),
        "function f(){{let a=1;g(a)}{let a=2;g(a)}}f()"
    );
}

#[test]
fn test_inner_scopes_avoid_names_they_can_see() {
    assert_eq!(
        mangle("function f(x) { return function (y) { return x + y; }; } f(1);"),
        "function f(a){return function(b){return a+b}}f(1)"
    );
}

#[test]
fn test_referenced_globals_are_never_shadowed() {
    assert_eq!(
        mangle("function f(x) { return a + x; } f();"),
        "function f(b){return a+b}f()"
    );
}

#[test]
fn test_caller_reserved_names_are_skipped() {
    let options = MangleOptions {
        reserved: ["a".to_string(), "keepMe".to_string()].into_iter().collect(),
        ..MangleOptions::default()
    };
    let (code, _) = mangle_with(
        "function f(x, keepMe) { return x + keepMe; } f();",
        BinderOptions::default(),
        &options,
        None,
    );
    assert_eq!(code, "function f(b,keepMe){return b+keepMe}f()");
}

#[test]
fn test_script_globals_need_top_level_mangling() {
    let source = "var longName = 1; function fn() { return longName; } fn();";
    assert_eq!(mangle(source), "var longName=1;function fn(){return longName}fn()");

    let (code, _) = mangle_with(source, BinderOptions::default(), &top_level(), None);
    assert!(!code.contains("longName"), "{code}");
    assert!(!code.contains("fn"), "{code}");
}

#[test]
fn test_module_exports_keep_their_names() {
    let binder_options = BinderOptions {
        is_module: true,
        ..BinderOptions::default()
    };
    let (code, _) = mangle_with(
        "export function keep() {} function helper() {} helper(); keep();",
        binder_options,
        &MangleOptions::default(),
        None,
    );
    assert_eq!(code, "export function keep(){}function a(){}a();keep()");
}

#[test]
fn test_eval_pins_the_scope() {
    assert_eq!(
        mangle("function f(x) { eval(\"x\"); return x; } f();"),
        "function f(x){eval(\"x\");return x}f()"
    );
}

#[test]
fn test_keep_function_names() {
    let source = "function outer() { function inner() {} return inner; } outer();";
    assert_eq!(mangle(source), "function outer(){function a(){}return a}outer()");

    let options = MangleOptions {
        keep_function_names: Some(NamePredicate::any()),
        ..MangleOptions::default()
    };
    let (code, _) = mangle_with(source, BinderOptions::default(), &options, None);
    assert_eq!(code, "function outer(){function inner(){}return inner}outer()");
}

#[test]
fn test_catch_parameters_are_local() {
    assert_eq!(mangle("try { f(); } catch (err) { g(err); }"), "try{f()}catch(a){g(a)}");
}

#[test]
fn test_compat_catch_parameter_follows_its_redefinition() {
    let binder_options = BinderOptions {
        compatibility_mode: true,
        ..BinderOptions::default()
    };
    let (code, _) = mangle_with(
        "function f() { try { g(); } catch (e) { h(e); } } f();",
        binder_options,
        &MangleOptions::default(),
        None,
    );
    assert_eq!(code, "function f(){try{g()}catch(a){h(a)}}f()");
}

#[test]
fn test_cached_names_are_reused_and_recorded() {
    let mut cache = NameCache::default();
    cache.vars.insert("counter".to_string(), "z".to_string());
    let (code, _) = mangle_with(
        "var counter = 0; var other = 1; use(counter, other);",
        BinderOptions::default(),
        &top_level(),
        Some(&mut cache),
    );
    assert_eq!(code, "var z=0;var a=1;use(z,a)");
    assert_eq!(cache.vars.get("other").map(String::as_str), Some("a"));
}

#[test]
fn test_many_bindings_get_distinct_valid_names() {
    let declarations: Vec<String> = (0..120).map(|i| format!("v{i} = {i}")).collect();
    let reads: Vec<String> = (0..120).map(|i| format!("v{i}")).collect();
    let source = format!(
        "function f() {{ var {}; return [{}]; }} f();",
        declarations.join(", "),
        reads.join(", ")
    );
    let (_, binder) = mangle_with(&source, BinderOptions::default(), &MangleOptions::default(), None);
    let names: Vec<&str> = binder
        .bindings
        .iter()
        .filter(|b| b.name.starts_with('v'))
        .filter_map(|b| b.mangled_name.as_deref())
        .collect();
    assert_eq!(names.len(), 120);
    let distinct: FxHashSet<&str> = names.iter().copied().collect();
    assert_eq!(distinct.len(), 120);
    assert!(names.iter().all(|name| !is_reserved_word(name)));
}

#[test]
fn test_frequency_ignores_names_being_replaced() {
    let source = "function f(zzz) { return zzz; } f();";
    let output = ParserState::new("test.js".to_string(), source.to_string()).parse();
    let mut binder = BinderState::new("test.js", BinderOptions::default());
    let line_map = LineMap::build(source);
    if let Err(err) = binder.bind_source_file(&output.arena, output.root, &line_map) {
        panic!("unexpected bind error: {err}");
    }
    let printed = Printer::print(&output.arena, output.root);
    let frequency = char_frequency(&printed, &binder, &MangleOptions::default());
    assert_eq!(frequency.count('z'), 0);
    assert!(frequency.count('f') > 0);
}

fn rebind(code: &str) -> BinderState {
    let output = ParserState::new("out.js".to_string(), code.to_string()).parse();
    assert!(!output.diagnostics.has_errors(), "mangled output does not parse: {code}");
    let mut binder = BinderState::new("out.js", BinderOptions::default());
    let line_map = LineMap::build(code);
    if let Err(err) = binder.bind_source_file(&output.arena, output.root, &line_map) {
        panic!("mangled output does not bind: {err}: {code}");
    }
    binder
}

#[test]
fn test_block_let_avoids_hoisted_var_name() {
    let code = mangle("function f() { { let y = g(); var x = h(y); } return x; } f();");
    rebind(&code);
    assert!(code.contains("return "), "{code}");
}

#[test]
fn test_nested_var_in_loop_body_survives_rebind() {
    let code = mangle(
        "function f(n) { for (let i = 0; i < n; i++) { if (i) { let t = g(i); var last = t; } } return last; } f(3);",
    );
    rebind(&code);
}
