//! End-to-end tests for the minification pipeline.

use jsz::binder::BindErrorKind;
use jsz::compressor::RetainPredicate;
use jsz::mangler::NameCache;
use jsz::{MinifyError, MinifyOptions, minify};

fn compress_only() -> MinifyOptions {
    let mut options = MinifyOptions::default();
    options.mangle.enabled = false;
    options
}

fn mangle_only() -> MinifyOptions {
    let mut options = MinifyOptions::default();
    options.compress.enabled = false;
    options
}

fn run(source: &str, options: &MinifyOptions) -> String {
    minify("test.js", source, options)
        .expect("minify should succeed")
        .code
}

#[test]
fn test_constant_is_propagated_into_use() {
    assert_eq!(
        run("function f() { var a = 1; return a + 2; } f();", &compress_only()),
        "function f(){return 1+2}f()"
    );
}

#[test]
fn test_dead_branch_is_removed_with_warning() {
    let output = minify("test.js", "if (false) { a(); } else { b(); }", &compress_only())
        .expect("minify should succeed");
    assert_eq!(output.code, "b()");
    assert!(output.diagnostics.has_warnings());
    assert_eq!(output.rounds, 1);
}

#[test]
fn test_parameters_are_renamed() {
    let output = run(
        "function f(longName, other) { return longName + other; } f(1, 2);",
        &mangle_only(),
    );
    assert!(output.starts_with("function f("), "{output}");
    assert!(!output.contains("longName"), "{output}");
    assert!(!output.contains("other"), "{output}");
}

#[test]
fn test_script_globals_keep_their_names_by_default() {
    let source = "var longName = 1; function fn() { return longName; } fn();";
    assert_eq!(
        run(source, &mangle_only()),
        "var longName=1;function fn(){return longName}fn()"
    );
}

#[test]
fn test_full_pipeline_shrinks_output() {
    let source = r#"
        function compute(input) {
            var factor = 2;
            var unusedValue = 10;
            if (false) {
                console.log("never");
            }
            return input * factor;
        }
        console.log(compute(21));
    "#;
    let output = run(source, &MinifyOptions::default());
    assert!(output.contains("*2"), "{output}");
    assert!(!output.contains("unusedValue"), "{output}");
    assert!(!output.contains("never"), "{output}");
    assert!(!output.contains("input"), "{output}");
    assert!(output.contains("console.log(compute("), "{output}");
}

#[test]
fn test_unused_import_is_dropped_in_module() {
    let mut options = compress_only();
    options.module = true;
    options.compress.toplevel = true;
    assert_eq!(
        run("import { used, unused } from 'mod'; export const x = used;", &options),
        "import{used}from\"mod\";export const x=used"
    );
}

#[test]
fn test_retain_patterns_keep_top_level_bindings() {
    let mut options = compress_only();
    options.compress.toplevel = true;
    options.retain = vec!["kee*".to_string()];
    assert_eq!(run("var keep = 1, drop = 2;", &options), "var keep=1");
}

#[test]
fn test_retain_predicate_keeps_top_level_bindings() {
    let mut options = compress_only();
    options.compress.toplevel = true;
    options.retain_predicate = Some(RetainPredicate::new(|name| name == "keep"));
    assert_eq!(run("var keep = 1, drop = 2;", &options), "var keep=1");
}

#[test]
fn test_name_cache_only_when_mangling() {
    let output = minify("test.js", "f();", &compress_only()).expect("minify should succeed");
    assert!(output.name_cache.is_none());

    let output = minify("test.js", "f();", &MinifyOptions::default()).expect("minify should succeed");
    assert_eq!(output.name_cache, Some(NameCache::default()));
}

#[test]
fn test_cached_top_level_names_are_reused() {
    let mut cache = NameCache::default();
    cache.vars.insert("counter".to_string(), "z".to_string());
    let mut options = mangle_only();
    options.mangle_top_level = true;
    options.cache = Some(cache);

    let output = minify("test.js", "var counter = 0; use(counter);", &options).expect("minify should succeed");
    assert_eq!(output.code, "var z=0;use(z)");
    let cache = output.name_cache.expect("cache should be returned");
    assert_eq!(cache.vars.get("counter").map(String::as_str), Some("z"));
}

#[test]
fn test_parse_errors_carry_position() {
    let error = minify("bad.js", "var ok = 1;\nvar = ;", &MinifyOptions::default())
        .expect_err("source should not parse");
    match error {
        MinifyError::Parse { file, line, diagnostics, .. } => {
            assert_eq!(file, "bad.js");
            assert_eq!(line, 2);
            assert!(diagnostics.has_errors());
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_redeclaration_is_a_structural_error() {
    for options in [MinifyOptions::default(), compress_only(), mangle_only()] {
        let error = minify("bad.js", "let a = 1;\nlet a = 2;", &options).expect_err("redeclaration should fail");
        match error {
            MinifyError::Bind(error) => assert_eq!(error.kind, BindErrorKind::Redeclaration),
            other => panic!("expected a bind error, got {other:?}"),
        }
    }
}

#[test]
fn test_redeclaration_is_reported_with_everything_disabled() {
    let mut options = MinifyOptions::default();
    options.compress.enabled = false;
    options.mangle.enabled = false;
    let error = minify("bad.js", "let a; let a;", &options).expect_err("redeclaration should fail");
    assert!(matches!(error, MinifyError::Bind(_)));
    assert!(error.to_string().starts_with("bad.js:1:"), "{error}");
}

#[test]
fn test_invalid_options_are_rejected() {
    let mut options = MinifyOptions::default();
    options.compress.passes = 0;
    let error = minify("test.js", "f();", &options).expect_err("zero passes should fail");
    assert!(matches!(error, MinifyError::Options(_)));
}

#[test]
fn test_properties_are_mangled_when_enabled() {
    let mut options = MinifyOptions::default();
    options.compress.enabled = false;
    options.mangle.properties.enabled = true;
    let output = minify("test.js", "var o = { alpha: 1 }; o.alpha + o.length;", &options)
        .expect("minify should succeed");
    assert!(!output.code.contains("alpha"), "{}", output.code);
    assert!(output.code.contains(".length"), "{}", output.code);
    let cache = output.name_cache.expect("cache should be returned");
    assert!(cache.props.contains_key("alpha"));
}
