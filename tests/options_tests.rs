//! Tests for option parsing, validation and conversion.

use jsz::compressor::RetainPredicate;
use jsz::{MinifyOptions, NameFilter, OptionsError};
use std::fs;

#[test]
fn test_defaults() {
    let options = MinifyOptions::default();
    assert!(options.compress.enabled);
    assert_eq!(options.compress.passes, 1);
    assert!(options.compress.drop_unused);
    assert!(!options.compress.toplevel);
    assert!(options.mangle.enabled);
    assert!(!options.mangle.properties.enabled);
    assert!(!options.module);
    assert!(options.validate().is_ok());
}

#[test]
fn test_empty_json_matches_defaults() {
    let options = MinifyOptions::from_json("{}").expect("empty object should parse");
    assert_eq!(options.compress, MinifyOptions::default().compress);
    assert_eq!(options.mangle, MinifyOptions::default().mangle);
}

#[test]
fn test_camel_case_fields() {
    let options = MinifyOptions::from_json(
        r#"{
            "module": true,
            "compatibilityMode": true,
            "reservedNames": ["$", "jQuery"],
            "mangleTopLevel": true,
            "keepFunctionNames": ["handle*"],
            "keepClassNames": true,
            "compress": { "passes": 3, "dropUnused": false },
            "mangle": { "properties": { "enabled": true, "keepQuoted": true } },
            "cache": { "vars": { "counter": "z" } }
        }"#,
    )
    .expect("options should parse");

    assert!(options.module);
    assert!(options.compatibility_mode);
    assert_eq!(options.reserved_names, vec!["$".to_string(), "jQuery".to_string()]);
    assert!(options.mangle_top_level);
    assert_eq!(options.keep_function_names, NameFilter::Patterns(vec!["handle*".to_string()]));
    assert_eq!(options.keep_class_names, NameFilter::All(true));
    assert_eq!(options.compress.passes, 3);
    assert!(!options.compress.drop_unused);
    assert!(options.compress.dead_code);
    assert!(options.mangle.properties.enabled);
    assert!(options.mangle.properties.keep_quoted);
    let cache = options.cache.expect("cache should parse");
    assert_eq!(cache.vars.get("counter").map(String::as_str), Some("z"));
    assert!(cache.props.is_empty());
}

#[test]
fn test_binder_options_follow_flags() {
    let mut options = MinifyOptions::default();
    options.module = true;
    options.treat_eval_as_unknown = true;
    let binder = options.binder_options();
    assert!(binder.is_module);
    assert!(binder.treat_eval_as_unknown);
    assert!(!binder.compatibility_mode);
}

#[test]
fn test_passes_out_of_range() {
    for passes in [0, 11] {
        let mut options = MinifyOptions::default();
        options.compress.passes = passes;
        assert!(matches!(options.validate(), Err(OptionsError::InvalidPasses(p)) if p == passes));
    }
}

#[test]
fn test_reserved_names_must_be_identifiers() {
    let error = MinifyOptions::from_json(r#"{ "reservedNames": ["ok", "not-ok"] }"#)
        .expect_err("hyphenated name should be rejected");
    assert!(matches!(&error, OptionsError::InvalidReservedName(name) if name == "not-ok"));
    assert_eq!(error.to_string(), "reserved name 'not-ok' is not an identifier");
}

#[test]
fn test_bad_glob_is_rejected() {
    let error = MinifyOptions::from_json(r#"{ "retain": ["[oops"] }"#).expect_err("bad glob should be rejected");
    assert!(matches!(error, OptionsError::InvalidPattern { .. }));
}

#[test]
fn test_malformed_json() {
    let error = MinifyOptions::from_json(r#"{ "compress": { "passes": "two" } }"#)
        .expect_err("string passes should be rejected");
    assert!(matches!(error, OptionsError::Parse { path: None, .. }));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("jsz.json");
    fs::write(&path, r#"{ "compress": { "toplevel": true } }"#).expect("write options");
    let options = MinifyOptions::from_file(&path).expect("file should load");
    assert!(options.compress.toplevel);

    fs::write(&path, "not json").expect("write options");
    let error = MinifyOptions::from_file(&path).expect_err("bad file should fail");
    assert!(matches!(error, OptionsError::Parse { path: Some(_), .. }));
    assert!(error.to_string().contains("jsz.json"));

    let missing = dir.path().join("missing.json");
    assert!(matches!(MinifyOptions::from_file(&missing), Err(OptionsError::Read { .. })));
}

#[test]
fn test_name_filters_become_predicates() {
    assert!(NameFilter::All(false).to_predicate().expect("valid").is_none());
    assert!(NameFilter::Patterns(Vec::new()).to_predicate().expect("valid").is_none());

    let all = NameFilter::All(true).to_predicate().expect("valid").expect("some");
    assert!(all.matches("anything"));

    let patterns = NameFilter::Patterns(vec!["on*".to_string(), "Widget".to_string()])
        .to_predicate()
        .expect("valid")
        .expect("some");
    assert!(patterns.matches("onClick"));
    assert!(patterns.matches("Widget"));
    assert!(!patterns.matches("render"));
}

#[test]
fn test_retain_globs_and_predicate_combine() {
    let mut options = MinifyOptions::default();
    options.retain = vec!["api*".to_string()];
    options.retain_predicate = Some(RetainPredicate::new(|name| name == "main"));
    let compress = options.compress_options().expect("valid");
    assert!(compress.retains("apiClient"));
    assert!(compress.retains("main"));
    assert!(!compress.retains("helper"));
}

#[test]
fn test_mangle_and_property_options() {
    let options = MinifyOptions::from_json(
        r#"{
            "reservedNames": ["keep"],
            "mangleTopLevel": true,
            "mangle": { "properties": { "reserved": ["id"], "only": ["_*"] } }
        }"#,
    )
    .expect("options should parse");

    let mangle = options.mangle_options().expect("valid");
    assert!(mangle.mangle_top_level);
    assert!(mangle.is_reserved("keep"));
    assert!(mangle.keep_function_names.is_none());

    let properties = options.property_options().expect("valid");
    assert!(properties.reserved.contains("id"));
    let only = properties.only.expect("only filter");
    assert!(only.matches("_private"));
    assert!(!only.matches("public"));
}
