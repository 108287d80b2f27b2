use clap::Parser;
use std::fs;

use super::args::CliArgs;
use super::driver::{resolve_options, run};
use crate::options::NameFilter;
use jsz_mangler::NameCache;

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["jsz"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).expect("args should parse")
}

#[test]
fn test_flags_override_options_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("jsz.json");
    fs::write(
        &config,
        r#"{ "compress": { "passes": 2 }, "reservedNames": ["keep"] }"#,
    )
    .expect("write config");

    let options = resolve_options(&args(&[
        "--config",
        config.to_str().expect("utf-8 path"),
        "--passes",
        "4",
        "--reserved",
        "also",
        "--keep-classnames",
    ]))
    .expect("options should resolve");

    assert_eq!(options.compress.passes, 4);
    assert_eq!(options.reserved_names, vec!["keep".to_string(), "also".to_string()]);
    assert_eq!(options.keep_class_names, NameFilter::All(true));
    assert_eq!(options.keep_function_names, NameFilter::All(false));
}

#[test]
fn test_toplevel_flag_enables_both_stages() {
    let options = resolve_options(&args(&["--toplevel"])).expect("options should resolve");
    assert!(options.compress.toplevel);
    assert!(options.mangle_top_level);
}

#[test]
fn test_invalid_passes_are_rejected() {
    assert!(resolve_options(&args(&["--passes", "0"])).is_err());
}

#[test]
fn test_minifies_files_into_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("input.js");
    let output = dir.path().join("out.js");
    fs::write(&input, "if (false) { a(); } else { b(); }\n").expect("write input");

    let result = run(&args(&[
        input.to_str().expect("utf-8 path"),
        "-o",
        output.to_str().expect("utf-8 path"),
        "--pretty",
        "false",
        "--warnings",
    ]))
    .expect("run should succeed");

    assert!(!result.has_errors);
    assert_eq!(result.output, "b()");
    assert_eq!(fs::read_to_string(&output).expect("read output"), "b()");
    assert!(
        result.messages.iter().any(|m| m.contains("warning JSZ") && m.contains("Condition always false.")),
        "{:?}",
        result.messages
    );
}

#[test]
fn test_structural_errors_are_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("bad.js");
    fs::write(&input, "let a = 1;\nlet a = 2;\n").expect("write input");

    let result = run(&args(&[input.to_str().expect("utf-8 path"), "--pretty", "false"]))
        .expect("run should return a result");

    assert!(result.has_errors);
    assert_eq!(result.messages.len(), 1);
    assert!(result.messages[0].contains("error"), "{}", result.messages[0]);
}

#[test]
fn test_name_cache_is_shared_and_written() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first = dir.path().join("first.js");
    let second = dir.path().join("second.js");
    let cache_path = dir.path().join("cache.json");
    fs::write(&first, "var sharedCounter = 0; use(sharedCounter);").expect("write first");
    fs::write(&second, "use(sharedCounter);").expect("write second");

    let result = run(&args(&[
        first.to_str().expect("utf-8 path"),
        "--toplevel",
        "--no-compress",
        "--name-cache",
        cache_path.to_str().expect("utf-8 path"),
        "--pretty",
        "false",
    ]))
    .expect("run should succeed");
    assert!(!result.has_errors);

    let cache = NameCache::from_json(&fs::read_to_string(&cache_path).expect("read cache"))
        .expect("cache should parse");
    let renamed = cache.vars.get("sharedCounter").expect("top-level name cached").clone();
    assert!(result.output.contains(&format!("var {renamed}=0")), "{}", result.output);

    let result = run(&args(&[
        second.to_str().expect("utf-8 path"),
        "--toplevel",
        "--no-compress",
        "--name-cache",
        cache_path.to_str().expect("utf-8 path"),
        "--pretty",
        "false",
    ]))
    .expect("run should succeed");
    assert!(!result.has_errors);
    // Undeclared in the second file, so it stays as written.
    assert_eq!(result.output, "use(sharedCounter)");
}
