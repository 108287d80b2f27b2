use clap::Parser;
use std::path::Path;

use super::args::CliArgs;

#[test]
fn test_parses_defaults() {
    let args = CliArgs::try_parse_from(["jsz"]).expect("default args should parse");

    assert!(args.inputs.is_empty());
    assert!(args.output.is_none());
    assert!(!args.module);
    assert!(!args.no_compress);
    assert!(!args.no_mangle);
    assert_eq!(args.passes, None);
    assert!(args.reserved.is_empty());
    assert_eq!(args.pretty, None);
}

#[test]
fn test_parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "jsz",
        "--module",
        "--toplevel",
        "--passes",
        "3",
        "--reserved",
        "$,jQuery",
        "--keep-fnames",
        "-o",
        "out.js",
        "a.js",
        "b.js",
    ])
    .expect("flagged args should parse");

    assert!(args.module);
    assert!(args.toplevel);
    assert!(args.keep_fnames);
    assert_eq!(args.passes, Some(3));
    assert_eq!(args.reserved, vec!["$".to_string(), "jQuery".to_string()]);
    assert_eq!(args.output.as_deref(), Some(Path::new("out.js")));
    assert_eq!(args.inputs.len(), 2);
}

#[test]
fn test_ie8_is_an_alias_for_compat() {
    let args = CliArgs::try_parse_from(["jsz", "--ie8"]).expect("alias should parse");
    assert!(args.compat);
}

#[test]
fn test_rejects_non_numeric_passes() {
    assert!(CliArgs::try_parse_from(["jsz", "--passes", "many"]).is_err());
}
