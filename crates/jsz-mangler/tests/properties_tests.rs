use crate::*;
use jsz_emitter::Printer;
use jsz_parser::ParserState;

fn mangle_props(source: &str, options: &PropertyMangleOptions, cache: Option<&mut NameCache>) -> String {
    let output = ParserState::new("test.js".to_string(), source.to_string()).parse();
    assert!(!output.diagnostics.has_errors(), "parse errors in {source}");
    let mut arena = output.arena;
    mangle_properties(&mut arena, output.root, options, &Alphabet::default(), cache);
    Printer::print(&arena, output.root)
}

#[test]
fn test_renames_keys_and_accesses_together() {
    assert_eq!(
        mangle_props(
            "var o = { alpha: 1, beta: 2 }; o.alpha + o.beta + o.length;",
            &PropertyMangleOptions::default(),
            None
        ),
        "var o={a:1,b:2};o.a+o.b+o.length"
    );
}

#[test]
fn test_keep_quoted_leaves_quoted_names() {
    let options = PropertyMangleOptions {
        keep_quoted: true,
        ..PropertyMangleOptions::default()
    };
    assert_eq!(
        mangle_props("var o = { \"alpha\": 1, beta: 2 }; o.alpha + o.beta;", &options, None),
        "var o={alpha:1,a:2};o.alpha+o.a"
    );
}

#[test]
fn test_reserved_and_filtered_names_stay_and_are_avoided() {
    let options = PropertyMangleOptions {
        only: Some(NamePredicate::new(|name| name.starts_with('_'))),
        ..PropertyMangleOptions::default()
    };
    assert_eq!(
        mangle_props("var o = { a: 1, _private: 2 }; o.a + o._private;", &options, None),
        "var o={a:1,b:2};o.a+o.b"
    );
}

#[test]
fn test_class_members_are_renamed() {
    assert_eq!(
        mangle_props(
            "class A { method() { return this.field; } } new A().method();",
            &PropertyMangleOptions::default(),
            None
        ),
        "class A{a(){return this.b}}new A().a()"
    );
}

#[test]
fn test_property_cache_round_trips() {
    let mut cache = NameCache::default();
    cache.props.insert("beta".to_string(), "q".to_string());
    let code = mangle_props(
        "x.alpha = x.beta;",
        &PropertyMangleOptions::default(),
        Some(&mut cache),
    );
    assert_eq!(code, "x.a=x.q");
    assert_eq!(cache.props.get("alpha").map(String::as_str), Some("a"));

    let json = cache.to_json().unwrap_or_else(|err| panic!("{err}"));
    let restored = NameCache::from_json(&json).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(restored, cache);
}
