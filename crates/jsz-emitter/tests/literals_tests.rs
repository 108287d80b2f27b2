use crate::literals::*;

#[test]
fn test_integers_print_plainly_until_exponent_is_shorter() {
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(7.0), "7");
    assert_eq!(format_number(123.0), "123");
    assert_eq!(format_number(1000.0), "1e3");
    assert_eq!(format_number(1_000_000.0), "1e6");
}

#[test]
fn test_fractions_drop_the_leading_zero() {
    assert_eq!(format_number(0.5), ".5");
    assert_eq!(format_number(1.5), "1.5");
    assert_eq!(format_number(0.0000001), "1e-7");
}

#[test]
fn test_strings_pick_the_quote_needing_fewer_escapes() {
    assert_eq!(quote_string("abc"), "\"abc\"");
    assert_eq!(quote_string("it's"), "\"it's\"");
    assert_eq!(quote_string("say \"hi\""), "'say \"hi\"'");
    assert_eq!(quote_string("'\""), "\"'\\\"\"");
}

#[test]
fn test_strings_escape_line_terminators_and_backslashes() {
    assert_eq!(quote_string("a\nb"), "\"a\\nb\"");
    assert_eq!(quote_string("a\\b"), "\"a\\\\b\"");
    assert_eq!(quote_string("\u{2028}"), "\"\\u2028\"");
    assert_eq!(quote_string("\u{0}1"), "\"\\x001\"");
    assert_eq!(quote_string("\u{0}"), "\"\\0\"");
}

#[test]
fn test_numeric_keys_must_be_canonical() {
    assert!(is_numeric_key("0"));
    assert!(is_numeric_key("42"));
    assert!(!is_numeric_key("042"));
    assert!(!is_numeric_key("1.5"));
    assert!(!is_numeric_key(""));
}
