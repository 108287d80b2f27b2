use crate::evaluate::*;
use jsz_parser::{BinaryOp, UnaryOp};

#[test]
fn test_truthiness_follows_javascript() {
    assert!(!ConstantValue::Undefined.to_boolean());
    assert!(!ConstantValue::Null.to_boolean());
    assert!(!ConstantValue::Number(0.0).to_boolean());
    assert!(!ConstantValue::Number(f64::NAN).to_boolean());
    assert!(!ConstantValue::String(String::new()).to_boolean());
    assert!(ConstantValue::String("0".to_string()).to_boolean());
    assert!(ConstantValue::Number(-1.0).to_boolean());
}

#[test]
fn test_number_conversion_of_strings() {
    assert_eq!(ConstantValue::String(" 42 ".to_string()).to_number(), 42.0);
    assert_eq!(ConstantValue::String("0x10".to_string()).to_number(), 16.0);
    assert_eq!(ConstantValue::String(String::new()).to_number(), 0.0);
    assert!(ConstantValue::String("abc".to_string()).to_number().is_nan());
    assert_eq!(ConstantValue::Bool(true).to_number(), 1.0);
    assert_eq!(ConstantValue::Null.to_number(), 0.0);
}

#[test]
fn test_numbers_print_like_number_to_string() {
    assert_eq!(number_to_string(1.0), "1");
    assert_eq!(number_to_string(-2.5), "-2.5");
    assert_eq!(number_to_string(1e21), "1e+21");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn test_string_concatenation_wins_over_addition() {
    let one = ConstantValue::Number(1.0);
    let text = ConstantValue::String("a".to_string());
    assert_eq!(
        evaluate_binary(BinaryOp::Add, &one, &text),
        Some(ConstantValue::String("1a".to_string()))
    );
    assert_eq!(
        evaluate_binary(BinaryOp::Add, &one, &ConstantValue::Bool(true)),
        Some(ConstantValue::Number(2.0))
    );
}

#[test]
fn test_unary_operators_fold() {
    assert_eq!(
        evaluate_unary(UnaryOp::TypeOf, &ConstantValue::Null),
        Some(ConstantValue::String("object".to_string()))
    );
    assert_eq!(
        evaluate_unary(UnaryOp::Not, &ConstantValue::Number(0.0)),
        Some(ConstantValue::Bool(true))
    );
    assert_eq!(
        evaluate_unary(UnaryOp::BitNot, &ConstantValue::Number(0.0)),
        Some(ConstantValue::Number(-1.0))
    );
    assert_eq!(evaluate_unary(UnaryOp::Delete, &ConstantValue::Null), None);
}

#[test]
fn test_printed_length_matches_literal_spelling() {
    assert_eq!(ConstantValue::Bool(false).printed_len(), 2);
    assert_eq!(ConstantValue::Undefined.printed_len(), 6);
    assert_eq!(ConstantValue::Number(0.5).printed_len(), 2);
    assert_eq!(ConstantValue::Number(-3.0).printed_len(), 2);
    assert_eq!(ConstantValue::String("ab".to_string()).printed_len(), 4);
}

#[test]
fn test_negative_zero_and_non_finite_numbers_stay_symbolic() {
    assert!(!ConstantValue::Number(-0.0).is_materializable());
    assert!(!ConstantValue::Number(f64::INFINITY).is_materializable());
    assert!(ConstantValue::Number(-1.0).is_materializable());
}
