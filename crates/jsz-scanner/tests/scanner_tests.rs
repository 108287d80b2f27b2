use super::*;

fn kinds(source: &str) -> Vec<SyntaxKind> {
    let (tokens, _) = Scanner::new(source).tokenize_all();
    tokens.into_iter().map(|t| t.kind).collect()
}

fn tokens(source: &str) -> Vec<Token> {
    let (tokens, diagnostics) = Scanner::new(source).tokenize_all();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.diagnostics());
    tokens
}

#[test]
fn test_keywords_and_contextual_words() {
    assert_eq!(
        kinds("var let of async"),
        vec![
            SyntaxKind::VarKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_numeric_literals() {
    let toks = tokens("0x1F 0b101 0o17 017 1_000 .5 1e3 10n");
    let numbers: Vec<f64> = toks.iter().take(7).map(|t| t.number).collect();
    assert_eq!(numbers, vec![31.0, 5.0, 15.0, 15.0, 1000.0, 0.5, 1000.0]);
    assert_eq!(toks[7].kind, SyntaxKind::BigIntLiteral);
    assert_eq!(toks[7].value, "10");
}

#[test]
fn test_string_escapes_are_cooked() {
    let toks = tokens(r#"'a\n\x41B\u{43}' "q\"""#);
    assert_eq!(toks[0].value, "a\nABC");
    assert_eq!(toks[1].value, "q\"");
}

#[test]
fn test_unterminated_string_reports_error() {
    let (_, diagnostics) = Scanner::new("'abc\n").tokenize_all();
    assert_eq!(
        diagnostics.diagnostics()[0].code,
        jsz_common::diagnostics::diagnostic_codes::UNTERMINATED_STRING_LITERAL
    );
}

#[test]
fn test_regexp_versus_division() {
    assert_eq!(
        kinds("a / b / c")[1..4],
        [
            SyntaxKind::SlashToken,
            SyntaxKind::Identifier,
            SyntaxKind::SlashToken
        ]
    );
    let toks = tokens("x = /[/]+/g.test(y)");
    assert_eq!(toks[2].kind, SyntaxKind::RegularExpressionLiteral);
    assert_eq!(toks[2].value, "/[/]+/g");
    assert_eq!(kinds("return /x/")[1], SyntaxKind::RegularExpressionLiteral);
    assert_eq!(kinds("(a) / 2")[3], SyntaxKind::SlashToken);
}

#[test]
fn test_template_with_nested_braces() {
    let toks = tokens("`a${ {b:1}.b }c${d}e`");
    let ks: Vec<SyntaxKind> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
        ks,
        vec![
            SyntaxKind::TemplateHead,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::CloseBraceToken,
            SyntaxKind::DotToken,
            SyntaxKind::Identifier,
            SyntaxKind::TemplateMiddle,
            SyntaxKind::Identifier,
            SyntaxKind::TemplateTail,
            SyntaxKind::EndOfFileToken,
        ]
    );
    assert_eq!(toks[0].value, "a");
    assert_eq!(toks[8].value, "c");
    assert_eq!(toks[10].value, "e");
}

#[test]
fn test_line_break_flag_and_comments() {
    let toks = tokens("a // one\n/* two\n */ b /* same */ c");
    assert!(!toks[0].preceded_by_line_break);
    assert!(toks[1].preceded_by_line_break);
    assert!(!toks[2].preceded_by_line_break);
    assert_eq!(toks[2].value, "c");
}

#[test]
fn test_compound_punctuation() {
    assert_eq!(
        kinds("a ??= b?.c ** d >>>= e?.5:1")[1..11],
        [
            SyntaxKind::QuestionQuestionEqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::Identifier,
            SyntaxKind::AsteriskAsteriskToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
        ]
    );
}

#[test]
fn test_identifier_escapes_and_private_names() {
    let toks = tokens(r"ab #priv");
    assert_eq!(toks[0].kind, SyntaxKind::Identifier);
    assert_eq!(toks[0].value, "ab");
    assert_eq!(toks[1].kind, SyntaxKind::PrivateIdentifier);
    assert_eq!(toks[1].value, "priv");
}

#[test]
fn test_reserved_words() {
    assert!(is_reserved_word("do"));
    assert!(is_reserved_word("let"));
    assert!(is_reserved_word("abstract"));
    assert!(!is_reserved_word("a"));
    assert!(is_identifier("foo$1"));
    assert!(!is_identifier("1foo"));
    assert!(!is_identifier("if"));
}
