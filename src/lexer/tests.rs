//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords, type names and identifiers
//! - Numeric, long, char and string literals
//! - Operators and punctuation, longest match first
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.sn".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "fn var return if else for while break continue in import nil shared private as val ref true false".to_string();
    let tokens = tokenize(source, Some("test.sn".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Fn);
    assert_eq!(tokens[1].kind, TokenKind::Var);
    assert_eq!(tokens[2].kind, TokenKind::Return);
    assert_eq!(tokens[3].kind, TokenKind::If);
    assert_eq!(tokens[4].kind, TokenKind::Else);
    assert_eq!(tokens[5].kind, TokenKind::For);
    assert_eq!(tokens[6].kind, TokenKind::While);
    assert_eq!(tokens[7].kind, TokenKind::Break);
    assert_eq!(tokens[8].kind, TokenKind::Continue);
    assert_eq!(tokens[9].kind, TokenKind::In);
    assert_eq!(tokens[10].kind, TokenKind::Import);
    assert_eq!(tokens[11].kind, TokenKind::Nil);
    assert_eq!(tokens[12].kind, TokenKind::Shared);
    assert_eq!(tokens[13].kind, TokenKind::Private);
    assert_eq!(tokens[14].kind, TokenKind::As);
    assert_eq!(tokens[15].kind, TokenKind::Val);
    assert_eq!(tokens[16].kind, TokenKind::Ref);
    assert_eq!(tokens[17].kind, TokenKind::True);
    assert_eq!(tokens[18].kind, TokenKind::False);
    assert_eq!(tokens[19].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_type_names() {
    let tokens = kinds("int long double char str bool byte void");
    assert!(tokens[..8].iter().all(|kind| kind.is_type_keyword()));
    assert_eq!(tokens[8], TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore CamelCase integer".to_string();
    let tokens = tokenize(source, Some("test.sn".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    assert_eq!(tokens[4].value, "CamelCase");
    // keyword prefixes do not split identifiers
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].value, "integer");
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5 42l 7L".to_string();
    let tokens = tokenize(source, Some("test.sn".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::LongNumber);
    assert_eq!(tokens[4].value, "42");
    assert_eq!(tokens[5].kind, TokenKind::LongNumber);
    assert_eq!(tokens[5].value, "7");
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_range_is_not_a_double() {
    assert_eq!(
        kinds("1..10"),
        vec![TokenKind::Number, TokenKind::DotDot, TokenKind::Number, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "multiple words" "tab\there" "quote \"x\"""#.to_string();
    let tokens = tokenize(source, Some("test.sn".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].value, "tab\there");
    assert_eq!(tokens[3].value, "quote \"x\"");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_hex_escape() {
    let tokens = tokenize(r#""\x41B""#.to_string(), None).unwrap();
    assert_eq!(tokens[0].value, "AB");
}

#[test]
fn test_tokenize_chars() {
    let tokens = tokenize(r"'a' '\n' '\''".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, "\n");
    assert_eq!(tokens[2].value, "'");
}

#[test]
fn test_invalid_char_literal() {
    let result = tokenize("'ab'".to_string(), None);
    assert_eq!(result.unwrap_err().get_error_name(), "InvalidCharLiteral");

    let result = tokenize("''".to_string(), None);
    assert!(result.is_err());
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("== != = => ! < <= > >= && || & .. . ++ -- + - * / %"),
        vec![
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Assignment,
            TokenKind::FatArrow,
            TokenKind::Not,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Ampersand,
            TokenKind::DotDot,
            TokenKind::Dot,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_spawn_and_sync() {
    assert_eq!(
        kinds("var h = &work(data); h!;"),
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Ampersand,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Not,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] ; : ,"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "var x = 1; // trailing comment\n// full line\nx".to_string();
    let tokens = tokenize(source, None).unwrap();

    assert_eq!(tokens.len(), 7);
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].value, "x");
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("var  name".to_string(), Some("span.sn".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 9);
    assert_eq!(tokens[1].span.start.1.as_str(), "span.sn");
}

#[test]
fn test_string_span_covers_quotes() {
    let tokens = tokenize(r#""a\n""#.to_string(), None).unwrap();
    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 5);
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("var x = #;".to_string(), None).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_unterminated_string() {
    let error = tokenize("\"abc".to_string(), None).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_default_file_name() {
    let tokens = tokenize("x".to_string(), None).unwrap();
    assert_eq!(tokens[0].span.start.1.as_str(), "shell");
}
