//! Unit tests for the lexer module.
//!
//! Covers keywords and identifiers, integer and string literals, operators,
//! comments, line/column tracking and the error case.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().iter().map(|t| t.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let tokens = tokenize("let fn return if else while for break continue true false null class extends this super").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Let);
    assert_eq!(tokens[1].kind, TokenKind::Fn);
    assert_eq!(tokens[2].kind, TokenKind::Return);
    assert_eq!(tokens[3].kind, TokenKind::If);
    assert_eq!(tokens[4].kind, TokenKind::Else);
    assert_eq!(tokens[5].kind, TokenKind::While);
    assert_eq!(tokens[6].kind, TokenKind::For);
    assert_eq!(tokens[7].kind, TokenKind::Break);
    assert_eq!(tokens[8].kind, TokenKind::Continue);
    assert_eq!(tokens[9].kind, TokenKind::True);
    assert_eq!(tokens[10].kind, TokenKind::False);
    assert_eq!(tokens[11].kind, TokenKind::Null);
    assert_eq!(tokens[12].kind, TokenKind::Class);
    assert_eq!(tokens[13].kind, TokenKind::Extends);
    assert_eq!(tokens[14].kind, TokenKind::This);
    assert_eq!(tokens[15].kind, TokenKind::Super);
    assert_eq!(tokens[16].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar baz_123 _underscore letter").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    // A keyword prefix does not make a keyword
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "letter");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_integers() {
    let tokens = tokenize("42 0 1000").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].value, "1000");
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" "multiple words""#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = tokenize(r#""a\nb\t\"q\"""#).unwrap();

    assert_eq!(tokens[0].value, "a\nb\t\"q\"");
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / % == != ! = < <= > >= && || += -= *= /= %="),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Not,
            TokenKind::Assignment,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::PercentEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] ; : , ."),
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
            TokenKind::Dot,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    assert_eq!(
        kinds("let x = 1; // trailing comment\nx"),
        vec![
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Integer,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_positions() {
    let tokens = tokenize("let x\n  = 10;").unwrap();

    assert_eq!((tokens[0].span.start.line, tokens[0].span.start.column), (1, 1));
    assert_eq!((tokens[1].span.start.line, tokens[1].span.start.column), (1, 5));
    assert_eq!((tokens[2].span.start.line, tokens[2].span.start.column), (2, 3));
    assert_eq!((tokens[3].span.start.line, tokens[3].span.start.column), (2, 5));
    assert_eq!((tokens[3].span.end.line, tokens[3].span.end.column), (2, 7));
}

#[test]
fn test_tokenize_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
}

#[test]
fn test_tokenize_unrecognised_character() {
    let error = tokenize("let x = @;").unwrap_err();

    assert_eq!(error.character, '@');
    assert_eq!((error.position.line, error.position.column), (1, 9));
    assert_eq!(error.to_string(), "Unrecognised character '@' at line 1, column 9");
}
