//! Unit tests for the lexer module.
//!
//! Covers parentheses, atoms made of operator characters and literal text,
//! comments, and positions.

use super::{lexer::tokenize, tokens::TokenKind};

#[test]
fn test_tokenize_parens_and_atoms() {
    let source = "(factor (integer 2) + x)".to_string();
    let tokens = tokenize(source, Some("test.tree".to_string())).unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::OpenParen,
            TokenKind::Atom,
            TokenKind::OpenParen,
            TokenKind::Atom,
            TokenKind::Atom,
            TokenKind::CloseParen,
            TokenKind::Atom,
            TokenKind::Atom,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
    assert_eq!(tokens[1].value, "factor");
    assert_eq!(tokens[4].value, "2");
    assert_eq!(tokens[6].value, "+");
    assert_eq!(tokens[7].value, "x");
}

#[test]
fn test_tokenize_operator_atoms() {
    let source = "/= <= >= % . - 3.25".to_string();
    let tokens = tokenize(source, Some("test.tree".to_string())).unwrap();

    let values: Vec<&str> = tokens.iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["/=", "<=", ">=", "%", ".", "-", "3.25", "EOF"]);
}

#[test]
fn test_tokenize_skips_comments() {
    let source = "; a comment\n(integer 1) ; trailing\n".to_string();
    let tokens = tokenize(source, Some("test.tree".to_string())).unwrap();

    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].value, "integer");
}

#[test]
fn test_token_positions() {
    let source = "  (x)".to_string();
    let tokens = tokenize(source, Some("test.tree".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 2);
    assert_eq!(tokens[1].span.start.0, 3);
    assert_eq!(tokens[1].span.end.0, 4);
    assert_eq!(tokens[3].kind, TokenKind::EOF);
    assert_eq!(tokens[3].span.start.0, 5);
}

#[test]
fn test_tokenize_empty_source() {
    let tokens = tokenize(String::new(), None).unwrap();

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
    assert_eq!(*tokens[0].span.start.1, "shell");
}
