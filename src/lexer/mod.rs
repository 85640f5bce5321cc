//! Lexical analysis for the tree notation.
//!
//! This module contains the lexer that converts tree notation text
//! into a stream of tokens for the reader. It handles:
//!
//! - Tokenization using a static table of regex patterns
//! - Parentheses and atoms (tags, names, operators, literal text)
//! - Token position tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
