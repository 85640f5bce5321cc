//! Reader that turns tree notation tokens into an [`Ast`].
//!
//! Grammar:
//!
//! ```text
//! tree := ATOM | '(' ATOM tree* ')'
//! ```
//!
//! A bare atom becomes a leaf node whose tag is the atom text; a parenthesised form
//! becomes a node tagged with its first atom and the following trees as children.

use crate::{
    ast::ast::{Ast, NodeId},
    errors::errors::{Error, ErrorImpl, Location},
    lexer::tokens::{Token, TokenKind},
};

/// The reader state: the token stream and the arena being filled.
pub struct Parser {
    /// The list of tokens to read, ending with `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Nodes read so far
    ast: Ast,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            ast: Ast::new(),
        }
    }

    /// Returns the current token without advancing.
    ///
    /// Stays on the trailing `EOF` token once the stream is exhausted.
    pub fn current_token(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        self.pos += 1;
        token
    }

    /// Expects a token of the specified kind.
    ///
    /// Returns the consumed token, or `UnexpectedToken` / `UnexpectedEndOfInput`
    /// positioned at the offending token.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> Error {
        let token = self.current_token();
        let error = if token.kind == TokenKind::EOF {
            ErrorImpl::UnexpectedEndOfInput
        } else {
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            }
        };

        Error::new(error, Location::Source(token.span.start.clone()))
    }

    fn parse_tree(&mut self) -> Result<NodeId, Error> {
        match self.current_token_kind() {
            TokenKind::Atom => {
                let atom = self.advance();
                Ok(self.ast.leaf(atom.value))
            }
            TokenKind::OpenParen => {
                self.advance();
                let tag = self.expect(TokenKind::Atom)?;

                let mut children = vec![];
                while self.current_token_kind() != TokenKind::CloseParen {
                    children.push(self.parse_tree()?);
                }
                self.expect(TokenKind::CloseParen)?;

                Ok(self.ast.push(tag.value, children))
            }
            _ => Err(self.unexpected()),
        }
    }
}

/// Reads exactly one tree from `tokens`, returning the arena and its root.
pub fn parse(tokens: Vec<Token>) -> Result<(Ast, NodeId), Error> {
    let mut parser = Parser::new(tokens);
    let root = parser.parse_tree()?;
    parser.expect(TokenKind::EOF)?;

    Ok((parser.ast, root))
}

/// Tokenizes and reads `source` in one step.
pub fn parse_source(source: &str, file: Option<String>) -> Result<(Ast, NodeId), Error> {
    let tokens = crate::lexer::lexer::tokenize(source.to_string(), file)?;
    parse(tokens)
}
