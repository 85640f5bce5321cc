//! Reader for the tree notation.
//!
//! This module transforms a stream of notation tokens into the arena AST the
//! analyzer consumes. The source-language grammar is not parsed here; trees
//! arrive already shaped by the external parser and are only written down in
//! notation form.

pub mod parser;

#[cfg(test)]
mod tests;
