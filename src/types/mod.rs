//! Type model and per-scope tables.
//!
//! - types: the `Type` sum type, variables, functions and code generation categories
//! - type_table: name to type bindings of one scope
//! - symbol_table: name to variable/function bindings of one scope

pub mod symbol_table;
pub mod type_table;
pub mod types;

#[cfg(test)]
mod tests;
