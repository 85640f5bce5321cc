//! Scope tree and expression checking.
//!
//! This module holds the control table, the hierarchy of scopes the analyzer
//! declares into and resolves against. It handles:
//!
//! - Chained lookup of variables, functions and types through parent scopes
//! - Type construction from declaration nodes (simple, array, record)
//! - Routine declaration with a synthesised scope for the parameters
//! - Lvalue path validation (`modifiable`)
//! - Literal constant folding with operand legality checks (`calculate`)
//! - Queries the code generator uses after analysis

pub mod calculate;
pub mod control_table;
pub mod modifiable;
