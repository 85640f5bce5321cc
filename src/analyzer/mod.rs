//! Whole-program walk over a `program` tree.
//!
//! - Declares types, variables and routines into a fresh control table
//! - Opens a scope per routine, loop and branch body
//! - Validates assignments and calls, folding every expression in place
//! - Collects recoverable errors and stops at the first fatal one

pub mod analyzer;
