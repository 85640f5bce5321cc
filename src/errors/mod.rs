//! Error types and error handling for the analyzer.
//!
//! This module defines the error types used throughout semantic analysis.
//! It includes:
//!
//! - Error structures carrying the offending node or source position
//! - Recoverable declaration/resolution kinds and fatal folding kinds
//! - Error naming and suggestion tips for display

pub mod errors;
