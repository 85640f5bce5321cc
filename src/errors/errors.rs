use std::fmt::Display;

use thiserror::Error;

use crate::{ast::ast::NodeId, Position};

/// Where an error was found.
#[derive(Debug, Clone)]
pub enum Location {
    /// A node of the analysed tree.
    Node(NodeId),
    /// A byte offset in tree notation text.
    Source(Position),
    /// Raised by a table that has no node at hand; callers attach one with [`Error::at`].
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    location: Location,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, location: Location) -> Self {
        Error {
            internal_error: error_impl,
            location,
        }
    }

    pub fn at_node(error_impl: ErrorImpl, node: NodeId) -> Self {
        Error::new(error_impl, Location::Node(node))
    }

    pub fn unlocated(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Location::Unknown)
    }

    /// Attaches `node` unless the error already points somewhere.
    pub fn at(mut self, node: NodeId) -> Self {
        if let Location::Unknown = self.location {
            self.location = Location::Node(node);
        }
        self
    }

    pub fn get_location(&self) -> &Location {
        &self.location
    }

    pub fn get_node(&self) -> Option<NodeId> {
        match self.location {
            Location::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Fatal errors come from folding illegal literal combinations; nothing produced
    /// after one of them can be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::DivisionByZero
                | ErrorImpl::ModuloOnReal
                | ErrorImpl::IllegalOperandType { .. }
                | ErrorImpl::BooleanConversion { .. }
                | ErrorImpl::UnknownOperator { .. }
                | ErrorImpl::IntegerOverflow { .. }
                | ErrorImpl::InvalidLiteral { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::TypeAlreadyDeclared { .. } => "TypeAlreadyDeclared",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::MalformedNode { .. } => "MalformedNode",
            ErrorImpl::SymbolAlreadyDeclared { .. } => "SymbolAlreadyDeclared",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::ExpectedInitializer { .. } => "ExpectedInitializer",
            ErrorImpl::ScopeAlreadyExists { .. } => "ScopeAlreadyExists",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::NotAnArray { .. } => "NotAnArray",
            ErrorImpl::NotARecord { .. } => "NotARecord",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::UnsupportedExpression { .. } => "UnsupportedExpression",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::ModuloOnReal => "ModuloOnReal",
            ErrorImpl::IllegalOperandType { .. } => "IllegalOperandType",
            ErrorImpl::BooleanConversion { .. } => "BooleanConversion",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::IntegerOverflow { .. } => "IntegerOverflow",
            ErrorImpl::InvalidLiteral { .. } => "InvalidLiteral",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, is a parenthesis unbalanced?",
                token
            )),
            ErrorImpl::UnexpectedEndOfInput => {
                ErrorTip::Suggestion(String::from("Input ended before every `(` was closed"))
            }
            ErrorImpl::TypeAlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("Type `{}` already declared in this scope", name))
            }
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::MalformedNode { tag, expected } => ErrorTip::Suggestion(format!(
                "Node `{}` does not have the expected shape: {}",
                tag, expected
            )),
            ErrorImpl::SymbolAlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` already declared in this scope", name))
            }
            ErrorImpl::DuplicateParameter { name } => {
                ErrorTip::Suggestion(format!("Parameter `{}` is declared more than once", name))
            }
            ErrorImpl::ExpectedInitializer { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` has no type, so it needs an initial value",
                variable
            )),
            ErrorImpl::ScopeAlreadyExists { key } => {
                ErrorTip::Suggestion(format!("Scope `{}` already exists", key))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", function))
            }
            ErrorImpl::ArgumentCountMismatch { expected, received } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::NotAnArray { type_ } => {
                ErrorTip::Suggestion(format!("Cannot index into a value of type `{}`", type_))
            }
            ErrorImpl::NotARecord { type_ } => ErrorTip::Suggestion(format!(
                "Cannot access a field of a value of type `{}`",
                type_
            )),
            ErrorImpl::UnknownField { field, record } => {
                ErrorTip::Suggestion(format!("`{}` has no field `{}`", record, field))
            }
            ErrorImpl::UnsupportedExpression { tag } => {
                ErrorTip::Suggestion(format!("`{}` cannot be evaluated here", tag))
            }
            ErrorImpl::DivisionByZero => ErrorTip::Suggestion(String::from(
                "The right-hand side of `/` or `%` evaluates to zero",
            )),
            ErrorImpl::ModuloOnReal => ErrorTip::Suggestion(String::from(
                "`%` is only defined for integer operands",
            )),
            ErrorImpl::IllegalOperandType { operator, operand } => ErrorTip::Suggestion(format!(
                "A `{}` literal cannot be used with `{}`",
                operand, operator
            )),
            ErrorImpl::BooleanConversion { value } => {
                ErrorTip::Suggestion(format!("Cannot convert `{}` to boolean", value))
            }
            ErrorImpl::UnknownOperator { operator } => {
                ErrorTip::Suggestion(format!("Operator `{}` is not supported here", operator))
            }
            ErrorImpl::IntegerOverflow { operator } => ErrorTip::Suggestion(format!(
                "Result of `{}` does not fit in an integer",
                operator
            )),
            ErrorImpl::InvalidLiteral { literal } => {
                ErrorTip::Suggestion(format!("`{}` is not a valid literal", literal))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("type {name:?} already declared")]
    TypeAlreadyDeclared { name: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("malformed {tag:?} node: {expected}")]
    MalformedNode { tag: String, expected: String },
    #[error("{name:?} already declared")]
    SymbolAlreadyDeclared { name: String },
    #[error("parameter {name:?} declared twice")]
    DuplicateParameter { name: String },
    #[error("variable {variable:?} needs an initializer")]
    ExpectedInitializer { variable: String },
    #[error("scope {key:?} already exists")]
    ScopeAlreadyExists { key: String },
    #[error("function {function:?} not declared")]
    FunctionNotDeclared { function: String },
    #[error("argument count mismatch: expected {expected:?}, received {received:?}")]
    ArgumentCountMismatch { expected: usize, received: usize },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("type {type_} is not an array")]
    NotAnArray { type_: String },
    #[error("type {type_} is not a record")]
    NotARecord { type_: String },
    #[error("unknown field {field:?} in {record}")]
    UnknownField { field: String, record: String },
    #[error("unsupported expression node {tag:?}")]
    UnsupportedExpression { tag: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo on real operands")]
    ModuloOnReal,
    #[error("illegal {operand} operand for {operator:?}")]
    IllegalOperandType { operator: String, operand: String },
    #[error("cannot convert {value:?} to boolean")]
    BooleanConversion { value: String },
    #[error("unknown operator {operator:?}")]
    UnknownOperator { operator: String },
    #[error("integer overflow in {operator:?}")]
    IntegerOverflow { operator: String },
    #[error("invalid literal {literal:?}")]
    InvalidLiteral { literal: String },
}
