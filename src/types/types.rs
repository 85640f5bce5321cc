//! Type system definitions.
//!
//! Types are built once from declaration nodes and never change afterwards:
//! an array or record resolves its element/field types against the scope chain
//! active when it is built, so later redeclarations elsewhere do not leak in.

use std::fmt::Display;

use crate::ast::ast::NodeId;

pub const INTEGER: &str = "integer";
pub const REAL: &str = "real";
pub const BOOLEAN: &str = "boolean";

/// Names seeded into the root type table.
pub const BUILT_IN_TYPES: [&str; 3] = [INTEGER, REAL, BOOLEAN];

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Return type of a routine that declares none.
    NoType,
    /// To be inferred from an initializer; never resolved further here.
    Auto,
    Simple(String),
    Array {
        element: Box<Type>,
        /// Size expression, left unevaluated for code generation.
        size: NodeId,
    },
    /// Fields in declaration order. Duplicate names are accepted; lookups take the first.
    Record(Vec<Variable>),
}

impl Type {
    pub fn simple(name: &str) -> Self {
        Type::Simple(name.to_string())
    }

    pub fn array(element: Type, size: NodeId) -> Self {
        Type::Array {
            element: Box::new(element),
            size,
        }
    }

    /// First field named `name`.
    pub fn get_field(&self, name: &str) -> Option<&Variable> {
        match self {
            Type::Record(fields) => fields.iter().find(|field| field.name == name),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::NoType => write!(f, "no type"),
            Type::Auto => write!(f, "auto"),
            Type::Simple(name) => write!(f, "{}", name),
            Type::Array { element, .. } => write!(f, "array of {}", element),
            Type::Record(fields) => {
                write!(f, "record {{")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", field.name, field.var_type)?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// A declared variable, parameter or record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub var_type: Type,
    /// Initializer, kept unevaluated.
    pub default_value: Option<NodeId>,
}

impl Variable {
    pub fn new(name: impl Into<String>, var_type: Type, default_value: Option<NodeId>) -> Self {
        Variable {
            name: name.into(),
            var_type,
            default_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<Variable>,
}

/// Coarse type categories the code generator works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedType {
    Boolean,
    Integer,
    Real,
    ArrayBoolean,
    ArrayInteger,
    ArrayReal,
    Error,
}

impl GeneratedType {
    /// Category of a resolved type; records, auto types and anything that is not a
    /// built-in scalar (or an array of one) map to `Error`.
    pub fn from_type(type_: &Type) -> Self {
        match type_ {
            Type::Simple(name) => match name.as_str() {
                BOOLEAN => GeneratedType::Boolean,
                INTEGER => GeneratedType::Integer,
                REAL => GeneratedType::Real,
                _ => GeneratedType::Error,
            },
            Type::Array { element, .. } => match element.as_ref() {
                Type::Simple(name) => match name.as_str() {
                    BOOLEAN => GeneratedType::ArrayBoolean,
                    INTEGER => GeneratedType::ArrayInteger,
                    REAL => GeneratedType::ArrayReal,
                    _ => GeneratedType::Error,
                },
                _ => GeneratedType::Error,
            },
            Type::NoType | Type::Auto | Type::Record(_) => GeneratedType::Error,
        }
    }
}
