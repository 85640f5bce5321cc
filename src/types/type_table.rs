use std::collections::HashMap;

use crate::{ast::ast::NodeId, errors::errors::{Error, ErrorImpl}};

use super::types::{Type, Variable};

/// Types declared in a single scope. No fallback to enclosing scopes.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: HashMap<String, Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable {
            types: HashMap::new(),
        }
    }

    /// Inserts `type_` under `name` unless the name is taken in this table.
    pub fn add_type(&mut self, name: &str, type_: Type) -> Result<(), Error> {
        if self.types.contains_key(name) {
            return Err(Error::unlocated(ErrorImpl::TypeAlreadyDeclared {
                name: name.to_string(),
            }));
        }

        self.types.insert(name.to_string(), type_);
        Ok(())
    }

    pub fn add_simple_type(&mut self, name: &str, type_: Type) -> Result<(), Error> {
        self.add_type(name, type_)
    }

    pub fn add_array_type(&mut self, name: &str, size: NodeId, element: Type) -> Result<(), Error> {
        self.add_type(name, Type::array(element, size))
    }

    pub fn add_record_type(&mut self, name: &str, fields: Vec<Variable>) -> Result<(), Error> {
        self.add_type(name, Type::Record(fields))
    }

    pub fn get_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn remove_type(&mut self, name: &str) -> bool {
        self.types.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
