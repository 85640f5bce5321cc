use std::collections::HashMap;

use crate::{ast::ast::NodeId, errors::errors::{Error, ErrorImpl}};

use super::types::{Function, Type, Variable};

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(Variable),
    Function(Function),
}

/// Variables and functions declared in a single scope.
///
/// Both share one namespace: a name is either a variable or a function.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: HashMap::new(),
        }
    }

    fn declare(&mut self, name: &str, symbol: Symbol) -> Result<(), Error> {
        if self.symbols.contains_key(name) {
            return Err(Error::unlocated(ErrorImpl::SymbolAlreadyDeclared {
                name: name.to_string(),
            }));
        }

        self.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn add_variable(
        &mut self,
        name: &str,
        var_type: Type,
        default_value: Option<NodeId>,
    ) -> Result<(), Error> {
        self.declare(name, Symbol::Variable(Variable::new(name, var_type, default_value)))
    }

    pub fn add_function(
        &mut self,
        name: &str,
        return_type: Type,
        parameters: Vec<Variable>,
    ) -> Result<(), Error> {
        self.declare(
            name,
            Symbol::Function(Function {
                name: name.to_string(),
                return_type,
                parameters,
            }),
        )
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.get_variable(name).is_some()
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.get_function(name).is_some()
    }

    pub fn get_variable(&self, name: &str) -> Option<&Variable> {
        match self.symbols.get(name) {
            Some(Symbol::Variable(variable)) => Some(variable),
            _ => None,
        }
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        match self.symbols.get(name) {
            Some(Symbol::Function(function)) => Some(function),
            _ => None,
        }
    }

    pub fn get_count_variables(&self) -> usize {
        self.symbols
            .values()
            .filter(|symbol| matches!(symbol, Symbol::Variable(_)))
            .count()
    }
}
