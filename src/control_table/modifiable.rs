//! Lvalue path resolution.
//!
//! A modifiable primary is a left-recursive chain: a variable name, then any mix of
//! `[index]` and `.field` steps. The walk threads the type reached so far through the
//! chain and fails on the first step that does not fit it.

use log::trace;

use crate::{
    ast::ast::{tags, Ast, NodeId},
    errors::errors::{Error, ErrorImpl},
    types::types::Type,
};

use super::control_table::{malformed, name_at, ControlTable, ScopeId};

impl ControlTable {
    /// Validates the lvalue path rooted at `node` and returns the type it denotes.
    ///
    /// Index expressions along the path are folded in place. Indices are not checked
    /// against the array size.
    pub fn check_modifiable(
        &self,
        id: ScopeId,
        ast: &mut Ast,
        node: NodeId,
    ) -> Result<Type, Error> {
        self.walk_modifiable(id, ast, node, None)
    }

    fn walk_modifiable(
        &self,
        id: ScopeId,
        ast: &mut Ast,
        node: NodeId,
        current: Option<Type>,
    ) -> Result<Type, Error> {
        let tag = ast.tag(node).to_string();
        match tag.as_str() {
            tags::MODIFIABLE_PRIMARY => {
                let name = name_at(ast, node, 0)?;
                match current {
                    None => match self.get_variable(id, &name) {
                        Some(variable) => {
                            trace!("lvalue `{}` starts at {}", name, variable.var_type);
                            Ok(variable.var_type.clone())
                        }
                        None => Err(Error::at_node(
                            ErrorImpl::VariableNotDeclared { variable: name },
                            node,
                        )),
                    },
                    Some(record @ Type::Record(_)) => match record.get_field(&name) {
                        Some(field) => Ok(field.var_type.clone()),
                        None => Err(Error::at_node(
                            ErrorImpl::UnknownField {
                                field: name,
                                record: record.to_string(),
                            },
                            node,
                        )),
                    },
                    Some(other) => Err(Error::at_node(
                        ErrorImpl::NotARecord {
                            type_: other.to_string(),
                        },
                        node,
                    )),
                }
            }
            tags::MODIFIABLE_PRIMARY_ARRAY => {
                let Some(base) = ast.child(node, 0).filter(|_| ast.children(node).len() == 2) else {
                    return Err(malformed(ast, node, "an lvalue and an index expression"));
                };

                match self.walk_modifiable(id, ast, base, current)? {
                    Type::Array { element, .. } => {
                        self.process_expression(id, ast, node, 1)?;
                        Ok(*element)
                    }
                    other => Err(Error::at_node(
                        ErrorImpl::NotAnArray {
                            type_: other.to_string(),
                        },
                        base,
                    )),
                }
            }
            tags::MODIFIABLE_PRIMARY_FIELD => {
                let (Some(base), Some(field)) = (ast.child(node, 0), ast.child(node, 1)) else {
                    return Err(malformed(ast, node, "an lvalue and a field name"));
                };

                let base_type = self.walk_modifiable(id, ast, base, current)?;
                if !matches!(base_type, Type::Record(_)) {
                    return Err(Error::at_node(
                        ErrorImpl::NotARecord {
                            type_: base_type.to_string(),
                        },
                        base,
                    ));
                }

                self.walk_modifiable(id, ast, field, Some(base_type))
            }
            _ => Err(Error::at_node(ErrorImpl::UnsupportedExpression { tag: tag.clone() }, node)),
        }
    }
}
