use std::{collections::{HashMap, HashSet}, fmt::Display};

use log::debug;

use crate::{
    ast::ast::{tags, Ast, NodeId},
    errors::errors::{Error, ErrorImpl},
    types::{
        symbol_table::SymbolTable,
        type_table::TypeTable,
        types::{Function, GeneratedType, Type, Variable, BUILT_IN_TYPES, INTEGER},
    },
};

/// Index of a scope inside its [`ControlTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

impl Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One level of lexical nesting.
#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    parent: Option<ScopeId>,
    type_table: TypeTable,
    symbol_table: SymbolTable,
    sub_scopes: HashMap<String, ScopeId>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            parent,
            type_table: TypeTable::new(),
            symbol_table: SymbolTable::new(),
            sub_scopes: HashMap::new(),
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn type_table(&self) -> &TypeTable {
        &self.type_table
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn sub_scopes(&self) -> &HashMap<String, ScopeId> {
        &self.sub_scopes
    }
}

/// The scope tree of one compilation unit.
///
/// Scopes live in an arena owned by the table; a scope refers to its parent and its
/// children by [`ScopeId`] only. Every lookup checks the given scope first and then
/// walks the parent chain up to the root.
#[derive(Debug)]
pub struct ControlTable {
    scopes: Vec<Scope>,
}

impl Default for ControlTable {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn malformed(ast: &Ast, node: NodeId, expected: &str) -> Error {
    Error::at_node(
        ErrorImpl::MalformedNode {
            tag: ast.tag(node).to_string(),
            expected: expected.to_string(),
        },
        node,
    )
}

/// Name stored in the leaf at `index`, e.g. the identifier of a declaration.
pub(crate) fn name_at(ast: &Ast, node: NodeId, index: usize) -> Result<String, Error> {
    match ast.child(node, index) {
        Some(child) if ast.get(child).is_leaf() => Ok(ast.tag(child).to_string()),
        _ => Err(malformed(ast, node, &format!("a name leaf at position {}", index))),
    }
}

impl ControlTable {
    /// Creates the root scope with the built-in simple types.
    pub fn new() -> Self {
        let mut root = Scope::new(ScopeId(0), None);
        for name in BUILT_IN_TYPES {
            // The root table starts empty, so seeding cannot collide.
            let _ = root.type_table.add_simple_type(name, Type::simple(name));
        }

        ControlTable { scopes: vec![root] }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn get_parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).parent
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// The scope itself followed by its ancestors, innermost first.
    fn chain(&self, id: ScopeId) -> impl Iterator<Item = &Scope> + '_ {
        std::iter::successors(Some(self.scope(id)), move |scope| {
            scope.parent.map(|parent| self.scope(parent))
        })
    }

    pub fn is_variable(&self, id: ScopeId, name: &str) -> bool {
        self.get_variable(id, name).is_some()
    }

    pub fn is_function(&self, id: ScopeId, name: &str) -> bool {
        self.get_function(id, name).is_some()
    }

    pub fn is_type(&self, id: ScopeId, name: &str) -> bool {
        self.get_type(id, name).is_some()
    }

    pub fn get_variable(&self, id: ScopeId, name: &str) -> Option<&Variable> {
        self.chain(id)
            .find_map(|scope| scope.symbol_table.get_variable(name))
    }

    pub fn get_function(&self, id: ScopeId, name: &str) -> Option<&Function> {
        self.chain(id)
            .find_map(|scope| scope.symbol_table.get_function(name))
    }

    pub fn get_type(&self, id: ScopeId, name: &str) -> Option<&Type> {
        self.chain(id)
            .find_map(|scope| scope.type_table.get_type(name))
    }

    fn lookup_type(&self, id: ScopeId, name: &str) -> Result<Type, Error> {
        self.get_type(id, name).cloned().ok_or_else(|| {
            Error::unlocated(ErrorImpl::UnknownType {
                type_: name.to_string(),
            })
        })
    }

    /// Builds a [`Type`] from a `type` node, resolving named types against the chain of `id`.
    pub fn resolve_type(&self, id: ScopeId, ast: &Ast, type_node: NodeId) -> Result<Type, Error> {
        if ast.tag(type_node) != tags::TYPE {
            return Err(malformed(ast, type_node, "a `type` node"));
        }
        let Some(real_type) = ast.child(type_node, 0) else {
            return Err(malformed(ast, type_node, "one child describing the type"));
        };

        match ast.tag(real_type) {
            tags::ARRAY_TYPE => {
                let (Some(size), Some(element)) =
                    (ast.child(real_type, 0), ast.child(real_type, 1))
                else {
                    return Err(malformed(ast, real_type, "a size expression and an element type"));
                };
                let element = self.resolve_type(id, ast, element)?;
                Ok(Type::array(element, size))
            }
            tags::RECORD_TYPE => {
                let fields = match ast.child(real_type, 0) {
                    Some(fields) => self.resolve_fields(id, ast, fields)?,
                    None => vec![],
                };
                Ok(Type::Record(fields))
            }
            name => self.lookup_type(id, name).map_err(|error| error.at(real_type)),
        }
    }

    /// Builds record fields from a `variables_declaration` node.
    pub fn resolve_fields(
        &self,
        id: ScopeId,
        ast: &Ast,
        fields: NodeId,
    ) -> Result<Vec<Variable>, Error> {
        if ast.tag(fields) != tags::VARIABLES_DECLARATION {
            return Err(malformed(ast, fields, "a `variables_declaration` node"));
        }

        let mut result = vec![];
        for field in ast.children(fields).iter().copied() {
            let name = name_at(ast, field, 0)?;
            let variable = match ast.tag(field) {
                tags::VARIABLE_DECLARATION => {
                    let Some(type_node) = ast.child(field, 1) else {
                        return Err(malformed(ast, field, "a field type"));
                    };
                    let field_type = self.resolve_type(id, ast, type_node)?;
                    Variable::new(name, field_type, ast.child(field, 2))
                }
                tags::VARIABLE_DECLARATION_AUTO => {
                    Variable::new(name, Type::Auto, ast.child(field, 1))
                }
                _ => return Err(malformed(ast, field, "a variable declaration")),
            };
            result.push(variable);
        }

        Ok(result)
    }

    /// Builds routine parameters from a `parameters` node. Names must be unique.
    pub fn resolve_parameters(
        &self,
        id: ScopeId,
        ast: &Ast,
        parameters: NodeId,
    ) -> Result<Vec<Variable>, Error> {
        if ast.tag(parameters) != tags::PARAMETERS {
            return Err(malformed(ast, parameters, "a `parameters` node"));
        }

        let mut seen = HashSet::new();
        let mut result = vec![];
        for parameter in ast.children(parameters).iter().copied() {
            if ast.tag(parameter) != tags::PARAMETER_DECLARATION
                || ast.children(parameter).len() != 2
            {
                return Err(malformed(
                    ast,
                    parameter,
                    "a `parameter_declaration` with a name and a type",
                ));
            }

            let name = name_at(ast, parameter, 0)?;
            if !seen.insert(name.clone()) {
                return Err(Error::at_node(ErrorImpl::DuplicateParameter { name }, parameter));
            }

            let type_node = ast.children(parameter)[1];
            let parameter_type = if ast.tag(type_node) == tags::TYPE {
                self.resolve_type(id, ast, type_node)?
            } else {
                self.lookup_type(id, ast.tag(type_node))
                    .map_err(|error| error.at(type_node))?
            };

            result.push(Variable::new(name, parameter_type, None));
        }

        Ok(result)
    }

    /// Declares `name` as the type described by a `type` node.
    pub fn add_type(
        &mut self,
        id: ScopeId,
        ast: &Ast,
        name: &str,
        type_node: NodeId,
    ) -> Result<(), Error> {
        let type_ = self.resolve_type(id, ast, type_node)?;
        self.add_resolved_type(id, name, type_)
            .map_err(|error| error.at(type_node))
    }

    /// Declares `name` as an alias of the already visible type `original_name`.
    pub fn add_simple_type(
        &mut self,
        id: ScopeId,
        name: &str,
        original_name: &str,
    ) -> Result<(), Error> {
        let type_ = self.lookup_type(id, original_name)?;
        debug!("declared type `{}` = `{}` in scope {}", name, type_, id);
        self.scope_mut(id).type_table.add_simple_type(name, type_)
    }

    pub fn add_array_type(
        &mut self,
        id: ScopeId,
        ast: &Ast,
        name: &str,
        size: NodeId,
        element_type: NodeId,
    ) -> Result<(), Error> {
        let element = self.resolve_type(id, ast, element_type)?;
        debug!("declared array type `{}` of `{}` in scope {}", name, element, id);
        self.scope_mut(id)
            .type_table
            .add_array_type(name, size, element)
            .map_err(|error| error.at(size))
    }

    /// Declares a record type from an optional `variables_declaration` node.
    pub fn add_record_type(
        &mut self,
        id: ScopeId,
        ast: &Ast,
        name: &str,
        fields: Option<NodeId>,
    ) -> Result<(), Error> {
        let fields = match fields {
            Some(fields) => self.resolve_fields(id, ast, fields)?,
            None => vec![],
        };
        debug!("declared record type `{}` with {} fields in scope {}", name, fields.len(), id);
        self.scope_mut(id).type_table.add_record_type(name, fields)
    }

    pub fn add_resolved_type(&mut self, id: ScopeId, name: &str, type_: Type) -> Result<(), Error> {
        debug!("declared type `{}` = `{}` in scope {}", name, type_, id);
        self.scope_mut(id).type_table.add_type(name, type_)
    }

    /// Declares a variable whose type is described by a `type` node. The initializer is
    /// recorded, not evaluated.
    pub fn add_variable(
        &mut self,
        id: ScopeId,
        ast: &Ast,
        name: &str,
        type_node: NodeId,
        default_value: Option<NodeId>,
    ) -> Result<(), Error> {
        let var_type = self.resolve_type(id, ast, type_node)?;
        self.add_typed_variable(id, name, var_type, default_value)
    }

    pub fn add_typed_variable(
        &mut self,
        id: ScopeId,
        name: &str,
        var_type: Type,
        default_value: Option<NodeId>,
    ) -> Result<(), Error> {
        debug!("declared variable `{}`: {} in scope {}", name, var_type, id);
        self.scope_mut(id)
            .symbol_table
            .add_variable(name, var_type, default_value)
    }

    /// Declares a variable whose type comes from its initializer.
    pub fn add_auto_variable(
        &mut self,
        id: ScopeId,
        name: &str,
        default_value: Option<NodeId>,
    ) -> Result<(), Error> {
        let Some(default_value) = default_value else {
            return Err(Error::unlocated(ErrorImpl::ExpectedInitializer {
                variable: name.to_string(),
            }));
        };
        self.add_typed_variable(id, name, Type::Auto, Some(default_value))
    }

    /// Declares an `integer` loop counter.
    pub fn add_counter(&mut self, id: ScopeId, name: &str) -> Result<(), Error> {
        self.add_typed_variable(id, name, Type::simple(INTEGER), None)
    }

    /// Declares a routine and creates its scope, keyed by `name`, holding the parameters.
    ///
    /// Nothing is created when the name is already bound in this scope or a child scope
    /// already uses it as a key.
    pub fn add_function(
        &mut self,
        id: ScopeId,
        ast: &Ast,
        name: &str,
        return_type: Option<NodeId>,
        parameters: Option<NodeId>,
    ) -> Result<ScopeId, Error> {
        let return_type = match return_type {
            Some(return_type) => self.resolve_type(id, ast, return_type)?,
            None => Type::NoType,
        };
        let parameters = match parameters {
            Some(parameters) => self.resolve_parameters(id, ast, parameters)?,
            None => vec![],
        };

        if self.scope(id).sub_scopes.contains_key(name) {
            return Err(Error::unlocated(ErrorImpl::ScopeAlreadyExists {
                key: name.to_string(),
            }));
        }

        debug!(
            "declared function `{}` with {} parameters returning {} in scope {}",
            name,
            parameters.len(),
            return_type,
            id
        );
        self.scope_mut(id)
            .symbol_table
            .add_function(name, return_type, parameters.clone())?;

        let function_scope = self.add_sub_scope(id, name)?;
        for parameter in parameters {
            self.add_typed_variable(function_scope, &parameter.name, parameter.var_type, None)?;
        }

        Ok(function_scope)
    }

    /// Creates a child scope under `key`.
    pub fn add_sub_scope(&mut self, id: ScopeId, key: &str) -> Result<ScopeId, Error> {
        if self.scope(id).sub_scopes.contains_key(key) {
            return Err(Error::unlocated(ErrorImpl::ScopeAlreadyExists {
                key: key.to_string(),
            }));
        }

        let sub_scope = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(sub_scope, Some(id)));
        self.scope_mut(id).sub_scopes.insert(key.to_string(), sub_scope);
        debug!("created scope {} as `{}` under {}", sub_scope, key, id);

        Ok(sub_scope)
    }

    /// Creates a child scope keyed by the next ordinal (`child count + 1`).
    pub fn add_anonymous_sub_scope(&mut self, id: ScopeId) -> Result<(String, ScopeId), Error> {
        let key = (self.scope(id).sub_scopes.len() + 1).to_string();
        let sub_scope = self.add_sub_scope(id, &key)?;
        Ok((key, sub_scope))
    }

    pub fn get_sub_scope_table(&self, id: ScopeId, key: &str) -> Option<ScopeId> {
        self.scope(id).sub_scopes.get(key).copied()
    }

    /// Checks that `name` is a visible function taking as many parameters as `arguments`
    /// has children. A missing `arguments` node counts as no arguments.
    pub fn check_function_call(
        &self,
        id: ScopeId,
        ast: &Ast,
        name: &str,
        arguments: Option<NodeId>,
    ) -> Result<&Function, Error> {
        let Some(function) = self.get_function(id, name) else {
            return Err(Error::unlocated(ErrorImpl::FunctionNotDeclared {
                function: name.to_string(),
            }));
        };

        let received = arguments.map_or(0, |arguments| ast.children(arguments).len());
        if received != function.parameters.len() {
            return Err(Error::unlocated(ErrorImpl::ArgumentCountMismatch {
                expected: function.parameters.len(),
                received,
            }));
        }

        // TODO: compare argument types once symbolic operands carry a static type.
        Ok(function)
    }

    /// Variables visible from `id` (its own and every ancestor's), plus every descendant
    /// scope's locals when `include_descendants` is set.
    pub fn count_variables(&self, id: ScopeId, include_descendants: bool) -> usize {
        let visible: usize = self
            .chain(id)
            .map(|scope| scope.symbol_table.get_count_variables())
            .sum();

        if include_descendants {
            visible + self.count_descendant_variables(id)
        } else {
            visible
        }
    }

    fn count_descendant_variables(&self, id: ScopeId) -> usize {
        self.scope(id)
            .sub_scopes
            .values()
            .map(|child| {
                self.scope(*child).symbol_table.get_count_variables()
                    + self.count_descendant_variables(*child)
            })
            .sum()
    }

    pub fn get_generated_type(&self, id: ScopeId, name: &str) -> GeneratedType {
        match self.get_variable(id, name) {
            Some(variable) => GeneratedType::from_type(&variable.var_type),
            None => GeneratedType::Error,
        }
    }
}
