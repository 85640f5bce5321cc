use log::{debug, info, warn};

use crate::{
    ast::ast::{tags, Ast, NodeId},
    control_table::control_table::{malformed, name_at, ControlTable, ScopeId},
    errors::errors::Error,
};

/// Knobs for a single analysis run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerOptions {
    /// Stop at the first error instead of only at the first fatal one.
    pub fail_fast: bool,
}

/// Result of analysing one program tree.
#[derive(Debug)]
pub struct Analysis {
    pub table: ControlTable,
    /// Errors in the order they were found. A fatal error is always the last one.
    pub errors: Vec<Error>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn fatal_error(&self) -> Option<&Error> {
        self.errors.last().filter(|error| error.is_fatal())
    }
}

/// The walk was stopped; every error is already recorded.
struct Halt;

type Walk = Result<(), Halt>;

struct Analyzer<'a> {
    ast: &'a mut Ast,
    table: ControlTable,
    errors: Vec<Error>,
    options: AnalyzerOptions,
}

/// Declares everything in the `program` tree at `root` into a fresh control table,
/// validating statements and folding constant expressions in place.
pub fn analyze(ast: &mut Ast, root: NodeId, options: &AnalyzerOptions) -> Analysis {
    let mut analyzer = Analyzer {
        ast,
        table: ControlTable::new(),
        errors: vec![],
        options: *options,
    };

    info!("analysing program");
    let scope = analyzer.table.root();
    if analyzer.program(scope, root).is_err() {
        warn!("analysis stopped after {} errors", analyzer.errors.len());
    }
    info!(
        "analysis finished: {} scopes, {} errors",
        analyzer.table.scope_count(),
        analyzer.errors.len()
    );

    Analysis {
        table: analyzer.table,
        errors: analyzer.errors,
    }
}

impl Analyzer<'_> {
    /// Records a failed step. Returns `Ok(None)` when the walk may go on.
    fn attempt<T>(&mut self, node: NodeId, result: Result<T, Error>) -> Result<Option<T>, Halt> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                let error = error.at(node);
                let halt = error.is_fatal() || self.options.fail_fast;
                debug!("{} at {:?}", error, error.get_node());
                self.errors.push(error);

                if halt {
                    Err(Halt)
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn program(&mut self, scope: ScopeId, root: NodeId) -> Walk {
        if self.ast.tag(root) != tags::PROGRAM {
            self.attempt::<()>(root, Err(malformed(self.ast, root, "a `program` node")))?;
            return Ok(());
        }

        for declaration in self.ast.children(root).to_vec() {
            if self.ast.tag(declaration) == tags::ROUTINE_DECLARATION {
                self.routine_declaration(scope, declaration)?;
            } else {
                self.declaration(scope, declaration)?;
            }
        }

        Ok(())
    }

    /// Type and variable declarations, allowed both at the top level and in bodies.
    fn declaration(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let tag = self.ast.tag(node).to_string();
        let Some(name) = self.attempt(node, name_at(self.ast, node, 0))? else {
            return Ok(());
        };

        let result = match tag.as_str() {
            tags::TYPE_DECLARATION => match self.ast.child(node, 1) {
                Some(type_node) => self
                    .fold_sizes(scope, type_node)
                    .and_then(|_| self.table.add_type(scope, self.ast, &name, type_node)),
                None => Err(malformed(self.ast, node, "a name and a type")),
            },
            tags::VARIABLE_DECLARATION => match self.ast.child(node, 1) {
                Some(type_node) => {
                    let init = self.ast.child(node, 2);
                    if init.is_some() {
                        let folded = self.table.process_expression(scope, self.ast, node, 2);
                        self.attempt(node, folded)?;
                    }
                    self.fold_sizes(scope, type_node).and_then(|_| {
                        let init = self.ast.child(node, 2);
                        self.table.add_variable(scope, self.ast, &name, type_node, init)
                    })
                }
                None => Err(malformed(
                    self.ast,
                    node,
                    "a name, a type and an optional initializer",
                )),
            },
            tags::VARIABLE_DECLARATION_AUTO => {
                if self.ast.child(node, 1).is_some() {
                    let folded = self.table.process_expression(scope, self.ast, node, 1);
                    self.attempt(node, folded)?;
                }
                let init = self.ast.child(node, 1);
                self.table.add_auto_variable(scope, &name, init)
            }
            _ => Err(malformed(self.ast, node, "a declaration")),
        };

        self.attempt(node, result)?;
        Ok(())
    }

    /// Folds array size expressions and record field initializers inside a `type` node.
    fn fold_sizes(&mut self, scope: ScopeId, type_node: NodeId) -> Result<(), Error> {
        let Some(real_type) = self.ast.child(type_node, 0) else {
            return Ok(());
        };

        let tag = self.ast.tag(real_type).to_string();
        match tag.as_str() {
            tags::ARRAY_TYPE => {
                self.table.process_expression(scope, self.ast, real_type, 0)?;
                match self.ast.child(real_type, 1) {
                    Some(element) => self.fold_sizes(scope, element),
                    None => Ok(()),
                }
            }
            tags::RECORD_TYPE => {
                let Some(fields) = self.ast.child(real_type, 0) else {
                    return Ok(());
                };
                for field in self.ast.children(fields).to_vec() {
                    let field_tag = self.ast.tag(field).to_string();
                    let init_slot = match field_tag.as_str() {
                        tags::VARIABLE_DECLARATION => {
                            if let Some(field_type) = self.ast.child(field, 1) {
                                self.fold_sizes(scope, field_type)?;
                            }
                            2
                        }
                        tags::VARIABLE_DECLARATION_AUTO => 1,
                        _ => continue,
                    };
                    if self.ast.child(field, init_slot).is_some() {
                        self.table.process_expression(scope, self.ast, field, init_slot)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn routine_declaration(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let Some(name) = self.attempt(node, name_at(self.ast, node, 0))? else {
            return Ok(());
        };
        let parameters = self.ast.find_child(node, tags::PARAMETERS);
        let return_type = self.ast.find_child(node, tags::TYPE);
        let body = self.ast.find_child(node, tags::BODY);

        let declared = self
            .table
            .add_function(scope, self.ast, &name, return_type, parameters);
        let Some(function_scope) = self.attempt(node, declared)? else {
            return Ok(());
        };

        debug!("routine `{}` declared with scope {}", name, function_scope);
        match body {
            Some(body) => self.body(function_scope, body),
            None => Ok(()),
        }
    }

    fn body(&mut self, scope: ScopeId, body: NodeId) -> Walk {
        if self.ast.tag(body) != tags::BODY {
            self.attempt::<()>(body, Err(malformed(self.ast, body, "a `body` node")))?;
            return Ok(());
        }

        for statement in self.ast.children(body).to_vec() {
            self.statement(scope, statement)?;
        }

        Ok(())
    }

    /// Walks `body` in a new anonymous child scope of `scope`.
    fn nested_body(&mut self, scope: ScopeId, node: NodeId, body: NodeId) -> Walk {
        let created = self.table.add_anonymous_sub_scope(scope);
        let Some((key, inner)) = self.attempt(node, created)? else {
            return Ok(());
        };
        debug!("entering block `{}` ({}) of {}", key, inner, scope);

        self.body(inner, body)
    }

    fn statement(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let tag = self.ast.tag(node).to_string();
        match tag.as_str() {
            tags::TYPE_DECLARATION
            | tags::VARIABLE_DECLARATION
            | tags::VARIABLE_DECLARATION_AUTO => {
                self.declaration(scope, node)
            }
            tags::ASSIGNMENT => self.assignment(scope, node),
            tags::ROUTINE_CALL => self.routine_call(scope, node),
            tags::WHILE_LOOP => self.while_loop(scope, node),
            tags::FOR_LOOP => self.for_loop(scope, node),
            tags::IF_STATEMENT => self.if_statement(scope, node),
            tags::RETURN_STATEMENT => {
                if self.ast.child(node, 0).is_some() {
                    let folded = self.table.process_expression(scope, self.ast, node, 0);
                    self.attempt(node, folded)?;
                }
                Ok(())
            }
            _ => {
                self.attempt::<()>(node, Err(malformed(self.ast, node, "a statement")))?;
                Ok(())
            }
        }
    }

    fn assignment(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let (Some(lvalue), Some(_)) = (self.ast.child(node, 0), self.ast.child(node, 1)) else {
            let error = malformed(self.ast, node, "an lvalue and an expression");
            self.attempt::<()>(node, Err(error))?;
            return Ok(());
        };

        let target = self.table.check_modifiable(scope, self.ast, lvalue);
        if let Some(target) = self.attempt(lvalue, target)? {
            debug!("assignment to {} at {:?}", target, node);
        }
        let folded = self.table.process_expression(scope, self.ast, node, 1);
        self.attempt(node, folded)?;

        Ok(())
    }

    fn routine_call(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let Some(name) = self.attempt(node, name_at(self.ast, node, 0))? else {
            return Ok(());
        };
        let arguments = self.ast.find_child(node, tags::ARGUMENTS);

        let checked = self
            .table
            .check_function_call(scope, self.ast, &name, arguments)
            .map(|_| ());
        self.attempt(node, checked)?;

        if let Some(arguments) = arguments {
            for slot in 0..self.ast.children(arguments).len() {
                let folded = self.table.process_expression(scope, self.ast, arguments, slot);
                self.attempt(arguments, folded)?;
            }
        }

        Ok(())
    }

    fn while_loop(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let (Some(_), Some(body)) = (self.ast.child(node, 0), self.ast.child(node, 1)) else {
            self.attempt::<()>(node, Err(malformed(self.ast, node, "a condition and a body")))?;
            return Ok(());
        };

        let folded = self.table.process_expression(scope, self.ast, node, 0);
        self.attempt(node, folded)?;
        self.nested_body(scope, node, body)
    }

    fn for_loop(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let (Some(range), Some(body)) = (self.ast.child(node, 1), self.ast.child(node, 2)) else {
            let error = malformed(self.ast, node, "a counter, a range and a body");
            self.attempt::<()>(node, Err(error))?;
            return Ok(());
        };
        let Some(counter) = self.attempt(node, name_at(self.ast, node, 0))? else {
            return Ok(());
        };

        if self.ast.tag(range) != tags::RANGE || self.ast.children(range).len() != 2 {
            let error = malformed(self.ast, range, "a `range` with two bounds");
            self.attempt::<()>(range, Err(error))?;
        } else {
            for slot in 0..2 {
                let folded = self.table.process_expression(scope, self.ast, range, slot);
                self.attempt(range, folded)?;
            }
        }

        let created = self.table.add_anonymous_sub_scope(scope);
        let Some((key, inner)) = self.attempt(node, created)? else {
            return Ok(());
        };
        debug!("entering loop `{}` ({}) of {} with counter `{}`", key, inner, scope, counter);

        let declared = self.table.add_counter(inner, &counter);
        self.attempt(node, declared)?;
        self.body(inner, body)
    }

    fn if_statement(&mut self, scope: ScopeId, node: NodeId) -> Walk {
        let (Some(_), Some(then_body)) = (self.ast.child(node, 0), self.ast.child(node, 1)) else {
            self.attempt::<()>(node, Err(malformed(self.ast, node, "a condition and a body")))?;
            return Ok(());
        };

        let folded = self.table.process_expression(scope, self.ast, node, 0);
        self.attempt(node, folded)?;
        self.nested_body(scope, node, then_body)?;
        if let Some(else_body) = self.ast.child(node, 2) {
            self.nested_body(scope, node, else_body)?;
        }

        Ok(())
    }
}
