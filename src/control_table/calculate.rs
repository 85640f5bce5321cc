//! Constant folding over expression subtrees.
//!
//! Folding is bottom-up: operands are folded first and written back into their child
//! slot, then an operator whose operands are both literals is replaced by a new literal.
//! Operator legality is only checked for literal operands. A symbolic operand (a
//! validated lvalue) leaves its operator node in place, unless the other operand is a
//! literal the operator can never accept.

use log::trace;

use crate::{
    ast::ast::{tags, Ast, NodeId},
    errors::errors::{Error, ErrorImpl},
};

use super::control_table::{malformed, ControlTable, ScopeId};

/// Operator families, named after the production that carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    /// `expression`: and, or, xor
    Logical,
    /// `relation`: <, <=, >, >=, =, /=
    Relational,
    /// `simple`: *, /, %
    Multiplicative,
    /// `factor`: +, -
    Additive,
}

impl Family {
    fn of(tag: &str) -> Option<Self> {
        match tag {
            tags::EXPRESSION => Some(Family::Logical),
            tags::RELATION => Some(Family::Relational),
            tags::SIMPLE => Some(Family::Multiplicative),
            tags::FACTOR => Some(Family::Additive),
            _ => None,
        }
    }

    fn accepts_operator(self, operator: &str) -> bool {
        match self {
            Family::Logical => matches!(operator, "and" | "or" | "xor"),
            Family::Relational => matches!(operator, "<" | "<=" | ">" | ">=" | "=" | "/="),
            Family::Multiplicative => matches!(operator, "*" | "/" | "%"),
            Family::Additive => matches!(operator, "+" | "-"),
        }
    }

    /// The literal kind this family can never take as an operand.
    fn rejected_literal(self) -> &'static str {
        match self {
            Family::Logical => tags::REAL,
            _ => tags::BOOLEAN,
        }
    }
}

fn literal_text(ast: &Ast, node: NodeId) -> Result<&str, Error> {
    ast.child_tag(node, 0)
        .ok_or_else(|| malformed(ast, node, "a literal value leaf"))
}

fn invalid_literal(ast: &Ast, node: NodeId) -> Error {
    Error::at_node(
        ErrorImpl::InvalidLiteral {
            literal: ast.child_tag(node, 0).unwrap_or_default().to_string(),
        },
        node,
    )
}

fn to_integer(ast: &Ast, node: NodeId) -> Result<i64, Error> {
    literal_text(ast, node)?
        .parse::<i64>()
        .map_err(|_| invalid_literal(ast, node))
}

fn to_real(ast: &Ast, node: NodeId) -> Result<f64, Error> {
    match ast.tag(node) {
        tags::INTEGER => to_integer(ast, node).map(|value| value as f64),
        tags::REAL => literal_text(ast, node)?
            .parse::<f64>()
            .map_err(|_| invalid_literal(ast, node)),
        _ => Err(malformed(ast, node, "a numeric literal")),
    }
}

/// Integers convert only from 0 and 1.
fn to_boolean(ast: &Ast, node: NodeId) -> Result<bool, Error> {
    match ast.tag(node) {
        tags::BOOLEAN => match literal_text(ast, node)? {
            tags::TRUE => Ok(true),
            tags::FALSE => Ok(false),
            _ => Err(invalid_literal(ast, node)),
        },
        tags::INTEGER => match to_integer(ast, node)? {
            1 => Ok(true),
            0 => Ok(false),
            value => Err(Error::at_node(
                ErrorImpl::BooleanConversion {
                    value: value.to_string(),
                },
                node,
            )),
        },
        _ => Err(Error::at_node(
            ErrorImpl::BooleanConversion {
                value: literal_text(ast, node)?.to_string(),
            },
            node,
        )),
    }
}

fn boolean_literal(ast: &mut Ast, value: bool) -> NodeId {
    ast.literal(tags::BOOLEAN, if value { tags::TRUE } else { tags::FALSE })
}

fn integer_literal(ast: &mut Ast, value: i64) -> NodeId {
    ast.literal(tags::INTEGER, value.to_string())
}

fn real_literal(ast: &mut Ast, value: f64) -> NodeId {
    ast.literal(tags::REAL, format!("{:?}", value))
}

fn unknown_operator(operator: &str, node: NodeId) -> Error {
    Error::at_node(
        ErrorImpl::UnknownOperator {
            operator: operator.to_string(),
        },
        node,
    )
}

fn illegal_operand(operator: &str, operand_tag: &str, operand: NodeId) -> Error {
    Error::at_node(
        ErrorImpl::IllegalOperandType {
            operator: operator.to_string(),
            operand: operand_tag.to_string(),
        },
        operand,
    )
}

fn overflow(operator: &str, node: NodeId) -> Error {
    Error::at_node(
        ErrorImpl::IntegerOverflow {
            operator: operator.to_string(),
        },
        node,
    )
}

fn fold_integers(operator: &str, left: i64, right: i64, node: NodeId) -> Result<i64, Error> {
    let result = match operator {
        "+" => left.checked_add(right),
        "-" => left.checked_sub(right),
        "*" => left.checked_mul(right),
        "/" | "%" if right == 0 => return Err(Error::at_node(ErrorImpl::DivisionByZero, node)),
        "/" => left.checked_div(right),
        "%" => left.checked_rem(right),
        _ => return Err(unknown_operator(operator, node)),
    };

    result.ok_or_else(|| overflow(operator, node))
}

fn fold_reals(operator: &str, left: f64, right: f64, node: NodeId) -> Result<f64, Error> {
    match operator {
        "+" => Ok(left + right),
        "-" => Ok(left - right),
        "*" => Ok(left * right),
        "/" if right == 0.0 => Err(Error::at_node(ErrorImpl::DivisionByZero, node)),
        "/" => Ok(left / right),
        "%" => Err(Error::at_node(ErrorImpl::ModuloOnReal, node)),
        _ => Err(unknown_operator(operator, node)),
    }
}

fn compare(operator: &str, left: f64, right: f64, node: NodeId) -> Result<bool, Error> {
    match operator {
        "<" => Ok(left < right),
        "<=" => Ok(left <= right),
        ">" => Ok(left > right),
        ">=" => Ok(left >= right),
        "=" => Ok(left == right),
        "/=" => Ok(left != right),
        _ => Err(unknown_operator(operator, node)),
    }
}

impl ControlTable {
    /// Folds the expression rooted at `node`.
    ///
    /// Returns the node that now stands for the expression: `node` itself when nothing
    /// could be folded, a child when `node` was a single-operand wrapper, or a fresh
    /// literal. Operand slots below `node` are rewritten in place; writing the result
    /// into `node`'s own slot is left to the caller (see [`ControlTable::process_expression`]).
    pub fn calculate(&self, id: ScopeId, ast: &mut Ast, node: NodeId) -> Result<NodeId, Error> {
        let tag = ast.tag(node).to_string();

        if let Some(family) = Family::of(&tag) {
            return self.calculate_binary(id, ast, node, family);
        }

        match tag.as_str() {
            tags::SUMMAND => match ast.child(node, 0) {
                Some(operand) => self.calculate(id, ast, operand),
                None => Err(malformed(ast, node, "one operand")),
            },
            tags::NOT_FACTOR => self.calculate_not(id, ast, node),
            tags::UNARY_FACTOR => self.calculate_unary(id, ast, node),
            tags::INTEGER | tags::REAL | tags::BOOLEAN => Ok(node),
            lvalue if tags::is_modifiable(lvalue) => {
                self.check_modifiable(id, ast, node)?;
                Ok(node)
            }
            _ => Err(Error::at_node(ErrorImpl::UnsupportedExpression { tag: tag.clone() }, node)),
        }
    }

    /// Folds the `slot`th child of `parent` and stores the result back into that slot.
    pub fn process_expression(
        &self,
        id: ScopeId,
        ast: &mut Ast,
        parent: NodeId,
        slot: usize,
    ) -> Result<NodeId, Error> {
        let Some(child) = ast.child(parent, slot) else {
            return Err(malformed(ast, parent, &format!("an expression at position {}", slot)));
        };

        let result = self.calculate(id, ast, child)?;
        if result != child {
            ast.replace_child(parent, slot, result);
        }

        Ok(result)
    }

    fn calculate_binary(
        &self,
        id: ScopeId,
        ast: &mut Ast,
        node: NodeId,
        family: Family,
    ) -> Result<NodeId, Error> {
        let left = self.process_expression(id, ast, node, 0)?;
        match ast.children(node).len() {
            1 => return Ok(left),
            3 => {}
            _ => {
                return Err(malformed(
                    ast,
                    node,
                    "one operand, or two operands around an operator",
                ))
            }
        }
        let right = self.process_expression(id, ast, node, 2)?;

        let operator = match ast.child(node, 1) {
            Some(operator) if ast.get(operator).is_leaf() => ast.tag(operator).to_string(),
            _ => return Err(malformed(ast, node, "an operator leaf")),
        };
        if !family.accepts_operator(&operator) {
            return Err(unknown_operator(&operator, node));
        }

        for operand in [left, right] {
            if ast.tag(operand) == family.rejected_literal() {
                return Err(illegal_operand(&operator, ast.tag(operand), operand));
            }
        }

        if !tags::is_literal(ast.tag(left)) || !tags::is_literal(ast.tag(right)) {
            trace!("`{}` left symbolic at {:?}", operator, node);
            return Ok(node);
        }

        let result = match family {
            Family::Logical => {
                let (l, r) = (to_boolean(ast, left)?, to_boolean(ast, right)?);
                let value = match operator.as_str() {
                    "and" => l && r,
                    "or" => l || r,
                    _ => l ^ r,
                };
                boolean_literal(ast, value)
            }
            Family::Relational => {
                let value = compare(&operator, to_real(ast, left)?, to_real(ast, right)?, node)?;
                boolean_literal(ast, value)
            }
            Family::Multiplicative | Family::Additive => {
                if ast.tag(left) == tags::INTEGER && ast.tag(right) == tags::INTEGER {
                    let (left, right) = (to_integer(ast, left)?, to_integer(ast, right)?);
                    let value = fold_integers(&operator, left, right, node)?;
                    integer_literal(ast, value)
                } else {
                    let (left, right) = (to_real(ast, left)?, to_real(ast, right)?);
                    let value = fold_reals(&operator, left, right, node)?;
                    real_literal(ast, value)
                }
            }
        };

        trace!("folded `{}` at {:?} to {}", operator, node, ast.to_notation(result));
        Ok(result)
    }

    fn calculate_not(&self, id: ScopeId, ast: &mut Ast, node: NodeId) -> Result<NodeId, Error> {
        let operand = self.process_expression(id, ast, node, 1)?;

        match ast.tag(operand).to_string().as_str() {
            tags::REAL => Err(illegal_operand("not", tags::REAL, operand)),
            tags::INTEGER | tags::BOOLEAN => {
                let value = to_boolean(ast, operand)?;
                Ok(boolean_literal(ast, !value))
            }
            _ => Ok(node),
        }
    }

    fn calculate_unary(&self, id: ScopeId, ast: &mut Ast, node: NodeId) -> Result<NodeId, Error> {
        let operand = self.process_expression(id, ast, node, 1)?;
        let sign = match ast.child(node, 0) {
            Some(sign) if ast.get(sign).is_leaf() => ast.tag(sign).to_string(),
            _ => return Err(malformed(ast, node, "a sign leaf")),
        };

        let operand_tag = ast.tag(operand).to_string();
        match (operand_tag.as_str(), sign.as_str()) {
            (tags::BOOLEAN, _) => Err(illegal_operand(&sign, tags::BOOLEAN, operand)),
            (tags::INTEGER | tags::REAL, "+") => Ok(operand),
            (tags::INTEGER, "-") => {
                let value = to_integer(ast, operand)?
                    .checked_neg()
                    .ok_or_else(|| overflow(&sign, node))?;
                Ok(integer_literal(ast, value))
            }
            (tags::REAL, "-") => {
                let value = -to_real(ast, operand)?;
                Ok(real_literal(ast, value))
            }
            (tags::INTEGER | tags::REAL, _) => Err(unknown_operator(&sign, node)),
            _ => Ok(node),
        }
    }
}
