use std::fmt::Write;

/// Index of a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A tagged tree node.
///
/// Interior nodes are tagged with a grammar production name (see [`tags`]); leaves carry
/// their token text as the tag (identifier names, operator spellings, literal text).
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub tag: String,
    pub children: Vec<NodeId>,
}

impl AstNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena holding every node of one compilation unit.
///
/// Child slots are indices, so replacing a subtree is overwriting a slot. Nodes that
/// become unreachable stay in the arena until it is dropped.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { nodes: vec![] }
    }

    pub fn push(&mut self, tag: impl Into<String>, children: Vec<NodeId>) -> NodeId {
        self.nodes.push(AstNode {
            tag: tag.into(),
            children,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn leaf(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(tag, vec![])
    }

    /// Creates a literal node (`integer`, `real` or `boolean`) holding `text` in its leaf.
    pub fn literal(&mut self, kind: &str, text: impl Into<String>) -> NodeId {
        let value = self.leaf(text);
        self.push(kind, vec![value])
    }

    pub fn get(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[id.0].children.get(index).copied()
    }

    /// Tag of the `index`th child, used for name leaves and operator leaves.
    pub fn child_tag(&self, id: NodeId, index: usize) -> Option<&str> {
        self.child(id, index).map(|child| self.tag(child))
    }

    /// First child carrying `tag`, for productions with optional parts.
    pub fn find_child(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.tag(*child) == tag)
    }

    /// Overwrites the `index`th child slot of `parent`. The previous subtree becomes
    /// unreachable from `parent`.
    pub fn replace_child(&mut self, parent: NodeId, index: usize, replacement: NodeId) {
        self.nodes[parent.0].children[index] = replacement;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the subtree as tree notation, e.g. `(factor (integer 2) + (integer 3))`.
    pub fn to_notation(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.write_notation(id, &mut result);
        result
    }

    fn write_notation(&self, id: NodeId, out: &mut String) {
        let node = self.get(id);
        if node.is_leaf() {
            out.push_str(&node.tag);
            return;
        }

        out.push('(');
        out.push_str(&node.tag);
        for child in node.children.iter() {
            out.push(' ');
            self.write_notation(*child, out);
        }
        out.push(')');
    }

    /// Renders the subtree as an indented `<tag>` listing, one node per line.
    pub fn print_tree(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.print_node(id, 0, &mut result);
        result
    }

    fn print_node(&self, id: NodeId, margin: usize, out: &mut String) {
        let _ = writeln!(out, "{}<{}>", "   ".repeat(margin), self.tag(id));
        for child in self.children(id) {
            self.print_node(*child, margin + 1, out);
        }
    }
}

/// Production names the analyzer pattern-matches on.
pub mod tags {
    pub const PROGRAM: &str = "program";
    pub const BODY: &str = "body";

    pub const TYPE_DECLARATION: &str = "type_declaration";
    pub const VARIABLE_DECLARATION: &str = "variable_declaration";
    pub const VARIABLE_DECLARATION_AUTO: &str = "variable_declaration_auto";
    pub const VARIABLES_DECLARATION: &str = "variables_declaration";
    pub const ROUTINE_DECLARATION: &str = "routine_declaration";
    pub const PARAMETERS: &str = "parameters";
    pub const PARAMETER_DECLARATION: &str = "parameter_declaration";

    pub const TYPE: &str = "type";
    pub const ARRAY_TYPE: &str = "array_type";
    pub const RECORD_TYPE: &str = "record_type";

    pub const ASSIGNMENT: &str = "assignment";
    pub const ROUTINE_CALL: &str = "routine_call";
    pub const ARGUMENTS: &str = "arguments";
    pub const WHILE_LOOP: &str = "while_loop";
    pub const FOR_LOOP: &str = "for_loop";
    pub const RANGE: &str = "range";
    pub const IF_STATEMENT: &str = "if_statement";
    pub const RETURN_STATEMENT: &str = "return_statement";

    pub const EXPRESSION: &str = "expression";
    pub const RELATION: &str = "relation";
    pub const SIMPLE: &str = "simple";
    pub const FACTOR: &str = "factor";
    pub const SUMMAND: &str = "summand";
    pub const NOT_FACTOR: &str = "not_factor";
    pub const UNARY_FACTOR: &str = "unary_factor";

    pub const INTEGER: &str = "integer";
    pub const REAL: &str = "real";
    pub const BOOLEAN: &str = "boolean";

    pub const MODIFIABLE_PRIMARY: &str = "modifiable_primary";
    pub const MODIFIABLE_PRIMARY_ARRAY: &str = "modifiable_primary_array";
    pub const MODIFIABLE_PRIMARY_FIELD: &str = "modifiable_primary_field";

    pub const TRUE: &str = "true";
    pub const FALSE: &str = "false";

    pub fn is_literal(tag: &str) -> bool {
        matches!(tag, INTEGER | REAL | BOOLEAN)
    }

    pub fn is_modifiable(tag: &str) -> bool {
        matches!(
            tag,
            MODIFIABLE_PRIMARY | MODIFIABLE_PRIMARY_ARRAY | MODIFIABLE_PRIMARY_FIELD
        )
    }
}
