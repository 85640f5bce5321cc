/// AST (Abstract Syntax Tree) module
/// Contains the arena tree the analyzer reads and rewrites
///
/// Submodules:
/// - ast: Node arena, node ids, tag vocabulary and tree printers
pub mod ast;
