/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Module and top-level declarations
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes
/// - types: The builtin type algebra
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
