/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The module root handed to the type checker
/// - expressions: Expression nodes, annotated with their resolved type
/// - statements: Statement nodes, annotated with their symbol ids
/// - types: The type model, qualifiers and modifiers
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
