use crate::{symbol_table::SymbolId, Span};

use super::{
    expressions::{Expr, Parameter},
    types::{BlockModifier, FunctionModifier, Qualifier, Type},
};

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExpressionStmt),
    VarDecl(VarDeclStmt),
    Function(FnDeclStmt),
    Return(ReturnStmt),
    Block(BlockStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Break(Span),
    Continue(Span),
    Import(ImportStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::Function(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Block(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::ForEach(stmt) => &stmt.span,
            Stmt::Break(span) | Stmt::Continue(span) => span,
            Stmt::Import(stmt) => &stmt.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub name: String,
    /// Written back by the type checker when inferred from the initializer.
    pub declared_type: Option<Type>,
    pub initializer: Option<Expr>,
    pub qualifier: Qualifier,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Type,
    pub body: Vec<Stmt>,
    pub modifier: FunctionModifier,
    /// Modifier the code generator should use, set by the type checker.
    pub effective_modifier: Option<FunctionModifier>,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub modifier: BlockModifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub is_shared: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub initializer: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub increment: Option<Expr>,
    pub body: Box<Stmt>,
    pub is_shared: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForEachStmt {
    pub var_name: String,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub is_shared: bool,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

/// `import "module" [as namespace];`
///
/// `statements` holds the imported module's own statements for namespaced
/// imports. Non-namespaced imports are merged into the importing module
/// before type checking and carry nothing.
#[derive(Debug, Clone)]
pub struct ImportStmt {
    pub module: String,
    pub namespace: Option<String>,
    pub statements: Vec<Stmt>,
    pub span: Span,
}
