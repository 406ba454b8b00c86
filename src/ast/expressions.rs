use crate::{symbol_table::SymbolId, Span};

use super::{
    statements::Stmt,
    types::{FunctionModifier, Qualifier, Type},
};

/// Expression node.
///
/// `resolved_type` is filled in by the type checker and doubles as a cache:
/// an expression that already carries a type is not checked again.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub resolved_type: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            resolved_type: None,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    /// Name of the variable this expression reads, if it is a bare variable.
    pub fn as_variable(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_thread_spawn(&self) -> bool {
        matches!(self.kind, ExprKind::ThreadSpawn(_))
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(LiteralValue),
    Variable(String),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Assign(AssignExpr),
    IndexAssign(IndexAssignExpr),
    Call(CallExpr),
    Array(Vec<Expr>),
    ArrayAccess(ArrayAccessExpr),
    Range(RangeExpr),
    Increment(Box<Expr>),
    Decrement(Box<Expr>),
    Member(MemberExpr),
    Lambda(LambdaExpr),
    ThreadSpawn(ThreadSpawnExpr),
    ThreadSync(ThreadSyncExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Long(i64),
    Double(f64),
    Char(char),
    Str(String),
    Bool(bool),
    Nil,
}

impl LiteralValue {
    pub fn get_type(&self) -> Type {
        match self {
            LiteralValue::Int(_) => Type::Int,
            LiteralValue::Long(_) => Type::Long,
            LiteralValue::Double(_) => Type::Double,
            LiteralValue::Char(_) => Type::Char,
            LiteralValue::Str(_) => Type::String,
            LiteralValue::Bool(_) => Type::Bool,
            LiteralValue::Nil => Type::Nil,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Less
                | BinaryOperator::LessEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEqual
        )
    }

    /// Arithmetic operators other than `+`, which also concatenates strings.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub name: String,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct IndexAssignExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct RangeExpr {
    pub start: Box<Expr>,
    pub end: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub member: String,
}

/// Function or lambda parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    /// `None` when omitted in source; lambdas may have it inferred.
    pub param_type: Option<Type>,
    pub qualifier: Qualifier,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

/// Outer variable referenced from a lambda body.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub name: String,
    pub capture_type: Type,
    pub symbol: SymbolId,
}

#[derive(Debug, Clone)]
pub struct LambdaExpr {
    pub params: Vec<Parameter>,
    pub return_type: Option<Type>,
    pub body: LambdaBody,
    pub modifier: FunctionModifier,
    pub captures: Vec<Capture>,
}

#[derive(Debug, Clone)]
pub struct ThreadSpawnExpr {
    pub call: Box<Expr>,
    /// Declared modifier of the spawned function, decides how the spawned
    /// call is run. Set by the type checker.
    pub mode: Option<FunctionModifier>,
}

#[derive(Debug, Clone)]
pub struct ThreadSyncExpr {
    pub handle: Box<Expr>,
    /// `[a, b]!` form.
    pub is_array: bool,
}
