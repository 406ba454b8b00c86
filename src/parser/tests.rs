//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable and function declarations
//! - Expressions and operator precedence
//! - Lambdas, thread spawn and sync
//! - Control flow statements
//! - Imports and import resolution

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::Module,
        expressions::{BinaryOperator, ExprKind, LambdaBody, LiteralValue, UnaryOperator},
        statements::Stmt,
        types::{BlockModifier, FunctionModifier, Qualifier, Type},
    },
    errors::errors::Error,
    lexer::lexer::tokenize,
};

use super::{imports::resolve_imports, parser::parse};

fn parse_source(source: &str) -> Result<Module, Error> {
    let tokens = tokenize(source.to_string(), Some("test.sn".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.sn".to_string()));
    result
}

fn first_stmt(source: &str) -> Stmt {
    parse_source(source).unwrap().statements.remove(0)
}

fn first_expr(source: &str) -> ExprKind {
    match first_stmt(source) {
        Stmt::Expression(stmt) => stmt.expression.kind,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let Stmt::VarDecl(decl) = first_stmt("var x: int = 42;") else {
        panic!("expected var declaration");
    };

    assert_eq!(decl.name, "x");
    assert_eq!(decl.declared_type, Some(Type::Int));
    assert_eq!(decl.qualifier, Qualifier::Default);
    assert!(matches!(
        decl.initializer.map(|e| e.kind),
        Some(ExprKind::Literal(LiteralValue::Int(42)))
    ));
}

#[test]
fn test_parse_variable_declaration_forms() {
    let Stmt::VarDecl(decl) = first_stmt("var s = \"hi\";") else {
        panic!("expected var declaration");
    };
    assert_eq!(decl.declared_type, None);

    let Stmt::VarDecl(decl) = first_stmt("var arr: int[];") else {
        panic!("expected var declaration");
    };
    assert_eq!(decl.declared_type, Some(Type::array(Type::Int)));
    assert!(decl.initializer.is_none());

    let Stmt::VarDecl(decl) = first_stmt("var n: int as ref = 1;") else {
        panic!("expected var declaration");
    };
    assert_eq!(decl.qualifier, Qualifier::AsRef);

    let Stmt::VarDecl(decl) = first_stmt("var data: str[] as val;") else {
        panic!("expected var declaration");
    };
    assert_eq!(decl.qualifier, Qualifier::AsVal);
}

#[test]
fn test_parse_literals() {
    assert!(matches!(
        first_expr("3.5;"),
        ExprKind::Literal(LiteralValue::Double(d)) if d == 3.5
    ));
    assert!(matches!(
        first_expr("7l;"),
        ExprKind::Literal(LiteralValue::Long(7))
    ));
    assert!(matches!(
        first_expr("'c';"),
        ExprKind::Literal(LiteralValue::Char('c'))
    ));
    assert!(matches!(
        first_expr("true;"),
        ExprKind::Literal(LiteralValue::Bool(true))
    ));
    assert!(matches!(first_expr("nil;"), ExprKind::Literal(LiteralValue::Nil)));
}

#[test]
fn test_parse_function_declaration() {
    let Stmt::Function(function) =
        first_stmt("fn add(a: int, b: int as ref) shared: int { return a + b; }")
    else {
        panic!("expected function declaration");
    };

    assert_eq!(function.name, "add");
    assert_eq!(function.params.len(), 2);
    assert_eq!(function.params[0].param_type, Some(Type::Int));
    assert_eq!(function.params[1].qualifier, Qualifier::AsRef);
    assert_eq!(function.modifier, FunctionModifier::Shared);
    assert_eq!(function.return_type, Type::Int);
    assert_eq!(function.body.len(), 1);
    assert!(function.effective_modifier.is_none());
}

#[test]
fn test_parse_function_defaults() {
    let Stmt::Function(function) = first_stmt("fn main() { }") else {
        panic!("expected function declaration");
    };

    assert_eq!(function.return_type, Type::Void);
    assert_eq!(function.modifier, FunctionModifier::Default);
    assert!(function.params.is_empty());

    let Stmt::Function(function) = first_stmt("fn f(x) private { }") else {
        panic!("expected function declaration");
    };
    assert_eq!(function.params[0].param_type, None);
    assert_eq!(function.modifier, FunctionModifier::Private);
}

#[test]
fn test_parse_precedence() {
    let ExprKind::Binary(binary) = first_expr("1 + 2 * 3;") else {
        panic!("expected binary expression");
    };
    assert_eq!(binary.operator, BinaryOperator::Add);
    assert!(matches!(
        binary.right.kind,
        ExprKind::Binary(ref right) if right.operator == BinaryOperator::Multiply
    ));

    let ExprKind::Binary(binary) = first_expr("a < b && c == d;") else {
        panic!("expected binary expression");
    };
    assert_eq!(binary.operator, BinaryOperator::And);

    let ExprKind::Binary(binary) = first_expr("-a * b;") else {
        panic!("expected binary expression");
    };
    assert_eq!(binary.operator, BinaryOperator::Multiply);
    assert!(matches!(
        binary.left.kind,
        ExprKind::Unary(ref unary) if unary.operator == UnaryOperator::Negate
    ));
}

#[test]
fn test_parse_grouping() {
    let ExprKind::Binary(binary) = first_expr("(1 + 2) * 3;") else {
        panic!("expected binary expression");
    };
    assert_eq!(binary.operator, BinaryOperator::Multiply);
}

#[test]
fn test_parse_assignment() {
    let ExprKind::Assign(assign) = first_expr("a = b = 1;") else {
        panic!("expected assignment");
    };
    assert_eq!(assign.name, "a");
    assert!(matches!(assign.value.kind, ExprKind::Assign(_)));

    assert!(matches!(first_expr("arr[0] = 5;"), ExprKind::IndexAssign(_)));
}

#[test]
fn test_parse_invalid_assignment_target() {
    let error = parse_source("1 = 2;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_calls_and_members() {
    let ExprKind::Call(call) = first_expr("f(1, x, \"s\");") else {
        panic!("expected call");
    };
    assert_eq!(call.arguments.len(), 3);
    assert_eq!(call.callee.as_variable(), Some("f"));

    let ExprKind::Call(call) = first_expr("arr.push(1);") else {
        panic!("expected call");
    };
    assert!(matches!(
        call.callee.kind,
        ExprKind::Member(ref member) if member.member == "push"
    ));

    assert!(matches!(first_expr("xs.length;"), ExprKind::Member(_)));
    assert!(matches!(first_expr("xs[1];"), ExprKind::ArrayAccess(_)));
    assert!(matches!(first_expr("i++;"), ExprKind::Increment(_)));
    assert!(matches!(first_expr("i--;"), ExprKind::Decrement(_)));
}

#[test]
fn test_parse_range_and_array_literal() {
    assert!(matches!(first_expr("1..10;"), ExprKind::Range(_)));

    let Stmt::VarDecl(decl) = first_stmt("var xs = {1, 2, 3};") else {
        panic!("expected var declaration");
    };
    assert!(matches!(
        decl.initializer.map(|e| e.kind),
        Some(ExprKind::Array(elements)) if elements.len() == 3
    ));

    let Stmt::VarDecl(decl) = first_stmt("var xs: int[] = {};") else {
        panic!("expected var declaration");
    };
    assert!(matches!(
        decl.initializer.map(|e| e.kind),
        Some(ExprKind::Array(elements)) if elements.is_empty()
    ));

    // a leading brace is a block
    assert!(matches!(first_stmt("{ }"), Stmt::Block(_)));
}

#[test]
fn test_parse_spawn_and_sync() {
    let Stmt::VarDecl(decl) = first_stmt("var h = &work(data);") else {
        panic!("expected var declaration");
    };
    let Some(ExprKind::ThreadSpawn(spawn)) = decl.initializer.map(|e| e.kind) else {
        panic!("expected spawn");
    };
    assert!(matches!(spawn.call.kind, ExprKind::Call(_)));
    assert!(spawn.mode.is_none());

    let ExprKind::ThreadSync(sync) = first_expr("h!;") else {
        panic!("expected sync");
    };
    assert!(!sync.is_array);
    assert_eq!(sync.handle.as_variable(), Some("h"));

    let ExprKind::ThreadSync(sync) = first_expr("[a, b]!;") else {
        panic!("expected array sync");
    };
    assert!(sync.is_array);
    assert!(matches!(sync.handle.kind, ExprKind::Array(ref handles) if handles.len() == 2));
}

#[test]
fn test_parse_array_sync_requires_bang() {
    assert!(parse_source("[a, b];").is_err());
}

#[test]
fn test_parse_not_equals_is_not_sync() {
    let ExprKind::Binary(binary) = first_expr("a != b;") else {
        panic!("expected binary expression");
    };
    assert_eq!(binary.operator, BinaryOperator::NotEqual);
}

#[test]
fn test_parse_lambdas() {
    let Stmt::VarDecl(decl) = first_stmt("var f = fn (x: int): int => x * 2;") else {
        panic!("expected var declaration");
    };
    let Some(ExprKind::Lambda(lambda)) = decl.initializer.map(|e| e.kind) else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.params.len(), 1);
    assert_eq!(lambda.return_type, Some(Type::Int));
    assert!(matches!(lambda.body, LambdaBody::Expr(_)));
    assert!(lambda.captures.is_empty());

    let ExprKind::Lambda(lambda) = first_expr("fn (a, b) private { return; };") else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.params[0].param_type, None);
    assert_eq!(lambda.return_type, None);
    assert_eq!(lambda.modifier, FunctionModifier::Private);
    assert!(matches!(lambda.body, LambdaBody::Block(ref body) if body.len() == 1));
}

#[test]
fn test_parse_function_types() {
    let Stmt::VarDecl(decl) = first_stmt("var f: fn(int, str as ref): bool;") else {
        panic!("expected var declaration");
    };
    let Some(Type::Function(function)) = decl.declared_type else {
        panic!("expected function type");
    };
    assert_eq!(function.params, vec![Type::Int, Type::String]);
    assert_eq!(*function.return_type, Type::Bool);
    assert_eq!(function.qualifier_of(1), Qualifier::AsRef);

    let Stmt::VarDecl(decl) = first_stmt("var g: fn(): void;") else {
        panic!("expected var declaration");
    };
    let Some(Type::Function(function)) = decl.declared_type else {
        panic!("expected function type");
    };
    assert!(function.param_qualifiers.is_none());

    let Stmt::VarDecl(decl) = first_stmt("var grid: int[][];") else {
        panic!("expected var declaration");
    };
    assert_eq!(decl.declared_type, Some(Type::array(Type::array(Type::Int))));
}

#[test]
fn test_parse_unknown_type() {
    let error = parse_source("var p: Point;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownType");
}

#[test]
fn test_parse_if_else_chain() {
    let Stmt::If(stmt) =
        first_stmt("if x > 0 { print(\"positive\"); } else if x < 0 { } else { }")
    else {
        panic!("expected if statement");
    };

    let Some(else_branch) = stmt.else_branch else {
        panic!("expected else branch");
    };
    let Stmt::If(nested) = *else_branch else {
        panic!("expected else-if");
    };
    assert!(nested.else_branch.is_some());
}

#[test]
fn test_parse_loops() {
    let Stmt::While(stmt) = first_stmt("while x < 10 { x = x + 1; }") else {
        panic!("expected while");
    };
    assert!(!stmt.is_shared);

    let Stmt::For(stmt) = first_stmt("for var i = 0; i < 10; i++ { }") else {
        panic!("expected for");
    };
    assert!(matches!(stmt.initializer.as_deref(), Some(Stmt::VarDecl(_))));
    assert!(stmt.condition.is_some());
    assert!(stmt.increment.is_some());

    let Stmt::For(stmt) = first_stmt("for ; ; { break; }") else {
        panic!("expected for");
    };
    assert!(stmt.initializer.is_none());
    assert!(stmt.condition.is_none());
    assert!(stmt.increment.is_none());

    let Stmt::ForEach(stmt) = first_stmt("for x in xs { continue; }") else {
        panic!("expected for-each");
    };
    assert_eq!(stmt.var_name, "x");
}

#[test]
fn test_parse_shared_and_private_blocks() {
    let Stmt::While(stmt) = first_stmt("shared while true { }") else {
        panic!("expected while");
    };
    assert!(stmt.is_shared);

    let Stmt::ForEach(stmt) = first_stmt("shared for x in xs { }") else {
        panic!("expected for-each");
    };
    assert!(stmt.is_shared);

    let Stmt::Block(block) = first_stmt("private { var x = 1; }") else {
        panic!("expected block");
    };
    assert_eq!(block.modifier, BlockModifier::Private);

    let Stmt::Block(block) = first_stmt("shared { }") else {
        panic!("expected block");
    };
    assert_eq!(block.modifier, BlockModifier::Shared);

    assert!(parse_source("shared return;").is_err());
}

#[test]
fn test_parse_imports() {
    let Stmt::Import(import) = first_stmt("import \"math\";") else {
        panic!("expected import");
    };
    assert_eq!(import.module, "math");
    assert!(import.namespace.is_none());

    let Stmt::Import(import) = first_stmt("import \"math\" as m;") else {
        panic!("expected import");
    };
    assert_eq!(import.namespace.as_deref(), Some("m"));

    // reserved words are accepted here and rejected by the type checker
    let Stmt::Import(import) = first_stmt("import \"math\" as int;") else {
        panic!("expected import");
    };
    assert_eq!(import.namespace.as_deref(), Some("int"));
}

#[test]
fn test_parse_missing_semicolon() {
    let error = parse_source("var x = 1").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parse_spans() {
    let stmt = first_stmt("var x = 1;");
    assert_eq!(stmt.get_span().start.0, 0);
    assert_eq!(stmt.get_span().start.1.as_str(), "test.sn");
}

fn modules() -> HashMap<&'static str, &'static str> {
    let mut map = HashMap::new();
    map.insert("math", "fn square(x: int): int { return x * x; }");
    map.insert("util", "import \"math\"; fn twice(x: int): int { return x + x; }");
    map.insert("broken", "fn (");
    map
}

#[test]
fn test_resolve_plain_imports_merge_once() {
    let module = parse_source("import \"math\"; import \"util\"; import \"math\";").unwrap();
    let sources = modules();
    let mut reader = |name: &str| sources.get(name).map(|s| s.to_string());

    let statements = resolve_imports(module.statements, &mut reader).unwrap();

    assert_eq!(statements.len(), 2);
    assert!(statements.iter().all(|s| matches!(s, Stmt::Function(_))));
}

#[test]
fn test_resolve_namespaced_import_keeps_statements() {
    let module = parse_source("import \"math\" as m; import \"math\";").unwrap();
    let sources = modules();
    let mut reader = |name: &str| sources.get(name).map(|s| s.to_string());

    let statements = resolve_imports(module.statements, &mut reader).unwrap();

    assert_eq!(statements.len(), 2);
    let Stmt::Import(import) = &statements[0] else {
        panic!("expected namespaced import");
    };
    assert_eq!(import.statements.len(), 1);
    assert!(matches!(statements[1], Stmt::Function(_)));
}

#[test]
fn test_resolve_missing_import() {
    let module = parse_source("import \"nowhere\";").unwrap();
    let mut reader = |_: &str| -> Option<String> { None };

    let error = resolve_imports(module.statements, &mut reader).unwrap_err();
    assert_eq!(error.get_error_name(), "ImportNotFound");
}

#[test]
fn test_resolve_import_parse_error() {
    let module = parse_source("import \"broken\";").unwrap();
    let sources = modules();
    let mut reader = |name: &str| sources.get(name).map(|s| s.to_string());

    let error = resolve_imports(module.statements, &mut reader).unwrap_err();
    assert_eq!(error.get_position().1.as_str(), "broken.sn");
}
