use log::Level;

use crate::{
    ast::{
        expressions::{
            ArrayAccessExpr, AssignExpr, BinaryExpr, BinaryOperator, CallExpr, Expr, ExprKind,
            IndexAssignExpr, LambdaBody, LambdaExpr, MemberExpr, RangeExpr, UnaryExpr,
            UnaryOperator,
        },
        types::{promoted_type, type_equals, FunctionModifier, FunctionType, Qualifier, Type},
    },
    errors::errors::{Error, ErrorImpl},
    symbol_table::SymbolKind,
    Position, CHECKER_LOG,
};

use super::{
    stmt::check_stmt,
    threads::{check_mutation, check_not_frozen, check_spawn, check_sync, MUTATING_METHODS},
    type_checker::{closest_match, LambdaFrame, TypeChecker},
    validator::{check_param_qualifier, check_private_return},
};

pub const ARRAY_METHODS: [&str; 12] = [
    "length", "push", "pop", "clear", "concat", "indexOf", "contains", "clone", "join", "reverse",
    "insert", "remove",
];

pub const STRING_METHODS: [&str; 13] = [
    "length",
    "substring",
    "indexOf",
    "split",
    "trim",
    "toUpper",
    "toLower",
    "startsWith",
    "endsWith",
    "contains",
    "replace",
    "charAt",
    "append",
];

/// Type checks an expression and caches the result on the node.
///
/// An expression that already carries a resolved type is not visited again.
pub fn check_expr(checker: &mut TypeChecker, expr: &mut Expr) -> Result<Type, Error> {
    if let Some(ty) = &expr.resolved_type {
        CHECKER_LOG!(checker.config, Level::Trace, "using cached type {}", ty);
        return Ok(ty.clone());
    }

    let position = expr.span.start.clone();
    let ty = match &mut expr.kind {
        ExprKind::Literal(value) => value.get_type(),
        ExprKind::Variable(name) => check_variable(checker, name, position)?,
        ExprKind::Binary(binary) => check_binary(checker, binary, position)?,
        ExprKind::Unary(unary) => check_unary(checker, unary, position)?,
        ExprKind::Assign(assign) => check_assign(checker, assign, position)?,
        ExprKind::IndexAssign(assign) => check_index_assign(checker, assign, position)?,
        ExprKind::Call(call) => check_call(checker, call, position)?,
        ExprKind::Array(elements) => check_array_literal(checker, elements, position)?,
        ExprKind::ArrayAccess(access) => check_array_access(checker, access, position)?,
        ExprKind::Range(range) => check_range(checker, range, position)?,
        ExprKind::Increment(operand) | ExprKind::Decrement(operand) => {
            check_increment(checker, operand, position)?
        }
        ExprKind::Member(member) => check_member(checker, member, position)?,
        ExprKind::Lambda(lambda) => check_lambda(checker, lambda, position)?,
        ExprKind::ThreadSpawn(spawn) => check_spawn(checker, spawn, position)?,
        ExprKind::ThreadSync(sync) => check_sync(checker, sync, position)?,
    };

    expr.resolved_type = Some(ty.clone());
    Ok(ty)
}

fn is_integral(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::Long | Type::Byte)
}

fn is_numeric_operand(ty: &Type) -> bool {
    ty.is_numeric() || matches!(ty, Type::Byte)
}

/// Result of `- * / %` (and numeric `+`), widening towards `double`.
fn arithmetic_type(left: &Type, right: &Type) -> Option<Type> {
    match (left, right) {
        (Type::Byte, Type::Byte) => Some(Type::Byte),
        (Type::Byte, Type::Int) | (Type::Int, Type::Byte) => Some(Type::Int),
        _ if left.is_numeric() && right.is_numeric() => promoted_type(left, right),
        _ => None,
    }
}

fn check_variable(
    checker: &mut TypeChecker,
    name: &str,
    position: Position,
) -> Result<Type, Error> {
    let Some(id) = checker.resolve(name) else {
        return Err(Error::new(
            ErrorImpl::UndefinedVariable {
                name: name.to_string(),
                suggestion: checker.suggest_name(name),
            },
            position,
        ));
    };

    let symbol = checker.table.symbol(id);
    if symbol.is_namespace() {
        return Err(Error::new(
            ErrorImpl::UndefinedVariable {
                name: name.to_string(),
                suggestion: None,
            },
            position,
        ));
    }
    if symbol.is_pending() {
        return Err(Error::new(
            ErrorImpl::PendingHandleUse {
                name: name.to_string(),
            },
            position,
        ));
    }

    Ok(symbol.ty.clone())
}

fn check_binary(
    checker: &mut TypeChecker,
    binary: &mut BinaryExpr,
    position: Position,
) -> Result<Type, Error> {
    let left = check_expr(checker, &mut binary.left)?;
    let right = check_expr(checker, &mut binary.right)?;

    let operator = binary.operator;
    if operator.is_comparison() {
        if type_equals(&left, &right) || (is_numeric_operand(&left) && is_numeric_operand(&right))
        {
            return Ok(Type::Bool);
        }
        return Err(Error::new(ErrorImpl::ComparisonMismatch, position));
    }

    match operator {
        BinaryOperator::And | BinaryOperator::Or => {
            if left == Type::Bool && right == Type::Bool {
                Ok(Type::Bool)
            } else {
                Err(Error::new(ErrorImpl::LogicalOperands, position))
            }
        }
        BinaryOperator::Add => {
            if let Some(ty) = arithmetic_type(&left, &right) {
                return Ok(ty);
            }
            let concatenates = (left == Type::String && right.is_printable())
                || (right == Type::String && left.is_printable());
            if concatenates {
                Ok(Type::String)
            } else {
                Err(Error::new(ErrorImpl::InvalidAddition, position))
            }
        }
        _ => arithmetic_type(&left, &right)
            .ok_or_else(|| Error::new(ErrorImpl::InvalidArithmetic, position)),
    }
}

fn check_unary(
    checker: &mut TypeChecker,
    unary: &mut UnaryExpr,
    position: Position,
) -> Result<Type, Error> {
    let operand = check_expr(checker, &mut unary.operand)?;

    match unary.operator {
        UnaryOperator::Negate if is_numeric_operand(&operand) => Ok(operand),
        UnaryOperator::Negate => Err(Error::new(ErrorImpl::UnaryMinus, position)),
        UnaryOperator::Not if operand == Type::Bool => Ok(Type::Bool),
        UnaryOperator::Not => Err(Error::new(ErrorImpl::UnaryNot, position)),
    }
}

fn check_assign(
    checker: &mut TypeChecker,
    assign: &mut AssignExpr,
    position: Position,
) -> Result<Type, Error> {
    let Some(id) = checker.resolve(&assign.name) else {
        return Err(Error::new(
            ErrorImpl::UndefinedAssignTarget {
                name: assign.name.clone(),
                suggestion: checker.suggest_name(&assign.name),
            },
            position,
        ));
    };

    check_mutation(checker, &assign.name, position.clone())?;

    let target = checker.table.symbol(id).ty.clone();
    if let Type::Function(function) = &target {
        infer_lambda(&mut assign.value, function);
    }

    let value = check_expr(checker, &mut assign.value)?;
    if !type_equals(&target, &value) {
        return Err(Error::new(
            ErrorImpl::AssignmentMismatch {
                expected: target.to_string(),
                received: value.to_string(),
            },
            position,
        ));
    }

    // values allocated in a region die with it
    let declared_depth = checker.table.symbol(id).region_depth;
    if checker.table.region_depth() > declared_depth && !value.can_escape_private() {
        return Err(Error::new(ErrorImpl::PrivateEscape, position));
    }

    Ok(target)
}

fn check_index_assign(
    checker: &mut TypeChecker,
    assign: &mut IndexAssignExpr,
    position: Position,
) -> Result<Type, Error> {
    check_not_frozen(checker, &assign.array, position.clone())?;

    let array = check_expr(checker, &mut assign.array)?;
    let Type::Array(element) = array else {
        return Err(Error::new(ErrorImpl::IndexNonArray, position));
    };

    let index = check_expr(checker, &mut assign.index)?;
    if !is_integral(&index) {
        return Err(Error::new(ErrorImpl::IndexNotInteger, position));
    }

    let value = check_expr(checker, &mut assign.value)?;
    if !type_equals(&element, &value) {
        return Err(Error::new(ErrorImpl::IndexAssignMismatch, position));
    }

    Ok(*element)
}

/// Name used for a callee in diagnostics.
fn callee_name(callee: &Expr) -> String {
    match &callee.kind {
        ExprKind::Variable(name) => name.clone(),
        ExprKind::Member(member) => member.member.clone(),
        ExprKind::Lambda(_) => String::from("lambda"),
        _ => String::from("expression"),
    }
}

fn is_builtin_len(checker: &TypeChecker, callee: &Expr) -> bool {
    callee.as_variable() == Some("len") && checker.table.lookup("len").is_none()
}

fn check_len(
    checker: &mut TypeChecker,
    call: &mut CallExpr,
    position: Position,
) -> Result<Type, Error> {
    if call.arguments.len() != 1 {
        return Err(Error::new(
            ErrorImpl::ArgumentCount {
                function: String::from("len"),
                expected: 1,
                received: call.arguments.len(),
            },
            position,
        ));
    }

    let argument = check_expr(checker, &mut call.arguments[0])?;
    if !matches!(argument, Type::Array(_) | Type::String) {
        return Err(Error::new(ErrorImpl::LenArgument, position));
    }

    call.callee.resolved_type = Some(Type::function(Type::Int, vec![argument]));
    Ok(Type::Int)
}

fn check_call(
    checker: &mut TypeChecker,
    call: &mut CallExpr,
    position: Position,
) -> Result<Type, Error> {
    if is_builtin_len(checker, &call.callee) {
        return check_len(checker, call, position);
    }

    if let ExprKind::Member(member) = &call.callee.kind {
        if let Some(object) = member.object.as_variable() {
            if MUTATING_METHODS.contains(&member.member.as_str()) && checker.table.is_frozen(object)
            {
                return Err(Error::new(
                    ErrorImpl::FrozenMethodCall {
                        method: member.member.clone(),
                        name: object.to_string(),
                    },
                    position,
                ));
            }
        }
    }

    let callee = check_expr(checker, &mut call.callee)?;
    let name = callee_name(&call.callee);
    let function = match callee {
        Type::Function(function) => function,
        other => {
            return Err(Error::new(
                ErrorImpl::CallNonFunction {
                    name,
                    type_: other.to_string(),
                },
                position,
            ))
        }
    };

    let arity_matches = if function.is_variadic {
        call.arguments.len() >= function.params.len()
    } else {
        call.arguments.len() == function.params.len()
    };
    if !arity_matches {
        return Err(Error::new(
            ErrorImpl::ArgumentCount {
                function: name,
                expected: function.params.len(),
                received: call.arguments.len(),
            },
            position,
        ));
    }

    for (index, argument) in call.arguments.iter_mut().enumerate() {
        let Some(param) = function.params.get(index) else {
            check_expr(checker, argument)?;
            continue;
        };

        if let Type::Function(expected) = param {
            infer_lambda(argument, expected);
        }

        let received = check_expr(checker, argument)?;
        if *param == Type::Any {
            if !received.is_printable() {
                return Err(Error::new(
                    ErrorImpl::UnsupportedBuiltinArgument,
                    argument.span.start.clone(),
                ));
            }
            continue;
        }

        if !type_equals(param, &received) {
            return Err(Error::new(
                ErrorImpl::ArgumentMismatch {
                    function: name,
                    index: index + 1,
                    expected: param.to_string(),
                    received: received.to_string(),
                },
                argument.span.start.clone(),
            ));
        }
    }

    Ok(*function.return_type)
}

fn check_array_literal(
    checker: &mut TypeChecker,
    elements: &mut [Expr],
    position: Position,
) -> Result<Type, Error> {
    let mut element_type: Option<Type> = None;

    for element in elements.iter_mut() {
        let ty = check_expr(checker, element)?;
        // a range spliced into a literal contributes its ints
        let ty = if matches!(element.kind, ExprKind::Range(_)) {
            Type::Int
        } else {
            ty
        };

        match &element_type {
            None => element_type = Some(ty),
            Some(first) if type_equals(first, &ty) => {}
            Some(_) => return Err(Error::new(ErrorImpl::ArrayElementMismatch, position)),
        }
    }

    Ok(Type::array(element_type.unwrap_or(Type::Nil)))
}

fn check_array_access(
    checker: &mut TypeChecker,
    access: &mut ArrayAccessExpr,
    position: Position,
) -> Result<Type, Error> {
    let array = check_expr(checker, &mut access.array)?;
    let Type::Array(element) = array else {
        return Err(Error::new(ErrorImpl::AccessNonArray, position));
    };

    let index = check_expr(checker, &mut access.index)?;
    if !is_numeric_operand(&index) {
        return Err(Error::new(ErrorImpl::IndexNotNumeric, position));
    }

    Ok(*element)
}

fn check_range(
    checker: &mut TypeChecker,
    range: &mut RangeExpr,
    position: Position,
) -> Result<Type, Error> {
    let start = check_expr(checker, &mut range.start)?;
    if !is_numeric_operand(&start) {
        return Err(Error::new(
            ErrorImpl::RangeBound {
                bound: String::from("start"),
            },
            position,
        ));
    }

    let end = check_expr(checker, &mut range.end)?;
    if !is_numeric_operand(&end) {
        return Err(Error::new(
            ErrorImpl::RangeBound {
                bound: String::from("end"),
            },
            position,
        ));
    }

    Ok(Type::array(Type::Int))
}

fn check_increment(
    checker: &mut TypeChecker,
    operand: &mut Expr,
    position: Position,
) -> Result<Type, Error> {
    check_not_frozen(checker, operand, position.clone())?;

    let ty = check_expr(checker, operand)?;
    if !is_numeric_operand(&ty) {
        return Err(Error::new(ErrorImpl::IncrementNonNumeric, position));
    }

    Ok(ty)
}

/// Type of `object.member` for a built-in array or string member.
fn builtin_member_type(object: &Type, member: &str) -> Option<Type> {
    let ty = match (object, member) {
        (Type::Array(_) | Type::String, "length") => Type::Int,

        (Type::Array(element), "push") => Type::function(Type::Void, vec![(**element).clone()]),
        (Type::Array(element), "pop") => Type::function((**element).clone(), vec![]),
        (Type::Array(_), "clear") | (Type::Array(_), "reverse") => {
            Type::function(Type::Void, vec![])
        }
        (Type::Array(_), "concat") => Type::function(object.clone(), vec![object.clone()]),
        (Type::Array(element), "indexOf") => {
            Type::function(Type::Int, vec![(**element).clone()])
        }
        (Type::Array(element), "contains") => {
            Type::function(Type::Bool, vec![(**element).clone()])
        }
        (Type::Array(_), "clone") => Type::function(object.clone(), vec![]),
        (Type::Array(_), "join") => Type::function(Type::String, vec![Type::String]),
        (Type::Array(element), "insert") => {
            Type::function(Type::Void, vec![(**element).clone(), Type::Int])
        }
        (Type::Array(element), "remove") => {
            Type::function((**element).clone(), vec![Type::Int])
        }

        (Type::String, "substring") => {
            Type::function(Type::String, vec![Type::Int, Type::Int])
        }
        (Type::String, "indexOf") => Type::function(Type::Int, vec![Type::String]),
        (Type::String, "split") => {
            Type::function(Type::array(Type::String), vec![Type::String])
        }
        (Type::String, "trim") | (Type::String, "toUpper") | (Type::String, "toLower") => {
            Type::function(Type::String, vec![])
        }
        (Type::String, "startsWith")
        | (Type::String, "endsWith")
        | (Type::String, "contains") => Type::function(Type::Bool, vec![Type::String]),
        (Type::String, "replace") => {
            Type::function(Type::String, vec![Type::String, Type::String])
        }
        (Type::String, "charAt") => Type::function(Type::Char, vec![Type::Int]),
        (Type::String, "append") => Type::function(Type::String, vec![Type::String]),
        _ => return None,
    };

    Some(ty)
}

fn suggest_method(checker: &TypeChecker, object: &Type, member: &str) -> Option<String> {
    let methods: &[&str] = match object {
        Type::Array(_) => &ARRAY_METHODS,
        Type::String => &STRING_METHODS,
        _ => return None,
    };

    closest_match(
        member,
        methods.iter().copied(),
        checker.config.max_suggestion_distance,
    )
}

fn check_member(
    checker: &mut TypeChecker,
    member: &mut MemberExpr,
    position: Position,
) -> Result<Type, Error> {
    // `ns.name` where `ns` is a visible namespace
    let namespace = member
        .object
        .as_variable()
        .and_then(|name| checker.table.lookup(name))
        .filter(|id| checker.table.symbol(*id).is_namespace());

    if let Some(namespace_id) = namespace {
        let namespace = checker.table.symbol(namespace_id).name.clone();
        return match checker.table.lookup_in_namespace(&namespace, &member.member) {
            Some(id) => Ok(checker.table.symbol(id).ty.clone()),
            None => {
                let members = checker.table.symbol(namespace_id).members.clone();
                let names: Vec<String> = members
                    .iter()
                    .map(|id| checker.table.symbol(*id).name.clone())
                    .collect();
                Err(Error::new(
                    ErrorImpl::NoSuchMember {
                        type_: namespace,
                        member: member.member.clone(),
                        suggestion: closest_match(
                            &member.member,
                            names.iter().map(String::as_str),
                            checker.config.max_suggestion_distance,
                        ),
                    },
                    position,
                ))
            }
        };
    }

    let object = check_expr(checker, &mut member.object)?;
    match builtin_member_type(&object, &member.member) {
        Some(ty) => Ok(ty),
        None => Err(Error::new(
            ErrorImpl::NoSuchMember {
                type_: object.to_string(),
                member: member.member.clone(),
                suggestion: suggest_method(checker, &object, &member.member),
            },
            position,
        )),
    }
}

/// Fills in missing lambda parameter and return types from the function
/// type the lambda is assigned or passed to.
pub fn infer_lambda(expr: &mut Expr, target: &FunctionType) {
    if expr.resolved_type.is_some() {
        return;
    }
    let ExprKind::Lambda(lambda) = &mut expr.kind else {
        return;
    };
    if lambda.params.len() != target.params.len() {
        return;
    }

    if lambda.return_type.is_none() {
        lambda.return_type = Some((*target.return_type).clone());
    }
    for (param, expected) in lambda.params.iter_mut().zip(target.params.iter()) {
        if param.param_type.is_none() {
            param.param_type = Some(expected.clone());
        }
    }
}

fn check_lambda(
    checker: &mut TypeChecker,
    lambda: &mut LambdaExpr,
    position: Position,
) -> Result<Type, Error> {
    let Some(return_type) = lambda.return_type.clone() else {
        return Err(Error::new(ErrorImpl::LambdaReturnInference, position));
    };

    let mut params = Vec::with_capacity(lambda.params.len());
    for param in &lambda.params {
        let Some(ty) = &param.param_type else {
            return Err(Error::new(ErrorImpl::LambdaParamInference, position));
        };
        check_param_qualifier(checker, param.qualifier, ty, param.span.start.clone())?;
        params.push(ty.clone());
    }

    check_private_return(lambda.modifier, &return_type, true, position.clone())?;

    let qualifiers: Vec<Qualifier> = lambda.params.iter().map(|p| p.qualifier).collect();
    let param_qualifiers = if qualifiers.iter().any(|q| *q != Qualifier::Default) {
        Some(qualifiers)
    } else {
        None
    };

    let depth = checker.table.scope(checker.table.current_scope()).depth + 1;
    checker.lambda_frames.push(LambdaFrame {
        depth,
        captures: vec![],
    });

    let is_private = lambda.modifier == FunctionModifier::Private;
    let result = checker.within_region(is_private, |checker| {
        checker.within_function_scope(|checker| -> Result<(), Error> {
            for (param, ty) in lambda.params.iter_mut().zip(params.iter()) {
                let id = checker.table.add_symbol_with_qualifier(
                    &param.name,
                    ty.clone(),
                    SymbolKind::Param,
                    param.qualifier,
                );
                param.symbol = Some(id);
            }
            checker.table.align_locals_after_params();

            match &mut lambda.body {
                LambdaBody::Expr(body) => {
                    let body_type = check_expr(checker, body)?;
                    if !type_equals(&body_type, &return_type) {
                        return Err(Error::new(ErrorImpl::LambdaBodyMismatch, position.clone()));
                    }
                }
                LambdaBody::Block(body) => {
                    for stmt in body.iter_mut() {
                        check_stmt(checker, stmt, &return_type);
                    }
                }
            }
            Ok(())
        })
    });

    if let Some(frame) = checker.lambda_frames.pop() {
        CHECKER_LOG!(
            checker.config,
            Level::Debug,
            "lambda captures {} variable(s)",
            frame.captures.len()
        );
        lambda.captures = frame.captures;
    }
    result?;

    Ok(Type::Function(FunctionType {
        return_type: Box::new(return_type),
        params,
        param_qualifiers,
        is_variadic: false,
    }))
}
