use log::Level;

use crate::{
    ast::{
        expressions::{Expr, ExprKind},
        statements::{
            BlockStmt, FnDeclStmt, ForEachStmt, ForStmt, IfStmt, ImportStmt, ReturnStmt, Stmt,
            VarDeclStmt, WhileStmt,
        },
        types::{type_equals, BlockModifier, FunctionModifier, FunctionType, Qualifier, Type},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::RESERVED_LOOKUP,
    symbol_table::SymbolKind,
    CHECKER_LOG,
};

use super::{
    expr::{check_expr, infer_lambda},
    threads::record_spawn,
    type_checker::TypeChecker,
    validator::{check_param_qualifier, check_private_return, check_var_qualifier, effective_modifier},
};

/// Type checks a statement, reporting its errors to the checker.
///
/// `return_type` is the return type of the enclosing function, `void` at
/// the top level.
pub fn check_stmt(checker: &mut TypeChecker, stmt: &mut Stmt, return_type: &Type) {
    match stmt {
        Stmt::Expression(expression) => {
            let result = check_expr(checker, &mut expression.expression);
            checker.report(result);
        }
        Stmt::VarDecl(decl) => check_var_decl(checker, decl),
        Stmt::Function(function) => check_function(checker, function),
        Stmt::Return(ret) => check_return(checker, ret, return_type),
        Stmt::Block(block) => check_block(checker, block, return_type),
        Stmt::If(if_stmt) => check_if(checker, if_stmt, return_type),
        Stmt::While(while_stmt) => check_while(checker, while_stmt, return_type),
        Stmt::For(for_stmt) => check_for(checker, for_stmt, return_type),
        Stmt::ForEach(foreach) => check_foreach(checker, foreach, return_type),
        Stmt::Break(_) | Stmt::Continue(_) => {}
        Stmt::Import(import) => check_import(checker, import),
    }
}

fn declaration_kind(checker: &TypeChecker) -> SymbolKind {
    if checker.table.is_global_scope() {
        SymbolKind::Global
    } else {
        SymbolKind::Local
    }
}

fn check_var_decl(checker: &mut TypeChecker, decl: &mut VarDeclStmt) {
    let position = decl.span.start.clone();

    if let (Some(Type::Function(target)), Some(initializer)) =
        (&decl.declared_type, decl.initializer.as_mut())
    {
        infer_lambda(initializer, target);
    }

    if let Some(initializer) = decl.initializer.as_mut() {
        if let Err(error) = check_expr(checker, initializer) {
            checker.type_error(error);
            let ty = decl.declared_type.clone().unwrap_or(Type::Nil);
            let kind = declaration_kind(checker);
            let id = checker
                .table
                .add_symbol_with_qualifier(&decl.name, ty, kind, decl.qualifier);
            decl.symbol = Some(id);
            return;
        }
    }

    let is_spawn = decl.initializer.as_ref().is_some_and(Expr::is_thread_spawn);
    if is_spawn
        && decl
            .initializer
            .as_ref()
            .and_then(|init| init.resolved_type.as_ref())
            == Some(&Type::Void)
    {
        checker.type_error(Error::new(ErrorImpl::VoidSpawnAssignment, position));
        return;
    }

    if let (Some(Type::Array(declared)), Some(initializer)) =
        (&decl.declared_type, decl.initializer.as_mut())
    {
        rewrite_array_literal(initializer, declared);
    }

    let initializer_type = decl
        .initializer
        .as_ref()
        .and_then(|init| init.resolved_type.clone());

    let ty = match (decl.declared_type.clone(), initializer_type.clone()) {
        (Some(ty), _) => ty,
        (None, Some(ty)) => {
            decl.declared_type = Some(ty.clone());
            ty
        }
        (None, None) => {
            checker.type_error(Error::new(ErrorImpl::CannotInferType, position.clone()));
            Type::Nil
        }
    };

    let qualifier_check = check_var_qualifier(checker, decl.qualifier, &ty, position.clone());
    checker.report(qualifier_check);

    let kind = declaration_kind(checker);
    let id = checker
        .table
        .add_symbol_with_qualifier(&decl.name, ty.clone(), kind, decl.qualifier);
    decl.symbol = Some(id);

    CHECKER_LOG!(
        checker.config,
        Level::Debug,
        "declared {} '{}' of type {}",
        kind,
        decl.name,
        ty
    );

    if let Some(initializer_type) = initializer_type {
        if !type_equals(&ty, &initializer_type) {
            let error = if is_spawn {
                ErrorImpl::SpawnResultMismatch
            } else {
                ErrorImpl::InitializerMismatch
            };
            checker.type_error(Error::new(error, position.clone()));
        }
    }

    if let Some(initializer) = decl.initializer.as_ref().filter(|init| init.is_thread_spawn()) {
        let spawn = record_spawn(checker, id, initializer, position);
        checker.report(spawn);
    }
}

/// Gives array literals the declared element type where it is more precise:
/// `{}` becomes the declared array type and an `int[]` literal stored as
/// `byte[]` becomes `byte[]`.
fn rewrite_array_literal(initializer: &mut Expr, declared: &Type) {
    let Some(Type::Array(element)) = &initializer.resolved_type else {
        return;
    };

    let rewrite = match (element.as_ref(), declared) {
        (Type::Nil, _) => true,
        (Type::Int, Type::Byte) => matches!(initializer.kind, ExprKind::Array(_)),
        _ => false,
    };
    if rewrite {
        initializer.resolved_type = Some(Type::array(declared.clone()));
    }
}

/// Function type of a declaration, `nil` standing in for missing
/// parameter types.
fn signature(function: &FnDeclStmt) -> FunctionType {
    let params = function
        .params
        .iter()
        .map(|param| param.param_type.clone().unwrap_or(Type::Nil))
        .collect();

    let param_qualifiers = if function
        .params
        .iter()
        .any(|param| param.qualifier != Qualifier::Default)
    {
        Some(function.params.iter().map(|param| param.qualifier).collect())
    } else {
        None
    };

    FunctionType {
        return_type: Box::new(function.return_type.clone()),
        params,
        param_qualifiers,
        is_variadic: false,
    }
}

fn check_function(checker: &mut TypeChecker, function: &mut FnDeclStmt) {
    let position = function.span.start.clone();

    for param in function.params.iter().filter(|p| p.param_type.is_none()) {
        checker.type_error(Error::new(
            ErrorImpl::MissingParameterType,
            param.span.start.clone(),
        ));
    }
    let signature = signature(function);

    let private_check = check_private_return(
        function.modifier,
        &function.return_type,
        false,
        position.clone(),
    );
    checker.report(private_check);

    let effective = effective_modifier(function.modifier, &function.return_type);
    function.effective_modifier = Some(effective);

    let existing = if checker.import_depth > 0 {
        checker.table.lookup_current(&function.name)
    } else {
        checker.table.lookup(&function.name)
    };
    if existing.is_some_and(|id| checker.table.symbol(id).is_function) {
        checker.type_error(Error::new(
            ErrorImpl::FunctionAlreadyDefined {
                function: function.name.clone(),
            },
            position,
        ));
        return;
    }

    let params = signature.params.clone();
    let id = checker.table.add_function(
        &function.name,
        Type::Function(signature),
        effective,
        function.modifier,
    );
    function.symbol = Some(id);

    CHECKER_LOG!(
        checker.config,
        Level::Debug,
        "declared function '{}' ({} as {})",
        function.name,
        function.modifier,
        effective
    );

    let is_private = function.modifier == FunctionModifier::Private;
    let return_type = function.return_type.clone();
    checker.within_region(is_private, |checker| {
        checker.within_function_scope(|checker| {
            for (param, ty) in function.params.iter_mut().zip(params) {
                let qualifier_check =
                    check_param_qualifier(checker, param.qualifier, &ty, param.span.start.clone());
                checker.report(qualifier_check);

                let id = checker.table.add_symbol_with_qualifier(
                    &param.name,
                    ty,
                    SymbolKind::Param,
                    param.qualifier,
                );
                param.symbol = Some(id);
            }
            checker.table.align_locals_after_params();

            for stmt in function.body.iter_mut() {
                check_stmt(checker, stmt, &return_type);
            }
        })
    });
}

fn check_return(checker: &mut TypeChecker, ret: &mut ReturnStmt, return_type: &Type) {
    let received = match ret.value.as_mut() {
        Some(value) => match check_expr(checker, value) {
            Ok(ty) => ty,
            Err(error) => {
                checker.type_error(error);
                return;
            }
        },
        None => Type::Void,
    };

    if !type_equals(&received, return_type) {
        checker.type_error(Error::new(
            ErrorImpl::ReturnTypeMismatch {
                expected: return_type.to_string(),
                received: received.to_string(),
            },
            ret.span.start.clone(),
        ));
    }
}

fn check_block(checker: &mut TypeChecker, block: &mut BlockStmt, return_type: &Type) {
    let is_private = block.modifier == BlockModifier::Private;
    checker.within_region(is_private, |checker| {
        checker.within_scope(|checker| {
            for stmt in block.body.iter_mut() {
                check_stmt(checker, stmt, return_type);
            }
        })
    });
}

fn check_condition(checker: &mut TypeChecker, condition: &mut Expr, construct: &str) {
    match check_expr(checker, condition) {
        Ok(ty) if !type_equals(&ty, &Type::Bool) => checker.type_error(Error::new(
            ErrorImpl::NonBooleanCondition {
                construct: construct.to_string(),
            },
            condition.span.start.clone(),
        )),
        Ok(_) => {}
        Err(error) => checker.type_error(error),
    }
}

fn check_if(checker: &mut TypeChecker, if_stmt: &mut IfStmt, return_type: &Type) {
    check_condition(checker, &mut if_stmt.condition, "If");
    check_stmt(checker, &mut if_stmt.then_branch, return_type);
    if let Some(else_branch) = if_stmt.else_branch.as_mut() {
        check_stmt(checker, else_branch, return_type);
    }
}

fn check_while(checker: &mut TypeChecker, while_stmt: &mut WhileStmt, return_type: &Type) {
    check_condition(checker, &mut while_stmt.condition, "While");
    checker.within_region(!while_stmt.is_shared, |checker| {
        check_stmt(checker, &mut while_stmt.body, return_type)
    });
}

fn check_for(checker: &mut TypeChecker, for_stmt: &mut ForStmt, return_type: &Type) {
    checker.within_scope(|checker| {
        if let Some(initializer) = for_stmt.initializer.as_mut() {
            check_stmt(checker, initializer, return_type);
        }
        if let Some(condition) = for_stmt.condition.as_mut() {
            check_condition(checker, condition, "For");
        }
        if let Some(increment) = for_stmt.increment.as_mut() {
            let result = check_expr(checker, increment);
            checker.report(result);
        }

        checker.within_region(!for_stmt.is_shared, |checker| {
            check_stmt(checker, &mut for_stmt.body, return_type)
        });
    });
}

fn check_foreach(checker: &mut TypeChecker, foreach: &mut ForEachStmt, return_type: &Type) {
    let iterable = match check_expr(checker, &mut foreach.iterable) {
        Ok(ty) => ty,
        Err(error) => {
            checker.type_error(error);
            return;
        }
    };
    let Type::Array(element) = iterable else {
        checker.type_error(Error::new(
            ErrorImpl::ForEachNonArray,
            foreach.iterable.span.start.clone(),
        ));
        return;
    };

    checker.within_scope(|checker| {
        let id = checker
            .table
            .add_symbol(&foreach.var_name, *element, SymbolKind::Param);
        foreach.symbol = Some(id);

        checker.within_region(!foreach.is_shared, |checker| {
            check_stmt(checker, &mut foreach.body, return_type)
        });
    });
}

fn check_import(checker: &mut TypeChecker, import: &mut ImportStmt) {
    let Some(namespace) = import.namespace.clone() else {
        CHECKER_LOG!(
            checker.config,
            Level::Trace,
            "import '{}' was merged by the parser",
            import.module
        );
        return;
    };
    let position = import.span.start.clone();

    let error = if RESERVED_LOOKUP.contains_key(namespace.as_str()) {
        Some(ErrorImpl::ReservedNamespace {
            name: namespace.clone(),
        })
    } else if checker.table.is_namespace(&namespace) {
        Some(ErrorImpl::NamespaceAlreadyDefined {
            name: namespace.clone(),
        })
    } else if checker.table.lookup(&namespace).is_some() {
        Some(ErrorImpl::NamespaceNameInUse {
            name: namespace.clone(),
        })
    } else {
        None
    };
    if let Some(error) = error {
        checker.type_error(Error::new(error, position));
        return;
    }

    if checker.table.add_namespace(&namespace).is_none() {
        return;
    }

    for stmt in &import.statements {
        let Stmt::Function(function) = stmt else {
            continue;
        };
        checker.table.add_function_to_namespace(
            &namespace,
            &function.name,
            Type::Function(signature(function)),
            effective_modifier(function.modifier, &function.return_type),
            function.modifier,
        );
    }

    CHECKER_LOG!(
        checker.config,
        Level::Debug,
        "checking module '{}' as namespace '{}'",
        import.module,
        namespace
    );

    checker.import_depth += 1;
    checker.within_scope(|checker| {
        for stmt in import.statements.iter_mut() {
            check_stmt(checker, stmt, &Type::Void);
        }
    });
    checker.import_depth -= 1;
}
