//! Thread spawn and sync rules.
//!
//! A variable bound to `&f(args)` is a pending handle until it is synced
//! with `x!` or `[x, y]!`. While it is pending, the array, string and
//! `as ref` arguments of its spawn are frozen and may not be modified.

use log::Level;

use crate::{
    ast::{
        expressions::{Expr, ExprKind, ThreadSpawnExpr, ThreadSyncExpr},
        types::{FunctionModifier, Qualifier, Type},
    },
    errors::errors::{Error, ErrorImpl},
    symbol_table::{SymbolId, ThreadState},
    Position, CHECKER_LOG,
};

use super::{expr::check_expr, type_checker::TypeChecker};

/// Array methods that modify their receiver.
pub const MUTATING_METHODS: [&str; 6] = ["push", "pop", "clear", "reverse", "insert", "remove"];

/// Modifier the spawned function was declared with.
fn declared_modifier_of(checker: &TypeChecker, callee: &Expr) -> FunctionModifier {
    match &callee.kind {
        ExprKind::Variable(name) => checker
            .table
            .lookup(name)
            .map(|id| checker.table.symbol(id).declared_modifier)
            .unwrap_or_default(),
        ExprKind::Member(member) => member
            .object
            .as_variable()
            .and_then(|namespace| checker.table.lookup_in_namespace(namespace, &member.member))
            .map(|id| checker.table.symbol(id).declared_modifier)
            .unwrap_or_default(),
        ExprKind::Lambda(lambda) => lambda.modifier,
        _ => FunctionModifier::Default,
    }
}

pub fn check_spawn(
    checker: &mut TypeChecker,
    spawn: &mut ThreadSpawnExpr,
    position: Position,
) -> Result<Type, Error> {
    let callee = match &mut spawn.call.kind {
        ExprKind::Call(call) => check_expr(checker, &mut call.callee)?,
        _ => return Err(Error::new(ErrorImpl::SpawnRequiresCall, position)),
    };
    let Type::Function(function) = callee else {
        return Err(Error::new(ErrorImpl::SpawnNonFunction, position));
    };

    let mode = match &spawn.call.kind {
        ExprKind::Call(call) => declared_modifier_of(checker, &call.callee),
        _ => FunctionModifier::Default,
    };

    check_expr(checker, &mut spawn.call)?;
    spawn.mode = Some(mode);

    CHECKER_LOG!(
        checker.config,
        Level::Debug,
        "spawn of {} function returning {}",
        mode,
        function.return_type
    );
    Ok(*function.return_type)
}

/// Marks `handle` pending and freezes the arguments its spawn captures.
///
/// A handle that is still pending cannot take a new spawn and nothing is
/// frozen for it. A synchronized handle is rebound.
pub fn record_spawn(
    checker: &mut TypeChecker,
    handle: SymbolId,
    initializer: &Expr,
    position: Position,
) -> Result<(), Error> {
    let ExprKind::ThreadSpawn(spawn) = &initializer.kind else {
        return Ok(());
    };
    let ExprKind::Call(call) = &spawn.call.kind else {
        return Ok(());
    };

    let symbol = checker.table.symbol_mut(handle);
    if let Err(error) = symbol.rebind().and_then(|()| symbol.mark_pending()) {
        log::trace!("'{}': {}", symbol.name, error);
        return Err(Error::new(
            ErrorImpl::PendingHandleReassign {
                name: symbol.name.clone(),
            },
            position,
        ));
    }

    let builtin = call
        .callee
        .as_variable()
        .and_then(|name| checker.table.lookup(name))
        .is_some_and(|id| checker.is_builtin(id));

    let function = call.callee.resolved_type.as_ref().and_then(Type::as_function);
    let mut frozen: Vec<SymbolId> = vec![];

    if !builtin {
        for (index, argument) in call.arguments.iter().enumerate() {
            let Some(id) = argument
                .as_variable()
                .and_then(|name| checker.table.lookup(name))
            else {
                continue;
            };

            let by_reference =
                function.is_some_and(|f| f.qualifier_of(index) == Qualifier::AsRef);
            let is_heap = matches!(checker.table.symbol(id).ty, Type::Array(_) | Type::String);
            if (by_reference || is_heap) && !frozen.contains(&id) {
                frozen.push(id);
            }
        }
    }

    for id in &frozen {
        checker.table.symbol_mut(*id).freeze();
    }

    CHECKER_LOG!(
        checker.config,
        Level::Debug,
        "'{}' is pending, {} argument(s) frozen",
        checker.table.symbol(handle).name,
        frozen.len()
    );

    checker.table.symbol_mut(handle).set_frozen_args(frozen);
    Ok(())
}

fn sync_error(state: ThreadState, name: &str, position: Position) -> Option<Error> {
    match state {
        ThreadState::Pending => None,
        ThreadState::Normal => Some(Error::new(
            ErrorImpl::NotPendingHandle {
                name: name.to_string(),
            },
            position,
        )),
        ThreadState::Synchronized => Some(Error::new(
            ErrorImpl::AlreadySynchronized {
                name: name.to_string(),
            },
            position,
        )),
    }
}

fn undefined(checker: &TypeChecker, name: &str, position: Position) -> Error {
    Error::new(
        ErrorImpl::UndefinedVariable {
            name: name.to_string(),
            suggestion: checker.suggest_name(name),
        },
        position,
    )
}

pub fn check_sync(
    checker: &mut TypeChecker,
    sync: &mut ThreadSyncExpr,
    position: Position,
) -> Result<Type, Error> {
    if sync.is_array {
        return check_array_sync(checker, sync, position);
    }

    let Some(name) = sync.handle.as_variable().map(str::to_string) else {
        return Err(Error::new(ErrorImpl::SyncRequiresHandle, position));
    };
    let Some(id) = checker.resolve(&name) else {
        return Err(undefined(checker, &name, position));
    };

    if let Some(error) = sync_error(checker.table.symbol(id).thread_state, &name, position.clone())
    {
        return Err(error);
    }

    checker
        .table
        .sync_variable(&name)
        .map_err(|_| Error::new(ErrorImpl::NotPendingHandle { name }, position))?;

    let ty = checker.table.symbol(id).ty.clone();
    sync.handle.resolved_type = Some(ty.clone());
    Ok(ty)
}

/// `[a, b]!` syncs every pending handle. Handles that are already
/// synchronized are skipped.
fn check_array_sync(
    checker: &mut TypeChecker,
    sync: &mut ThreadSyncExpr,
    position: Position,
) -> Result<Type, Error> {
    let ExprKind::Array(handles) = &mut sync.handle.kind else {
        return Err(Error::new(ErrorImpl::ArraySyncRequiresHandles, position));
    };

    let mut resolved = Vec::with_capacity(handles.len());
    for handle in handles.iter() {
        let Some(name) = handle.as_variable() else {
            return Err(Error::new(ErrorImpl::ArraySyncRequiresHandles, position));
        };
        let Some(id) = checker.resolve(name) else {
            return Err(undefined(checker, name, handle.span.start.clone()));
        };

        if checker.table.symbol(id).thread_state == ThreadState::Normal {
            return Err(Error::new(
                ErrorImpl::NotPendingHandle {
                    name: name.to_string(),
                },
                handle.span.start.clone(),
            ));
        }
        resolved.push((name.to_string(), id));
    }

    for (handle, (name, id)) in handles.iter_mut().zip(resolved) {
        if checker.table.symbol(id).is_pending() {
            if let Err(error) = checker.table.sync_variable(&name) {
                log::trace!("'{}': {}", name, error);
            }
        }
        handle.resolved_type = Some(checker.table.symbol(id).ty.clone());
    }

    Ok(Type::Void)
}

/// Assignment to `name` needs it to be neither frozen nor pending.
pub fn check_mutation(
    checker: &TypeChecker,
    name: &str,
    position: Position,
) -> Result<(), Error> {
    if checker.table.is_frozen(name) {
        return Err(Error::new(
            ErrorImpl::FrozenMutation {
                name: name.to_string(),
            },
            position,
        ));
    }
    if checker.table.is_pending(name) {
        return Err(Error::new(
            ErrorImpl::PendingHandleReassign {
                name: name.to_string(),
            },
            position,
        ));
    }
    Ok(())
}

/// Variable an index or increment target ultimately writes to.
fn root_variable(expr: &Expr) -> Option<&str> {
    match &expr.kind {
        ExprKind::Variable(name) => Some(name),
        ExprKind::ArrayAccess(access) => root_variable(&access.array),
        _ => None,
    }
}

pub fn check_not_frozen(
    checker: &TypeChecker,
    target: &Expr,
    position: Position,
) -> Result<(), Error> {
    match root_variable(target) {
        Some(name) if checker.table.is_frozen(name) => Err(Error::new(
            ErrorImpl::FrozenMutation {
                name: name.to_string(),
            },
            position,
        )),
        _ => Ok(()),
    }
}
