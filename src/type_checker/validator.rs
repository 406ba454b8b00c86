//! Memory qualifier and function modifier rules.

use log::Level;

use crate::{
    ast::types::{FunctionModifier, Qualifier, Type},
    errors::errors::{Error, ErrorImpl},
    Position, CHECKER_LOG,
};

use super::type_checker::TypeChecker;

/// `as ref` on a declared variable needs a primitive type. `as val` on a
/// primitive is harmless and only noted.
pub fn check_var_qualifier(
    checker: &TypeChecker,
    qualifier: Qualifier,
    ty: &Type,
    position: Position,
) -> Result<(), Error> {
    match qualifier {
        Qualifier::AsRef if !ty.is_primitive() => {
            Err(Error::new(ErrorImpl::AsRefOnNonPrimitive, position))
        }
        Qualifier::AsVal if ty.is_primitive() => {
            CHECKER_LOG!(
                checker.config,
                Level::Debug,
                "'as val' on primitive type {} has no effect",
                ty
            );
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn check_param_qualifier(
    checker: &TypeChecker,
    qualifier: Qualifier,
    ty: &Type,
    position: Position,
) -> Result<(), Error> {
    match qualifier {
        Qualifier::AsRef if !ty.is_primitive() => {
            Err(Error::new(ErrorImpl::AsRefOnNonPrimitiveParam, position))
        }
        Qualifier::AsVal if ty.is_primitive() => {
            CHECKER_LOG!(
                checker.config,
                Level::Debug,
                "'as val' on primitive parameter of type {} has no effect",
                ty
            );
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn check_private_return(
    modifier: FunctionModifier,
    return_type: &Type,
    is_lambda: bool,
    position: Position,
) -> Result<(), Error> {
    if modifier != FunctionModifier::Private || return_type.can_escape_private() {
        return Ok(());
    }

    let error = if is_lambda {
        ErrorImpl::PrivateLambdaReturn
    } else {
        ErrorImpl::PrivateFunctionReturn
    };
    Err(Error::new(error, position))
}

/// Modifier the code generator uses. Functions returning a string, array
/// or function become `shared` unless declared `private`.
pub fn effective_modifier(declared: FunctionModifier, return_type: &Type) -> FunctionModifier {
    if declared != FunctionModifier::Private && return_type.is_reference() {
        FunctionModifier::Shared
    } else {
        declared
    }
}
