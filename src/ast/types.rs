//! Type model for the language.
//!
//! This module defines the resolved type representation shared by the
//! parser (for annotations) and the type checker (for inferred types):
//!
//! - Primitive value types (`int`, `long`, `double`, `char`, `bool`, `byte`, `void`)
//! - Reference types (`str`, arrays, functions)
//! - The `nil` placeholder used for empty literals and unresolved types
//! - Memory qualifiers and function/block modifiers
//!
//! Compatibility between types is decided by [`type_equals`], not by `==`.
//! `==` is strict structural identity and is only meant for tests and
//! bookkeeping.

use std::fmt::Display;

/// Stack slot size of every reference type and of all fixed-size
/// primitives wider than a byte.
pub const POINTER_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Long,
    Double,
    Char,
    String,
    Bool,
    Byte,
    Void,
    /// Equal to every other type. Produced by empty array literals and
    /// used as a placeholder wherever a type could not be resolved.
    Nil,
    /// Parameter type of printing built-ins, accepts any printable value.
    Any,
    Array(Box<Type>),
    Function(FunctionType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub return_type: Box<Type>,
    pub params: Vec<Type>,
    /// Only present when at least one parameter carries a non-default qualifier.
    pub param_qualifiers: Option<Vec<Qualifier>>,
    pub is_variadic: bool,
}

impl FunctionType {
    pub fn qualifier_of(&self, index: usize) -> Qualifier {
        self.param_qualifiers
            .as_ref()
            .and_then(|qualifiers| qualifiers.get(index).copied())
            .unwrap_or_default()
    }
}

/// Memory qualifier on a declaration or parameter (`as val` / `as ref`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qualifier {
    #[default]
    Default,
    AsVal,
    AsRef,
}

/// Modifier on a function or lambda (`shared` / `private`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionModifier {
    #[default]
    Default,
    Shared,
    Private,
}

/// Modifier on a block or loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockModifier {
    #[default]
    Default,
    Shared,
    Private,
}

impl Type {
    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn function(return_type: Type, params: Vec<Type>) -> Type {
        Type::Function(FunctionType {
            return_type: Box::new(return_type),
            params,
            param_qualifiers: None,
            is_variadic: false,
        })
    }

    /// Size in bytes before stack alignment.
    pub fn size_of(&self) -> usize {
        match self {
            Type::Int | Type::Long | Type::Double | Type::String => 8,
            Type::Char | Type::Bool | Type::Byte => 1,
            _ => POINTER_SIZE,
        }
    }

    /// Fixed-size, copyable value types. `void` counts so that a private
    /// function may return nothing.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Int
                | Type::Long
                | Type::Double
                | Type::Char
                | Type::Bool
                | Type::Byte
                | Type::Void
        )
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Type::String | Type::Array(_) | Type::Function(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Long | Type::Double)
    }

    pub fn is_printable(&self) -> bool {
        matches!(
            self,
            Type::Int
                | Type::Long
                | Type::Double
                | Type::Char
                | Type::String
                | Type::Bool
                | Type::Byte
                | Type::Array(_)
        )
    }

    /// Whether a value of this type may leave a private region.
    pub fn can_escape_private(&self) -> bool {
        self.is_primitive()
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Type::Nil)
    }
}

/// Assignment compatibility between two types.
///
/// `nil` matches anything and `int`/`byte` match each other in both
/// directions, so the relation is reflexive and symmetric but not
/// transitive: `int ~ nil` and `nil ~ str` hold while `int ~ str` does not.
pub fn type_equals(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Nil, _) | (_, Type::Nil) => true,
        (Type::Int, Type::Byte) | (Type::Byte, Type::Int) => true,
        (Type::Array(left), Type::Array(right)) => type_equals(left, right),
        (Type::Function(left), Type::Function(right)) => {
            type_equals(&left.return_type, &right.return_type)
                && left.params.len() == right.params.len()
                && left
                    .params
                    .iter()
                    .zip(right.params.iter())
                    .all(|(l, r)| type_equals(l, r))
        }
        (Type::Int, Type::Int)
        | (Type::Long, Type::Long)
        | (Type::Double, Type::Double)
        | (Type::Char, Type::Char)
        | (Type::String, Type::String)
        | (Type::Bool, Type::Bool)
        | (Type::Byte, Type::Byte)
        | (Type::Void, Type::Void)
        | (Type::Any, Type::Any) => true,
        _ => false,
    }
}

/// Result type of an arithmetic operation, widening `int < long < double`.
pub fn promoted_type(left: &Type, right: &Type) -> Option<Type> {
    if type_equals(left, right) {
        return Some(left.clone());
    }

    if left.is_numeric() && right.is_numeric() {
        if matches!(left, Type::Double) || matches!(right, Type::Double) {
            return Some(Type::Double);
        }
        if matches!(left, Type::Long) || matches!(right, Type::Long) {
            return Some(Type::Long);
        }
        return Some(left.clone());
    }

    None
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Long => write!(f, "long"),
            Type::Double => write!(f, "double"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "str"),
            Type::Bool => write!(f, "bool"),
            Type::Byte => write!(f, "byte"),
            Type::Void => write!(f, "void"),
            Type::Nil => write!(f, "nil"),
            Type::Any => write!(f, "any"),
            Type::Array(element) => write!(f, "{}[]", element),
            Type::Function(function) => {
                write!(f, "fn(")?;
                for (i, param) in function.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                    match function.qualifier_of(i) {
                        Qualifier::AsRef => write!(f, " as ref")?,
                        Qualifier::AsVal => write!(f, " as val")?,
                        Qualifier::Default => {}
                    }
                }
                write!(f, "): {}", function.return_type)
            }
        }
    }
}

impl Display for FunctionModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionModifier::Default => write!(f, "default"),
            FunctionModifier::Shared => write!(f, "shared"),
            FunctionModifier::Private => write!(f, "private"),
        }
    }
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Qualifier::Default => write!(f, "default"),
            Qualifier::AsVal => write!(f, "as val"),
            Qualifier::AsRef => write!(f, "as ref"),
        }
    }
}
