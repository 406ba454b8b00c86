//! Unit tests for the type model.
//!
//! Covers structural equality (including its deliberate non-transitivity),
//! type sizes, classification helpers and display.

use super::types::{promoted_type, type_equals, FunctionType, Qualifier, Type};

fn all_simple_types() -> Vec<Type> {
    vec![
        Type::Int,
        Type::Long,
        Type::Double,
        Type::Char,
        Type::String,
        Type::Bool,
        Type::Byte,
        Type::Void,
        Type::Any,
        Type::array(Type::Int),
        Type::array(Type::String),
        Type::function(Type::Int, vec![Type::String]),
    ]
}

#[test]
fn test_nil_equals_everything() {
    for ty in all_simple_types() {
        assert!(type_equals(&Type::Nil, &ty), "nil should equal {}", ty);
        assert!(type_equals(&ty, &Type::Nil), "{} should equal nil", ty);
    }
    assert!(type_equals(&Type::Nil, &Type::Nil));
}

#[test]
fn test_int_byte_compatible_both_ways() {
    assert!(type_equals(&Type::Int, &Type::Byte));
    assert!(type_equals(&Type::Byte, &Type::Int));
    assert!(type_equals(&Type::array(Type::Byte), &Type::array(Type::Int)));
}

#[test]
fn test_equality_is_reflexive() {
    for ty in all_simple_types() {
        assert!(type_equals(&ty, &ty), "{} should equal itself", ty);
    }
}

#[test]
fn test_equality_is_not_transitive() {
    // int ~ nil and nil ~ str, yet int !~ str
    assert!(type_equals(&Type::Int, &Type::Nil));
    assert!(type_equals(&Type::Nil, &Type::String));
    assert!(!type_equals(&Type::Int, &Type::String));

    // byte ~ int and int ~ nil, yet byte !~ double
    assert!(type_equals(&Type::Byte, &Type::Int));
    assert!(type_equals(&Type::Nil, &Type::Double));
    assert!(!type_equals(&Type::Byte, &Type::Double));
}

#[test]
fn test_distinct_kinds_are_unequal() {
    assert!(!type_equals(&Type::Int, &Type::Long));
    assert!(!type_equals(&Type::Int, &Type::Double));
    assert!(!type_equals(&Type::String, &Type::Char));
    assert!(!type_equals(&Type::array(Type::Int), &Type::array(Type::Double)));
    assert!(!type_equals(&Type::array(Type::Int), &Type::Int));
}

#[test]
fn test_empty_array_literal_matches_declared_array() {
    let empty = Type::array(Type::Nil);
    assert!(type_equals(&Type::array(Type::Int), &empty));
    assert!(type_equals(&empty, &Type::array(Type::String)));
}

#[test]
fn test_function_equality() {
    let a = Type::function(Type::Int, vec![Type::Int, Type::String]);
    let b = Type::function(Type::Int, vec![Type::Int, Type::String]);
    let fewer_params = Type::function(Type::Int, vec![Type::Int]);
    let other_return = Type::function(Type::Bool, vec![Type::Int, Type::String]);
    let other_param = Type::function(Type::Int, vec![Type::Int, Type::Double]);

    assert!(type_equals(&a, &b));
    assert!(!type_equals(&a, &fewer_params));
    assert!(!type_equals(&a, &other_return));
    assert!(!type_equals(&a, &other_param));
}

#[test]
fn test_function_qualifiers_do_not_affect_equality() {
    let plain = Type::function(Type::Void, vec![Type::Int]);
    let qualified = Type::Function(FunctionType {
        return_type: Box::new(Type::Void),
        params: vec![Type::Int],
        param_qualifiers: Some(vec![Qualifier::AsRef]),
        is_variadic: false,
    });

    assert!(type_equals(&plain, &qualified));
    assert_ne!(plain, qualified);
}

#[test]
fn test_type_sizes() {
    assert_eq!(Type::Int.size_of(), 8);
    assert_eq!(Type::Long.size_of(), 8);
    assert_eq!(Type::Double.size_of(), 8);
    assert_eq!(Type::String.size_of(), 8);
    assert_eq!(Type::Char.size_of(), 1);
    assert_eq!(Type::Bool.size_of(), 1);
    assert_eq!(Type::Byte.size_of(), 1);
    assert_eq!(Type::array(Type::Char).size_of(), 8);
    assert_eq!(Type::function(Type::Void, vec![]).size_of(), 8);
}

#[test]
fn test_primitive_and_reference_classification() {
    for ty in [Type::Int, Type::Long, Type::Double, Type::Char, Type::Bool, Type::Byte, Type::Void] {
        assert!(ty.is_primitive(), "{} should be primitive", ty);
        assert!(!ty.is_reference(), "{} should not be a reference", ty);
        assert!(ty.can_escape_private());
    }

    for ty in [
        Type::String,
        Type::array(Type::Int),
        Type::function(Type::Void, vec![]),
    ] {
        assert!(!ty.is_primitive(), "{} should not be primitive", ty);
        assert!(ty.is_reference(), "{} should be a reference", ty);
        assert!(!ty.can_escape_private());
    }

    assert!(!Type::Nil.is_primitive());
    assert!(!Type::Nil.is_reference());
}

#[test]
fn test_numeric_promotion() {
    assert_eq!(promoted_type(&Type::Int, &Type::Int), Some(Type::Int));
    assert_eq!(promoted_type(&Type::Int, &Type::Long), Some(Type::Long));
    assert_eq!(promoted_type(&Type::Long, &Type::Double), Some(Type::Double));
    assert_eq!(promoted_type(&Type::Double, &Type::Int), Some(Type::Double));
    assert_eq!(promoted_type(&Type::Int, &Type::String), None);
    assert_eq!(promoted_type(&Type::Bool, &Type::Int), None);
}

#[test]
fn test_type_display() {
    assert_eq!(Type::String.to_string(), "str");
    assert_eq!(Type::array(Type::array(Type::Int)).to_string(), "int[][]");
    assert_eq!(
        Type::function(Type::Bool, vec![Type::Int, Type::String]).to_string(),
        "fn(int, str): bool"
    );

    let qualified = Type::Function(FunctionType {
        return_type: Box::new(Type::Void),
        params: vec![Type::Int],
        param_qualifiers: Some(vec![Qualifier::AsRef]),
        is_variadic: false,
    });
    assert_eq!(qualified.to_string(), "fn(int as ref): void");
}
