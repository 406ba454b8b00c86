//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.sn".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.sn");
}

#[test]
fn test_initializer_mismatch_message() {
    let error = Error::new(ErrorImpl::InitializerMismatch, at(0));

    assert_eq!(error.get_error_name(), "InitializerMismatch");
    assert_eq!(
        error.get_message(),
        "Initializer type does not match variable type"
    );
}

#[test]
fn test_condition_message() {
    let error = Error::new(
        ErrorImpl::NonBooleanCondition {
            construct: "While".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_message(), "While condition must be boolean");
}

#[test]
fn test_thread_messages() {
    let pending = Error::new(
        ErrorImpl::PendingHandleUse {
            name: "h".to_string(),
        },
        at(0),
    );
    assert_eq!(
        pending.get_message(),
        "Cannot use pending thread handle 'h' before synchronization"
    );

    let frozen = Error::new(
        ErrorImpl::FrozenMethodCall {
            method: "push".to_string(),
            name: "data".to_string(),
        },
        at(0),
    );
    assert_eq!(
        frozen.get_message(),
        "Cannot call mutating method 'push' on frozen variable 'data'"
    );
    assert_eq!(frozen.get_error_name(), "FrozenMethodCall");
}

#[test]
fn test_argument_messages() {
    let count = Error::new(
        ErrorImpl::ArgumentCount {
            function: "add".to_string(),
            expected: 2,
            received: 3,
        },
        at(0),
    );
    assert_eq!(count.get_message(), "Function 'add' expects 2 argument(s), got 3");

    let mismatch = Error::new(
        ErrorImpl::ArgumentMismatch {
            function: "add".to_string(),
            index: 1,
            expected: "int".to_string(),
            received: "str".to_string(),
        },
        at(0),
    );
    assert_eq!(
        mismatch.get_message(),
        "Argument 1 of 'add': expected 'int', got 'str'"
    );
}

#[test]
fn test_undefined_variable_suggestion() {
    let error = Error::new(
        ErrorImpl::UndefinedVariable {
            name: "coutn".to_string(),
            suggestion: Some("count".to_string()),
        },
        at(0),
    );

    assert_eq!(error.get_message(), "Undefined variable 'coutn'");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Did you mean 'count'?"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_undefined_variable_without_suggestion() {
    let error = Error::new(
        ErrorImpl::UndefinedVariable {
            name: "zzz".to_string(),
            suggestion: None,
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_matches_message() {
    let error = Error::new(ErrorImpl::PrivateEscape, at(0));
    assert_eq!(error.to_string(), error.get_message());
    assert!(matches!(error.get_tip(), ErrorTip::Suggestion(_)));
}
