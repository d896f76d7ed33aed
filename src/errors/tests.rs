//! Unit tests for error handling.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use rstest::rstest;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.clam".to_string()))
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
    assert_eq!(error.get_position().0, 10);
}

#[rstest]
#[case(ErrorImpl::UnexpectedToken { token: "}".to_string() }, "UnexpectedToken")]
#[case(ErrorImpl::VoidVariable { variable: "a".to_string() }, "VoidVariable")]
#[case(ErrorImpl::VariableAlreadyDeclared { variable: "x".to_string() }, "VariableAlreadyDeclared")]
#[case(ErrorImpl::VariableNotDeclared { variable: "foo".to_string() }, "VariableNotDeclared")]
#[case(ErrorImpl::FunctionNotDeclared { function: "bar".to_string() }, "FunctionNotDeclared")]
#[case(ErrorImpl::MissingArguments { expected: 3, received: 1 }, "MissingArguments")]
#[case(ErrorImpl::MainNotExported, "MainNotExported")]
#[case(ErrorImpl::MissingReturn { function: "f".to_string() }, "MissingReturn")]
#[case(ErrorImpl::StaticDivisionByZero, "StaticDivisionByZero")]
#[case(ErrorImpl::DivisionByZero, "DivisionByZero")]
fn test_error_names(#[case] error_impl: ErrorImpl, #[case] name: &str) {
    let error = Error::new(error_impl, at(0));
    assert_eq!(error.get_error_name(), name);
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
        ErrorImpl::TypeMatchError {
            expected: "int".to_string(),
            received: "bool".to_string(),
        },
        at(0),
    );

    assert_eq!(
        error.get_tip().to_string(),
        "Expected type `int`, received `bool`"
    );
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_uses_message() {
    let error = Error::new(ErrorImpl::DivisionByZero, at(4));
    assert_eq!(error.to_string(), "division by zero");

    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "b".to_string(),
        },
        at(4),
    );
    assert_eq!(error.to_string(), "undefined variant \"b\"");
}
