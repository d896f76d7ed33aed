use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VoidVariable { .. } => "VoidVariable",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::InvalidCallee => "InvalidCallee",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::OperandTypeError { .. } => "OperandTypeError",
            ErrorImpl::OperandTypesMismatch { .. } => "OperandTypesMismatch",
            ErrorImpl::InvalidLvalue => "InvalidLvalue",
            ErrorImpl::LocalFunctionDeclaration { .. } => "LocalFunctionDeclaration",
            ErrorImpl::LocalExport { .. } => "LocalExport",
            ErrorImpl::MainNotExported => "MainNotExported",
            ErrorImpl::MainReturnType { .. } => "MainReturnType",
            ErrorImpl::MainNotFound => "MainNotFound",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::ReturnValueInVoidFunction { .. } => "ReturnValueInVoidFunction",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
            ErrorImpl::StaticDivisionByZero => "StaticDivisionByZero",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::VoidValue { .. } => "VoidValue",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::VoidVariable { variable } => ErrorTip::Suggestion(format!(
                "Variant `{}` cannot have type `void`",
                variable
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variant `{}` already declared in this scope", variable))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Undefined variant `{}`", variable))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Undefined function `{}`", function))
            }
            ErrorImpl::InvalidCallee => {
                ErrorTip::Suggestion(String::from("Only a function name can be called"))
            }
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::OperandTypeError { operator, received } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}`",
                operator, received
            )),
            ErrorImpl::OperandTypesMismatch {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}` and `{}`",
                operator, left, right
            )),
            ErrorImpl::InvalidLvalue => ErrorTip::Suggestion(String::from(
                "Only a variant name can be assigned to",
            )),
            ErrorImpl::LocalFunctionDeclaration { function } => ErrorTip::Suggestion(format!(
                "Function `{}` must be declared at the top level",
                function
            )),
            ErrorImpl::LocalExport { variable } => ErrorTip::Suggestion(format!(
                "Local variant `{}` cannot be exported",
                variable
            )),
            ErrorImpl::MainNotExported => {
                ErrorTip::Suggestion(String::from("Function `main` must be exported"))
            }
            ErrorImpl::MainReturnType { received } => ErrorTip::Suggestion(format!(
                "Function `main` must return `int`, not `{}`",
                received
            )),
            ErrorImpl::MainNotFound => ErrorTip::Suggestion(String::from(
                "Declare `export int main()` to run this module",
            )),
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "Missing return statement in function `{}`",
                function
            )),
            ErrorImpl::ReturnValueInVoidFunction { function } => ErrorTip::Suggestion(format!(
                "Function `{}` returns `void` and cannot return a value",
                function
            )),
            ErrorImpl::MissingReturnValue { function } => ErrorTip::Suggestion(format!(
                "Function `{}` must return a value",
                function
            )),
            ErrorImpl::StaticDivisionByZero => {
                ErrorTip::Suggestion(String::from("Division by a literal zero"))
            }
            ErrorImpl::DivisionByZero => ErrorTip::Suggestion(String::from("Division by zero")),
            ErrorImpl::VoidValue { function } => ErrorTip::Suggestion(format!(
                "Function `{}` returns `void` and has no value",
                function
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("variant {variable:?} type cannot be 'void'")]
    VoidVariable { variable: String },
    #[error("variant {variable:?} duplicate")]
    VariableAlreadyDeclared { variable: String },
    #[error("undefined variant {variable:?}")]
    VariableNotDeclared { variable: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("undefined function {function:?}")]
    FunctionNotDeclared { function: String },
    #[error("invalid function identifier")]
    InvalidCallee,
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("operator {operator:?} cannot be applied to {received:?}")]
    OperandTypeError { operator: String, received: String },
    #[error("operator {operator:?} cannot be applied to {left:?} and {right:?}")]
    OperandTypesMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("expression is not assignable")]
    InvalidLvalue,
    #[error("local declaration {function:?} must be variant")]
    LocalFunctionDeclaration { function: String },
    #[error("local declaration {variable:?} cannot export")]
    LocalExport { variable: String },
    #[error("function 'main' must exported")]
    MainNotExported,
    #[error("function 'main' must return int, found {received:?}")]
    MainReturnType { received: String },
    #[error("function 'main' not found")]
    MainNotFound,
    #[error("missing return statement in {function:?}")]
    MissingReturn { function: String },
    #[error("function {function:?} return type is 'void', cannot return a value")]
    ReturnValueInVoidFunction { function: String },
    #[error("function {function:?} return type not 'void', must return a value")]
    MissingReturnValue { function: String },
    #[error("division by zero")]
    StaticDivisionByZero,
    #[error("division by zero")]
    DivisionByZero,
    #[error("void function {function:?} used as a value")]
    VoidValue { function: String },
}
