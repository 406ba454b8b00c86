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

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidCharLiteral { .. } => "InvalidCharLiteral",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::ImportNotFound { .. } => "ImportNotFound",
            ErrorImpl::InitializerMismatch => "InitializerMismatch",
            ErrorImpl::SpawnResultMismatch => "SpawnResultMismatch",
            ErrorImpl::VoidSpawnAssignment => "VoidSpawnAssignment",
            ErrorImpl::CannotInferType => "CannotInferType",
            ErrorImpl::AsRefOnNonPrimitive => "AsRefOnNonPrimitive",
            ErrorImpl::AsRefOnNonPrimitiveParam => "AsRefOnNonPrimitiveParam",
            ErrorImpl::PrivateFunctionReturn => "PrivateFunctionReturn",
            ErrorImpl::PrivateLambdaReturn => "PrivateLambdaReturn",
            ErrorImpl::FunctionAlreadyDefined { .. } => "FunctionAlreadyDefined",
            ErrorImpl::MissingParameterType => "MissingParameterType",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::NonBooleanCondition { .. } => "NonBooleanCondition",
            ErrorImpl::ForEachNonArray => "ForEachNonArray",
            ErrorImpl::ReservedNamespace { .. } => "ReservedNamespace",
            ErrorImpl::NamespaceAlreadyDefined { .. } => "NamespaceAlreadyDefined",
            ErrorImpl::NamespaceNameInUse { .. } => "NamespaceNameInUse",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::UndefinedAssignTarget { .. } => "UndefinedAssignTarget",
            ErrorImpl::AssignmentMismatch { .. } => "AssignmentMismatch",
            ErrorImpl::PrivateEscape => "PrivateEscape",
            ErrorImpl::ComparisonMismatch => "ComparisonMismatch",
            ErrorImpl::InvalidArithmetic => "InvalidArithmetic",
            ErrorImpl::InvalidAddition => "InvalidAddition",
            ErrorImpl::LogicalOperands => "LogicalOperands",
            ErrorImpl::UnaryMinus => "UnaryMinus",
            ErrorImpl::UnaryNot => "UnaryNot",
            ErrorImpl::IndexNonArray => "IndexNonArray",
            ErrorImpl::IndexNotInteger => "IndexNotInteger",
            ErrorImpl::IndexAssignMismatch => "IndexAssignMismatch",
            ErrorImpl::AccessNonArray => "AccessNonArray",
            ErrorImpl::IndexNotNumeric => "IndexNotNumeric",
            ErrorImpl::ArrayElementMismatch => "ArrayElementMismatch",
            ErrorImpl::RangeBound { .. } => "RangeBound",
            ErrorImpl::IncrementNonNumeric => "IncrementNonNumeric",
            ErrorImpl::LenArgument => "LenArgument",
            ErrorImpl::UnsupportedBuiltinArgument => "UnsupportedBuiltinArgument",
            ErrorImpl::NoSuchMember { .. } => "NoSuchMember",
            ErrorImpl::CallNonFunction { .. } => "CallNonFunction",
            ErrorImpl::ArgumentCount { .. } => "ArgumentCount",
            ErrorImpl::ArgumentMismatch { .. } => "ArgumentMismatch",
            ErrorImpl::LambdaReturnInference => "LambdaReturnInference",
            ErrorImpl::LambdaParamInference => "LambdaParamInference",
            ErrorImpl::LambdaBodyMismatch => "LambdaBodyMismatch",
            ErrorImpl::SpawnRequiresCall => "SpawnRequiresCall",
            ErrorImpl::SpawnNonFunction => "SpawnNonFunction",
            ErrorImpl::SyncRequiresHandle => "SyncRequiresHandle",
            ErrorImpl::ArraySyncRequiresHandles => "ArraySyncRequiresHandles",
            ErrorImpl::NotPendingHandle { .. } => "NotPendingHandle",
            ErrorImpl::AlreadySynchronized { .. } => "AlreadySynchronized",
            ErrorImpl::PendingHandleUse { .. } => "PendingHandleUse",
            ErrorImpl::PendingHandleReassign { .. } => "PendingHandleReassign",
            ErrorImpl::FrozenMutation { .. } => "FrozenMutation",
            ErrorImpl::FrozenMethodCall { .. } => "FrozenMethodCall",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
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
            ErrorImpl::InvalidCharLiteral { token } => ErrorTip::Suggestion(format!(
                "Character literals hold exactly one character, found `{}`",
                token
            )),
            ErrorImpl::UndefinedVariable { suggestion, .. }
            | ErrorImpl::UndefinedAssignTarget { suggestion, .. }
            | ErrorImpl::NoSuchMember { suggestion, .. } => match suggestion {
                Some(name) => ErrorTip::Suggestion(format!("Did you mean '{}'?", name)),
                None => ErrorTip::None,
            },
            ErrorImpl::AsRefOnNonPrimitive | ErrorImpl::AsRefOnNonPrimitiveParam => {
                ErrorTip::Suggestion(String::from(
                    "Reference types are already passed by reference, use 'as val' to copy",
                ))
            }
            ErrorImpl::PrivateEscape => ErrorTip::Suggestion(String::from(
                "Values allocated in a private block are freed when it ends",
            )),
            ErrorImpl::PendingHandleUse { name } => {
                ErrorTip::Suggestion(format!("Synchronize it first with `{}!`", name))
            }
            ErrorImpl::FrozenMutation { .. } | ErrorImpl::FrozenMethodCall { .. } => {
                ErrorTip::Suggestion(String::from(
                    "Synchronize the thread that captured it before modifying it",
                ))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

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
    #[error("invalid character literal: {token:?}")]
    InvalidCharLiteral { token: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("cannot import module '{module}'")]
    ImportNotFound { module: String },

    #[error("Initializer type does not match variable type")]
    InitializerMismatch,
    #[error("Thread spawn return type does not match variable type")]
    SpawnResultMismatch,
    #[error("Cannot assign void thread spawn to variable")]
    VoidSpawnAssignment,
    #[error("Cannot infer type without initializer")]
    CannotInferType,
    #[error("'as ref' can only be used with primitive types")]
    AsRefOnNonPrimitive,
    #[error("'as ref' only applies to primitive parameters")]
    AsRefOnNonPrimitiveParam,
    #[error("Private function can only return primitive types (int, double, bool, char)")]
    PrivateFunctionReturn,
    #[error("Private lambda can only return primitive types (int, double, bool, char)")]
    PrivateLambdaReturn,
    #[error("Function '{function}' is already defined (possible import collision)")]
    FunctionAlreadyDefined { function: String },
    #[error("Parameter type is missing")]
    MissingParameterType,
    #[error("Return type does not match function return type")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("{construct} condition must be boolean")]
    NonBooleanCondition { construct: String },
    #[error("For-each iterable must be an array")]
    ForEachNonArray,

    #[error("Cannot use reserved keyword '{name}' as namespace name")]
    ReservedNamespace { name: String },
    #[error("Namespace '{name}' is already defined")]
    NamespaceAlreadyDefined { name: String },
    #[error("Cannot use '{name}' as namespace: name already in use")]
    NamespaceNameInUse { name: String },

    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
        suggestion: Option<String>,
    },
    #[error("Cannot assign to undefined variable '{name}'")]
    UndefinedAssignTarget {
        name: String,
        suggestion: Option<String>,
    },
    #[error("Type mismatch in assignment")]
    AssignmentMismatch { expected: String, received: String },
    #[error("Cannot assign non-primitive type to variable declared outside private block")]
    PrivateEscape,

    #[error("Type mismatch in comparison")]
    ComparisonMismatch,
    #[error("Invalid types for arithmetic operator")]
    InvalidArithmetic,
    #[error("Invalid types for + operator")]
    InvalidAddition,
    #[error("Logical operators require boolean operands")]
    LogicalOperands,
    #[error("Unary minus on non-numeric")]
    UnaryMinus,
    #[error("Unary ! on non-bool")]
    UnaryNot,

    #[error("Cannot index into non-array type")]
    IndexNonArray,
    #[error("Array index must be an integer")]
    IndexNotInteger,
    #[error("Type mismatch in index assignment")]
    IndexAssignMismatch,
    #[error("Cannot access non-array")]
    AccessNonArray,
    #[error("Array index must be numeric type")]
    IndexNotNumeric,
    #[error("Array elements must have the same type")]
    ArrayElementMismatch,
    #[error("Range {bound} must be numeric type")]
    RangeBound { bound: String },
    #[error("Increment/decrement on non-numeric type")]
    IncrementNonNumeric,

    #[error("len() requires array or string argument")]
    LenArgument,
    #[error("Unsupported type for built-in function")]
    UnsupportedBuiltinArgument,
    #[error("Type '{type_}' has no member '{member}'")]
    NoSuchMember {
        type_: String,
        member: String,
        suggestion: Option<String>,
    },
    #[error("'{name}' is of type '{type_}', cannot call non-function")]
    CallNonFunction { name: String, type_: String },
    #[error("Function '{function}' expects {expected} argument(s), got {received}")]
    ArgumentCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("Argument {index} of '{function}': expected '{expected}', got '{received}'")]
    ArgumentMismatch {
        function: String,
        index: usize,
        expected: String,
        received: String,
    },

    #[error("Cannot infer lambda return type. Provide explicit type or use typed variable declaration.")]
    LambdaReturnInference,
    #[error("Cannot infer lambda parameter type. Provide explicit type or use typed variable declaration.")]
    LambdaParamInference,
    #[error("Lambda body type does not match declared return type")]
    LambdaBodyMismatch,

    #[error("Thread spawn requires a function call")]
    SpawnRequiresCall,
    #[error("Cannot spawn non-function")]
    SpawnNonFunction,
    #[error("Sync requires a thread handle variable")]
    SyncRequiresHandle,
    #[error("Array sync requires thread handle variables")]
    ArraySyncRequiresHandles,
    #[error("Cannot sync variable '{name}': not a pending thread handle")]
    NotPendingHandle { name: String },
    #[error("Thread handle '{name}' has already been synchronized")]
    AlreadySynchronized { name: String },
    #[error("Cannot use pending thread handle '{name}' before synchronization")]
    PendingHandleUse { name: String },
    #[error("Cannot reassign pending thread handle '{name}'")]
    PendingHandleReassign { name: String },
    #[error("Cannot modify '{name}' while it is captured by a pending thread")]
    FrozenMutation { name: String },
    #[error("Cannot call mutating method '{method}' on frozen variable '{name}'")]
    FrozenMethodCall { method: String, name: String },
}
