use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use super::Type;

/// A defect in the input program. Collected, never fatal to the analysis.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum SemaError {
    #[diagnostic(code(sema::undefined_variable))]
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable {
        name: String,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::undefined_variable))]
    #[error("Undefined variable '{name}' in print statement.")]
    UndefinedVariableInPrint {
        name: String,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::type_mismatch))]
    #[error("Type mismatch: '{name}' is {expected}, but assigned {found}.")]
    TypeMismatch {
        name: String,
        expected: Type,
        found: Type,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::operand_mismatch))]
    #[error("Type mismatch in operation: {left} vs {right}.")]
    OperandMismatch { left: Type, right: Type },

    #[diagnostic(code(sema::invalid_operand))]
    #[error("Operator '{op}' is not defined for {ty}.")]
    InvalidOperand { op: String, ty: Type },

    #[diagnostic(code(sema::undefined_function))]
    #[error("Undefined function '{name}'.")]
    UndefinedFunction {
        name: String,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::arity_mismatch))]
    #[error("Function '{name}' takes {expected} argument(s), but {found} were given.")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::argument_type_mismatch))]
    #[error("Argument {position} of '{name}' must be int, but is {found}.")]
    ArgumentTypeMismatch {
        name: String,
        position: usize,
        found: Type,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::return_type_mismatch))]
    #[error("Function '{name}' must return int, but returns {found}.")]
    ReturnTypeMismatch {
        name: String,
        found: Type,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::reserved_function_name))]
    #[error("'{name}' is reserved for the program entry point.")]
    ReservedFunctionName {
        name: String,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::name_collision))]
    #[error("Variable '{name}' has the same name as a function.")]
    NameCollision {
        name: String,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::duplicate_function))]
    #[error("Function '{name}' is defined more than once.")]
    DuplicateFunction {
        name: String,
        #[label("redefined here")]
        span: SourceSpan,
    },
}
