use miette::Diagnostic;
use thiserror::Error;

/// Raised when the generator is handed a tree that semantic analysis would
/// have rejected. These are caller bugs, not user-facing language errors.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum CodegenError {
    #[diagnostic(code(codegen::undefined_variable))]
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[diagnostic(code(codegen::undefined_function))]
    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String },

    #[diagnostic(code(codegen::nested_function))]
    #[error("Function '{name}' is not defined at the top level")]
    NestedFunction { name: String },
}
