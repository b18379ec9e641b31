use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::TokenKind;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ParserError {
    #[diagnostic(code(parser::unexpected_eof))]
    #[error("Expected {expected}, however reached the end of input")]
    UnexpectedEof {
        expected: String,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(parser::expected))]
    #[error("Expected {expected}, got {got}")]
    Expected {
        expected: String,
        got: TokenKind,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(parser::return_outside_function))]
    #[error("'return' is only allowed at the end of a function body")]
    ReturnOutsideFunction {
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(parser::nested_function))]
    #[error("Functions can only be defined at the top level")]
    NestedFunction {
        #[label]
        span: SourceSpan,
    },
}
