use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum LexerError {
    #[diagnostic(code(lexer::unexpected_character))]
    #[error("Unexpected character '{c}'")]
    UnexpectedCharacter {
        c: char,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(lexer::unterminated_string))]
    #[error("Unterminated string literal")]
    UnterminatedString {
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[diagnostic(code(lexer::unterminated_comment))]
    #[error("Unterminated block comment")]
    UnterminatedComment {
        #[label("comment starts here")]
        span: SourceSpan,
    },

    #[diagnostic(code(lexer::invalid_integer))]
    #[error("Integer literal {literal} does not fit in 64 bits")]
    InvalidInteger {
        literal: String,
        #[label]
        span: SourceSpan,
    },
}
