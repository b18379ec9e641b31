pub mod analyzer;
pub mod codegen;
pub mod lexer;
pub mod parser;

use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use analyzer::{SemaError, SemanticAnalyzer};
use codegen::{Codegen, CodegenError};
use lexer::{Lexer, LexerError};
use parser::{Parser, ParserError, Program};

#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[diagnostic(code(compile::semantic))]
    #[error("Semantic errors found: {}", .0.len())]
    Semantic(#[related] Vec<SemaError>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codegen(#[from] CodegenError),
}

pub fn parse(user_input: &str) -> Result<Program, CompileError> {
    info!("running lexical analysis");
    let tokens = Lexer::tokenize(user_input)?;
    info!(tokens = tokens.len(), "running syntax analysis");
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}

/// Runs the front end and semantic analysis only.
pub fn analyze_source(user_input: &str) -> Result<Vec<SemaError>, CompileError> {
    let program = parse(user_input)?;
    info!("running semantic analysis");
    Ok(SemanticAnalyzer::new().analyze(&program))
}

/// Compiles source text to a C translation unit. Code generation only runs
/// when semantic analysis reports nothing.
pub fn compile(user_input: &str) -> Result<String, CompileError> {
    let program = parse(user_input)?;

    info!("running semantic analysis");
    let errors = SemanticAnalyzer::new().analyze(&program);
    if !errors.is_empty() {
        return Err(CompileError::Semantic(errors));
    }

    info!("generating target code");
    let c_code = Codegen::new().generate(&program)?;
    info!("compilation completed");
    Ok(c_code)
}
