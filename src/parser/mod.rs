mod ast;
mod error;
mod expr;
mod parser;

pub use ast::*;
pub use error::*;
pub use expr::*;
pub use parser::*;
