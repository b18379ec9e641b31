mod codegen;
mod emitter;
mod error;

pub use codegen::*;
pub use emitter::*;
pub use error::*;
