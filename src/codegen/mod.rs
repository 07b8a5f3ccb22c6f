//! ASMEmu back end: fragments, labels, strategies and the tree lowering.

pub mod error;
pub mod fragment;
pub mod labels;
pub mod lower;
pub mod opcode;
pub mod runtime;
pub mod strategy;

pub use error::CodegenError;
pub use lower::Lowerer;
pub use opcode::{render_program, Instruction};

use crate::semantic::typed::TypedProgram;

/// Generate the complete instruction stream for a checked program. Each
/// call starts its own label numbering.
pub fn generate(program: &TypedProgram) -> Result<Vec<Instruction>, CodegenError> {
    let code = Lowerer::new().lower_program(program)?;
    Ok(code.into_instructions())
}
