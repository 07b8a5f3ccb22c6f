//! Tree lowering: one fragment per typed node, moved into its parent.

mod expr;
mod print;
#[cfg(test)]
mod tests;

use crate::codegen::error::CodegenError;
use crate::codegen::fragment::{store_opcode, CodeFragment};
use crate::codegen::labels::LabelGenerator;
use crate::codegen::opcode::{Instruction, Opcode};
use crate::codegen::runtime;
use crate::semantic::scope::Binding;
use crate::semantic::typed::{TypedBlock, TypedExpr, TypedProgram, TypedStmt};
use crate::span::{Span, Spanned};

/// Walks a typed tree and produces ASMEmu code. Owns the label counter for
/// one compilation, so separate runs are independent.
#[derive(Debug, Default)]
pub struct Lowerer {
    labels: LabelGenerator,
}

impl Lowerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower a whole program: runtime environment, global memory block,
    /// then the main code.
    pub fn lower_program(mut self, program: &TypedProgram) -> Result<CodeFragment, CodegenError> {
        let mut code = runtime::environment();
        code.append(global_memory_block(program.global_size))?;

        code.add(Instruction::label(Opcode::Label, runtime::MAIN_PROGRAM_LABEL));
        code.append(self.lower_block(&program.body)?)?;
        code.add(Instruction::new(Opcode::Halt).with_comment("End of Execution"));

        tracing::debug!(
            instructions = code.len(),
            label_scopes = self.labels.issued(),
            "lowered program"
        );
        Ok(code)
    }

    pub fn lower_block(&mut self, block: &TypedBlock) -> Result<CodeFragment, CodegenError> {
        let mut code = CodeFragment::void();
        for stmt in &block.statements {
            code.append(self.lower_stmt(stmt)?)?;
        }
        Ok(code)
    }

    pub fn lower_stmt(&mut self, stmt: &Spanned<TypedStmt>) -> Result<CodeFragment, CodegenError> {
        match &stmt.node {
            TypedStmt::Declaration { binding, value } => {
                self.lower_store(binding, value, "declaration", stmt.span)
            }
            TypedStmt::Assignment {
                binding,
                value,
                signature,
            } => {
                if signature.is_null() {
                    return Err(CodegenError::NullSignature {
                        node: format!("assignment to '{}'", binding.name()),
                        span: stmt.span,
                    });
                }
                self.lower_store(binding, value, "assignment", stmt.span)
            }
            TypedStmt::Print { items } => self.lower_print(items),
            TypedStmt::Block(block) => self.lower_block(block),
        }
    }

    /// Declarations and assignments: `[address, value] Store`.
    fn lower_store(
        &mut self,
        binding: &Binding,
        value: &TypedExpr,
        what: &str,
        span: Span,
    ) -> Result<CodeFragment, CodegenError> {
        let store = store_opcode(value.ty).ok_or_else(|| CodegenError::UnexpectedType {
            ty: value.ty,
            node: format!("{} of '{}'", what, binding.name()),
            span,
        })?;

        let mut lvalue = CodeFragment::address();
        binding.generate_address(&mut lvalue);
        let rvalue = self.lower_value(value)?;

        let mut code = CodeFragment::void();
        code.append(lvalue)?;
        code.append(rvalue)?;
        code.add(Instruction::new(store));
        Ok(code)
    }
}

fn global_memory_block(size: u32) -> CodeFragment {
    let mut code = CodeFragment::void();
    code.add(Instruction::label(Opcode::DLabel, runtime::GLOBAL_MEMORY_BLOCK));
    code.add(Instruction::int(Opcode::DataZ, size as i32));
    code
}
