use crate::codegen::error::CodegenError;
use crate::codegen::fragment::CodeFragment;
use crate::codegen::opcode::{Instruction, Opcode};
use crate::codegen::runtime;
use crate::codegen::strategy::Strategy;
use crate::semantic::typed::{TypedExpr, TypedPrintItem};
use crate::types::Ty;

use super::Lowerer;

impl Lowerer {
    pub(super) fn lower_print(
        &mut self,
        items: &[TypedPrintItem],
    ) -> Result<CodeFragment, CodegenError> {
        let mut code = CodeFragment::void();
        for item in items {
            let printed = match item {
                TypedPrintItem::Value(expr) => self.lower_print_value(expr)?,
                TypedPrintItem::Newline => print_separator(runtime::NEWLINE_PRINT_FORMAT),
                TypedPrintItem::Tab => print_separator(runtime::TAB_PRINT_FORMAT),
                TypedPrintItem::Space => print_separator(runtime::SPACE_PRINT_FORMAT),
            };
            code.append(printed)?;
        }
        Ok(code)
    }

    /// `value; [adjust]; PushD format; Printf`. Booleans print as their
    /// text, strings from the first byte past the record header.
    fn lower_print_value(&mut self, expr: &TypedExpr) -> Result<CodeFragment, CodegenError> {
        let format = runtime::print_format(expr.ty).ok_or_else(|| CodegenError::UnexpectedType {
            ty: expr.ty,
            node: format!("print of {}", expr.describe()),
            span: expr.span,
        })?;

        let mut code = CodeFragment::void();
        code.append(self.lower_value(expr)?)?;
        match expr.ty {
            Ty::Boolean => code.add_chunk(Strategy::PrintBoolean.generate(&mut self.labels)),
            Ty::String => {
                code.add(Instruction::int(Opcode::PushI, runtime::STRING_HEADER_SIZE));
                code.add(Instruction::new(Opcode::Add));
            }
            _ => {}
        }
        code.add(Instruction::label(Opcode::PushD, format));
        code.add(Instruction::new(Opcode::Printf));
        Ok(code)
    }
}

fn print_separator(format: &str) -> CodeFragment {
    let mut code = CodeFragment::void();
    code.add(Instruction::label(Opcode::PushD, format));
    code.add(Instruction::new(Opcode::Printf));
    code
}
