use crate::ast::BinOp;
use crate::codegen::error::CodegenError;
use crate::codegen::fragment::{value_of, CodeFragment, Shape};
use crate::codegen::opcode::{Instruction, Opcode};
use crate::codegen::runtime;
use crate::codegen::strategy::Strategy;
use crate::semantic::signatures::{Signature, Variant};
use crate::semantic::typed::{ExprKind, TypedExpr};
use crate::types::Ty;

use super::Lowerer;

impl Lowerer {
    /// Lower an expression to whatever shape it naturally has: identifiers
    /// give an address, everything else a value.
    pub fn lower_expr(&mut self, expr: &TypedExpr) -> Result<CodeFragment, CodegenError> {
        match &expr.kind {
            ExprKind::IntConst(n) => Ok(push(Instruction::int(Opcode::PushI, *n))),
            ExprKind::FloatConst(x) => Ok(push(Instruction::float(Opcode::PushF, *x))),
            ExprKind::BoolConst(b) => Ok(push(Instruction::int(Opcode::PushI, i32::from(*b)))),
            ExprKind::CharConst(c) => Ok(push(Instruction::int(Opcode::PushI, i32::from(*c)))),
            ExprKind::StrConst { value, name } => Ok(self.lower_string(value, name.as_deref())),
            ExprKind::Identifier(binding) => {
                let mut code = CodeFragment::address();
                binding.generate_address(&mut code);
                Ok(code)
            }
            ExprKind::Binary {
                op,
                lhs,
                rhs,
                signature,
            } => {
                if signature.is_null() {
                    return Err(null_signature(expr));
                }
                if op.is_logical() {
                    self.lower_logical(expr, *op, lhs, rhs, None)
                } else if op.is_comparison() {
                    self.lower_comparison(expr, *op, lhs, rhs, signature)
                } else {
                    self.lower_arithmetic(expr, lhs, rhs, signature)
                }
            }
            ExprKind::Unary {
                operand, signature, ..
            }
            | ExprKind::Cast {
                operand, signature, ..
            } => {
                if signature.is_null() {
                    return Err(null_signature(expr));
                }
                let mut code = CodeFragment::value();
                code.append(self.lower_value(operand)?)?;
                self.apply_variant(&mut code, signature, expr)?;
                Ok(code)
            }
            ExprKind::Error => Err(CodegenError::ErrorNode { span: expr.span }),
        }
    }

    /// Lower an expression and coerce it to a value fragment, loading
    /// through an address when needed.
    pub fn lower_value(&mut self, expr: &TypedExpr) -> Result<CodeFragment, CodegenError> {
        let code = self.lower_expr(expr)?;
        if code.is_address() {
            return value_of(code, expr.ty).map_err(|e| e.at(&expr.describe(), expr.span));
        }
        if code.is_void() {
            return Err(CodegenError::ShapeMismatch {
                expected: Shape::Value,
                found: code.shape(),
                node: expr.describe(),
                span: expr.span,
            });
        }
        Ok(code)
    }

    /// `DLabel l; DataI 6; DataI 9; DataI len; DataS text; PushD l`: a
    /// permanent string record laid out inline, then its address.
    fn lower_string(&mut self, value: &str, name: Option<&str>) -> CodeFragment {
        let label = self.labels.scope("stringConstant").label(name.unwrap_or(""));
        let mut code = CodeFragment::value();
        code.add(Instruction::label(Opcode::DLabel, &label));
        code.add(Instruction::int(Opcode::DataI, runtime::STRING_TYPE_ID));
        code.add(Instruction::int(Opcode::DataI, runtime::STRING_STATUS_PERMANENT));
        code.add(Instruction::int(Opcode::DataI, value.len() as i32));
        code.add(Instruction::string(Opcode::DataS, value));
        code.add(Instruction::label(Opcode::PushD, label));
        code
    }

    fn lower_arithmetic(
        &mut self,
        expr: &TypedExpr,
        lhs: &TypedExpr,
        rhs: &TypedExpr,
        signature: &Signature,
    ) -> Result<CodeFragment, CodegenError> {
        let mut code = CodeFragment::value();
        code.append(self.lower_value(lhs)?)?;
        code.append(self.lower_value(rhs)?)?;
        self.apply_variant(&mut code, signature, expr)?;
        Ok(code)
    }

    /// Emit the signature's instruction or splice its strategy. Divisions
    /// get a zero check on the divisor first.
    fn apply_variant(
        &mut self,
        code: &mut CodeFragment,
        signature: &Signature,
        expr: &TypedExpr,
    ) -> Result<(), CodegenError> {
        match signature.variant() {
            Variant::Opcode(opcode) => {
                if opcode.is_division() {
                    let guard = Strategy::DivisionByZeroGuard(signature.param_type());
                    code.add_chunk(guard.generate(&mut self.labels));
                }
                code.add(Instruction::new(opcode));
            }
            Variant::Strategy(strategy) => code.add_chunk(strategy.generate(&mut self.labels)),
            Variant::None => return Err(null_signature(expr)),
        }
        Ok(())
    }

    /// Comparison: compute the difference, branch on its sign, then push
    /// 1 or 0.
    fn lower_comparison(
        &mut self,
        expr: &TypedExpr,
        op: BinOp,
        lhs: &TypedExpr,
        rhs: &TypedExpr,
        signature: &Signature,
    ) -> Result<CodeFragment, CodegenError> {
        let scope = self.labels.scope("compare");
        let true_label = scope.label("true");
        let false_label = scope.label("false");
        let join_label = scope.label("join");

        let mut code = CodeFragment::value();
        code.append(self.lower_value(lhs)?)?;
        code.append(self.lower_value(rhs)?)?;
        self.apply_variant(&mut code, signature, expr)?;

        let floating = signature.param_type() == Ty::Floating;
        let pick = |int: Opcode, float: Opcode| if floating { float } else { int };
        // (branch taken on the difference, target when taken, fallthrough target)
        let (branch, taken, otherwise) = match op {
            BinOp::Gt => (pick(Opcode::JumpPos, Opcode::JumpFPos), &true_label, &false_label),
            BinOp::GtEq => (pick(Opcode::JumpNeg, Opcode::JumpFNeg), &false_label, &true_label),
            BinOp::Lt => (pick(Opcode::JumpNeg, Opcode::JumpFNeg), &true_label, &false_label),
            BinOp::LtEq => (pick(Opcode::JumpPos, Opcode::JumpFPos), &false_label, &true_label),
            BinOp::Eq => (pick(Opcode::JumpFalse, Opcode::JumpFZero), &true_label, &false_label),
            BinOp::NotEq => (pick(Opcode::JumpFalse, Opcode::JumpFZero), &false_label, &true_label),
            _ => {
                return Err(CodegenError::UnexpectedType {
                    ty: expr.ty,
                    node: expr.describe(),
                    span: expr.span,
                })
            }
        };
        code.add(Instruction::label(branch, taken));
        code.add(Instruction::label(Opcode::Jump, otherwise));

        code.add(Instruction::label(Opcode::Label, &true_label));
        code.add(Instruction::int(Opcode::PushI, 1));
        code.add(Instruction::label(Opcode::Jump, &join_label));
        code.add(Instruction::label(Opcode::Label, &false_label));
        code.add(Instruction::int(Opcode::PushI, 0));
        code.add(Instruction::label(Opcode::Jump, &join_label));
        code.add(Instruction::label(Opcode::Label, join_label));
        Ok(code)
    }

    /// Short-circuit `&&`/`||`. After the left operand is evaluated it is
    /// duplicated and tested; a deciding value jumps straight to the join
    /// with itself as the result. A left-nested chain of the same operator
    /// shares one join label, placed once by the outermost node.
    fn lower_logical(
        &mut self,
        expr: &TypedExpr,
        op: BinOp,
        lhs: &TypedExpr,
        rhs: &TypedExpr,
        inherited: Option<&str>,
    ) -> Result<CodeFragment, CodegenError> {
        let join_label = match inherited {
            Some(label) => label.to_string(),
            None => self.labels.scope("boolean").label("join"),
        };

        let mut code = CodeFragment::value();
        let left = match &lhs.kind {
            ExprKind::Binary {
                op: inner,
                lhs: inner_lhs,
                rhs: inner_rhs,
                signature,
            } if *inner == op => {
                if signature.is_null() {
                    return Err(null_signature(lhs));
                }
                self.lower_logical(lhs, op, inner_lhs, inner_rhs, Some(join_label.as_str()))?
            }
            _ => self.lower_value(lhs)?,
        };
        code.append(left)?;

        let (short_circuit, combine) = match op {
            BinOp::And => (Opcode::JumpFalse, Opcode::And),
            BinOp::Or => (Opcode::JumpTrue, Opcode::Or),
            _ => {
                return Err(CodegenError::UnexpectedType {
                    ty: expr.ty,
                    node: expr.describe(),
                    span: expr.span,
                })
            }
        };
        code.add(Instruction::new(Opcode::Duplicate));
        code.add(Instruction::label(short_circuit, &join_label));
        code.append(self.lower_value(rhs)?)?;
        code.add(Instruction::new(combine));

        if inherited.is_none() {
            code.add(Instruction::label(Opcode::Label, join_label));
        }
        Ok(code)
    }
}

fn push(instruction: Instruction) -> CodeFragment {
    let mut code = CodeFragment::value();
    code.add(instruction);
    code
}

fn null_signature(expr: &TypedExpr) -> CodegenError {
    CodegenError::NullSignature {
        node: expr.describe(),
        span: expr.span,
    }
}
