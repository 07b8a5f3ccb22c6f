use std::fmt;

use crate::codegen::labels::LabelGenerator;
use crate::codegen::opcode::{Instruction, Opcode};
use crate::codegen::runtime;
use crate::types::Ty;

/// Multi-instruction lowering routines attached to signatures, or invoked
/// directly by the visitor. Each call produces a fresh chunk; labels are
/// drawn from the caller's generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// The operand already has the target representation.
    Identity,
    /// Nonzero integer or character to `true`, zero to `false`.
    CastToBool(Ty),
    /// Keep the low seven bits of an integer.
    CastIntToChar,
    /// Boolean equality reduced to a zero test: `a ^ b` is zero iff equal.
    BooleanDifference,
    /// Replace a boolean on the stack with the address of its text.
    PrintBoolean,
    /// Trap on a zero divisor; the divisor stays on the stack.
    DivisionByZeroGuard(Ty),
}

impl Strategy {
    pub fn generate(&self, labels: &mut LabelGenerator) -> Vec<Instruction> {
        match self {
            Strategy::Identity => Vec::new(),
            Strategy::CastToBool(_) => {
                let scope = labels.scope("cast-to-bool");
                let false_label = scope.label("false");
                let join_label = scope.label("join");
                vec![
                    Instruction::label(Opcode::JumpFalse, &false_label),
                    Instruction::int(Opcode::PushI, 1),
                    Instruction::label(Opcode::Jump, &join_label),
                    Instruction::label(Opcode::Label, false_label),
                    Instruction::int(Opcode::PushI, 0),
                    Instruction::label(Opcode::Label, join_label),
                ]
            }
            Strategy::CastIntToChar => vec![
                Instruction::int(Opcode::PushI, 127),
                Instruction::new(Opcode::BTAnd),
            ],
            Strategy::BooleanDifference => vec![Instruction::new(Opcode::BTXor)],
            Strategy::PrintBoolean => {
                let scope = labels.scope("print-boolean");
                let true_label = scope.label("true");
                let join_label = scope.label("join");
                vec![
                    Instruction::label(Opcode::JumpTrue, &true_label),
                    Instruction::label(Opcode::PushD, runtime::BOOLEAN_FALSE_STRING),
                    Instruction::label(Opcode::Jump, &join_label),
                    Instruction::label(Opcode::Label, true_label),
                    Instruction::label(Opcode::PushD, runtime::BOOLEAN_TRUE_STRING),
                    Instruction::label(Opcode::Label, join_label),
                ]
            }
            Strategy::DivisionByZeroGuard(Ty::Floating) => vec![
                Instruction::new(Opcode::Duplicate),
                Instruction::label(
                    Opcode::JumpFZero,
                    runtime::FLOATING_DIVIDE_BY_ZERO_RUNTIME_ERROR,
                ),
            ],
            Strategy::DivisionByZeroGuard(_) => vec![
                Instruction::new(Opcode::Duplicate),
                Instruction::label(
                    Opcode::JumpFalse,
                    runtime::INTEGER_DIVIDE_BY_ZERO_RUNTIME_ERROR,
                ),
            ],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Identity => write!(f, "identity"),
            Strategy::CastToBool(ty) => write!(f, "cast-to-bool({})", ty),
            Strategy::CastIntToChar => write!(f, "cast-int-to-char"),
            Strategy::BooleanDifference => write!(f, "boolean-difference"),
            Strategy::PrintBoolean => write!(f, "print-boolean"),
            Strategy::DivisionByZeroGuard(ty) => write!(f, "divide-by-zero-guard({})", ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_empty() {
        let mut labels = LabelGenerator::new();
        assert!(Strategy::Identity.generate(&mut labels).is_empty());
        assert_eq!(labels.issued(), 0);
    }

    #[test]
    fn test_cast_to_bool() {
        let mut labels = LabelGenerator::new();
        let chunk = Strategy::CastToBool(Ty::Integer).generate(&mut labels);
        assert_eq!(
            chunk,
            vec![
                Instruction::label(Opcode::JumpFalse, "-cast-to-bool-1-false"),
                Instruction::int(Opcode::PushI, 1),
                Instruction::label(Opcode::Jump, "-cast-to-bool-1-join"),
                Instruction::label(Opcode::Label, "-cast-to-bool-1-false"),
                Instruction::int(Opcode::PushI, 0),
                Instruction::label(Opcode::Label, "-cast-to-bool-1-join"),
            ]
        );
    }

    #[test]
    fn test_fresh_labels_each_call() {
        let mut labels = LabelGenerator::new();
        let first = Strategy::PrintBoolean.generate(&mut labels);
        let second = Strategy::PrintBoolean.generate(&mut labels);
        assert_ne!(first, second);
        assert_eq!(
            second[0],
            Instruction::label(Opcode::JumpTrue, "-print-boolean-2-true")
        );
    }

    #[test]
    fn test_division_guards_by_type() {
        let mut labels = LabelGenerator::new();
        let int_guard = Strategy::DivisionByZeroGuard(Ty::Integer).generate(&mut labels);
        assert_eq!(int_guard[0], Instruction::new(Opcode::Duplicate));
        assert_eq!(
            int_guard[1],
            Instruction::label(Opcode::JumpFalse, "$$i-divide-by-zero")
        );

        let float_guard = Strategy::DivisionByZeroGuard(Ty::Floating).generate(&mut labels);
        assert_eq!(
            float_guard[1],
            Instruction::label(Opcode::JumpFZero, "$$f-divide-by-zero")
        );
    }

    #[test]
    fn test_int_to_char_masks() {
        let mut labels = LabelGenerator::new();
        assert_eq!(
            Strategy::CastIntToChar.generate(&mut labels),
            vec![Instruction::int(Opcode::PushI, 127), Instruction::new(Opcode::BTAnd)]
        );
    }
}
