//! Runtime environment emitted at the top of every program: format
//! strings, boolean text, and runtime error handlers.

use crate::codegen::fragment::CodeFragment;
use crate::codegen::opcode::{Instruction, Opcode};
use crate::types::Ty;

pub const MAIN_PROGRAM_LABEL: &str = "$$main";
pub const GLOBAL_MEMORY_BLOCK: &str = "$global-memory-block";
pub const USABLE_MEMORY_START: &str = "$usable-memory-start";

pub const INTEGER_PRINT_FORMAT: &str = "$print-format-integer";
pub const FLOATING_PRINT_FORMAT: &str = "$print-format-floating";
pub const BOOLEAN_PRINT_FORMAT: &str = "$print-format-boolean";
pub const CHARACTER_PRINT_FORMAT: &str = "$print-format-character";
pub const STRING_PRINT_FORMAT: &str = "$print-format-string";
pub const NEWLINE_PRINT_FORMAT: &str = "$print-format-newline";
pub const SPACE_PRINT_FORMAT: &str = "$print-format-space";
pub const TAB_PRINT_FORMAT: &str = "$print-format-tab";

pub const BOOLEAN_TRUE_STRING: &str = "$boolean-true-string";
pub const BOOLEAN_FALSE_STRING: &str = "$boolean-false-string";

pub const GENERAL_RUNTIME_ERROR: &str = "$$general-runtime-error";
pub const INTEGER_DIVIDE_BY_ZERO_RUNTIME_ERROR: &str = "$$i-divide-by-zero";
pub const FLOATING_DIVIDE_BY_ZERO_RUNTIME_ERROR: &str = "$$f-divide-by-zero";

const GENERAL_ERROR_MESSAGE: &str = "$errors-general-message";
const INTEGER_DIVIDE_BY_ZERO_MESSAGE: &str = "$errors-int-divide-by-zero";
const FLOATING_DIVIDE_BY_ZERO_MESSAGE: &str = "$errors-float-divide-by-zero";

/// Offset of a string record's first character past its three 4-byte
/// header fields.
pub const STRING_HEADER_SIZE: i32 = 12;
/// Type tag stored in the first header field of a string record.
pub const STRING_TYPE_ID: i32 = 6;
/// Flags field: immutable (1) and permanent (8).
pub const STRING_STATUS_PERMANENT: i32 = 9;

/// printf format label for printing a value of `ty`.
pub fn print_format(ty: Ty) -> Option<&'static str> {
    match ty {
        Ty::Integer => Some(INTEGER_PRINT_FORMAT),
        Ty::Floating => Some(FLOATING_PRINT_FORMAT),
        Ty::Boolean => Some(BOOLEAN_PRINT_FORMAT),
        Ty::Character => Some(CHARACTER_PRINT_FORMAT),
        Ty::String => Some(STRING_PRINT_FORMAT),
        Ty::Error | Ty::NoType => None,
    }
}

/// Everything that precedes the global memory block.
pub fn environment() -> CodeFragment {
    let mut code = CodeFragment::void();
    code.add_chunk(jump_to_main());
    code.add_chunk(string_constants());
    code.add_chunk(runtime_errors());
    code.add(Instruction::label(Opcode::DLabel, USABLE_MEMORY_START));
    code
}

fn jump_to_main() -> Vec<Instruction> {
    vec![Instruction::label(Opcode::Jump, MAIN_PROGRAM_LABEL)]
}

fn string_constants() -> Vec<Instruction> {
    let table = [
        (INTEGER_PRINT_FORMAT, "%d"),
        (FLOATING_PRINT_FORMAT, "%g"),
        (BOOLEAN_PRINT_FORMAT, "%s"),
        (CHARACTER_PRINT_FORMAT, "%c"),
        (STRING_PRINT_FORMAT, "%s"),
        (NEWLINE_PRINT_FORMAT, "\n"),
        (SPACE_PRINT_FORMAT, " "),
        (TAB_PRINT_FORMAT, "\t"),
        (BOOLEAN_TRUE_STRING, "true"),
        (BOOLEAN_FALSE_STRING, "false"),
    ];
    let mut out = Vec::with_capacity(table.len() * 2);
    for (label, text) in table {
        out.push(Instruction::label(Opcode::DLabel, label));
        out.push(Instruction::string(Opcode::DataS, text));
    }
    out
}

fn runtime_errors() -> Vec<Instruction> {
    let mut out = vec![
        Instruction::label(Opcode::DLabel, GENERAL_ERROR_MESSAGE),
        Instruction::string(Opcode::DataS, "Runtime error: %s\n"),
        Instruction::label(Opcode::Label, GENERAL_RUNTIME_ERROR),
        Instruction::label(Opcode::PushD, GENERAL_ERROR_MESSAGE),
        Instruction::new(Opcode::Printf),
        Instruction::new(Opcode::Halt),
    ];
    out.extend(error_handler(
        INTEGER_DIVIDE_BY_ZERO_MESSAGE,
        "integer divide by zero",
        INTEGER_DIVIDE_BY_ZERO_RUNTIME_ERROR,
    ));
    out.extend(error_handler(
        FLOATING_DIVIDE_BY_ZERO_MESSAGE,
        "floating divide by zero",
        FLOATING_DIVIDE_BY_ZERO_RUNTIME_ERROR,
    ));
    out
}

/// Message string plus a handler that pushes it and falls into the
/// general error routine.
fn error_handler(message_label: &str, message: &str, handler: &str) -> Vec<Instruction> {
    vec![
        Instruction::label(Opcode::DLabel, message_label),
        Instruction::string(Opcode::DataS, message),
        Instruction::label(Opcode::Label, handler),
        Instruction::label(Opcode::PushD, message_label),
        Instruction::label(Opcode::Jump, GENERAL_RUNTIME_ERROR),
    ]
}
