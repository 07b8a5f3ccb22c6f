use std::fmt;

/// ASMEmu instruction vocabulary emitted by the code generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Directives
    Label,
    DLabel,
    DataI,
    DataS,
    DataZ,

    // Stack
    PushI,
    PushF,
    PushD,
    Duplicate,

    // Integer arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Floating arithmetic
    FAdd,
    FSubtract,
    FMultiply,
    FDivide,
    ConvertF,
    ConvertI,

    // Boolean and bitwise
    And,
    Or,
    BNegate,
    BTAnd,
    BTXor,

    // Control
    Jump,
    JumpFalse,
    JumpTrue,
    JumpPos,
    JumpNeg,
    JumpFZero,
    JumpFPos,
    JumpFNeg,
    Halt,

    // Memory
    LoadI,
    LoadF,
    LoadC,
    StoreI,
    StoreF,
    StoreC,

    // Output
    Printf,
}

impl Opcode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::Label => "Label",
            Opcode::DLabel => "DLabel",
            Opcode::DataI => "DataI",
            Opcode::DataS => "DataS",
            Opcode::DataZ => "DataZ",
            Opcode::PushI => "PushI",
            Opcode::PushF => "PushF",
            Opcode::PushD => "PushD",
            Opcode::Duplicate => "Duplicate",
            Opcode::Add => "Add",
            Opcode::Subtract => "Subtract",
            Opcode::Multiply => "Multiply",
            Opcode::Divide => "Divide",
            Opcode::FAdd => "FAdd",
            Opcode::FSubtract => "FSubtract",
            Opcode::FMultiply => "FMultiply",
            Opcode::FDivide => "FDivide",
            Opcode::ConvertF => "ConvertF",
            Opcode::ConvertI => "ConvertI",
            Opcode::And => "And",
            Opcode::Or => "Or",
            Opcode::BNegate => "BNegate",
            Opcode::BTAnd => "BTAnd",
            Opcode::BTXor => "BTXor",
            Opcode::Jump => "Jump",
            Opcode::JumpFalse => "JumpFalse",
            Opcode::JumpTrue => "JumpTrue",
            Opcode::JumpPos => "JumpPos",
            Opcode::JumpNeg => "JumpNeg",
            Opcode::JumpFZero => "JumpFZero",
            Opcode::JumpFPos => "JumpFPos",
            Opcode::JumpFNeg => "JumpFNeg",
            Opcode::Halt => "Halt",
            Opcode::LoadI => "LoadI",
            Opcode::LoadF => "LoadF",
            Opcode::LoadC => "LoadC",
            Opcode::StoreI => "StoreI",
            Opcode::StoreF => "StoreF",
            Opcode::StoreC => "StoreC",
            Opcode::Printf => "Printf",
        }
    }

    /// Label-defining directives render at column 0.
    pub fn is_label(&self) -> bool {
        matches!(self, Opcode::Label | Opcode::DLabel)
    }

    pub fn is_division(&self) -> bool {
        matches!(self, Opcode::Divide | Opcode::FDivide)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    None,
    Int(i32),
    Float(f64),
    Label(String),
    Str(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(n) => write!(f, "{}", n),
            Operand::Float(x) => write!(f, "{:?}", x),
            Operand::Label(name) => f.write_str(name),
            Operand::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c if c.is_control() => write!(f, "\\x{:02x}", c as u32)?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// One line of ASMEmu assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Operand,
    pub comment: Option<String>,
}

impl Instruction {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            operand: Operand::None,
            comment: None,
        }
    }

    pub fn int(opcode: Opcode, value: i32) -> Self {
        Self {
            operand: Operand::Int(value),
            ..Self::new(opcode)
        }
    }

    pub fn float(opcode: Opcode, value: f64) -> Self {
        Self {
            operand: Operand::Float(value),
            ..Self::new(opcode)
        }
    }

    pub fn label(opcode: Opcode, name: impl Into<String>) -> Self {
        Self {
            operand: Operand::Label(name.into()),
            ..Self::new(opcode)
        }
    }

    pub fn string(opcode: Opcode, text: impl Into<String>) -> Self {
        Self {
            operand: Operand::Str(text.into()),
            ..Self::new(opcode)
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Render as one assembly line. Labels sit at column 0, everything
    /// else is indented with the opcode padded to a fixed width.
    pub fn render(&self, emit_comments: bool) -> String {
        let mut line = if self.opcode.is_label() {
            format!("{} {}", self.opcode, self.operand)
        } else if self.operand == Operand::None {
            format!("        {}", self.opcode)
        } else {
            format!("        {:<13}{}", self.opcode.as_str(), self.operand)
        };
        if emit_comments {
            if let Some(comment) = &self.comment {
                line.push_str(" %% ");
                line.push_str(comment);
            }
        }
        line
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// Render a whole instruction stream, one instruction per line.
pub fn render_program(instructions: &[Instruction], emit_comments: bool) -> String {
    let mut out = String::new();
    for instruction in instructions {
        out.push_str(&instruction.render(emit_comments));
        out.push('\n');
    }
    out
}
