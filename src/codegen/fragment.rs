use std::fmt;

use crate::codegen::error::CodegenError;
use crate::codegen::opcode::{Instruction, Opcode};
use crate::span::Span;
use crate::types::Ty;

/// Stack effect a fragment guarantees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Net stack effect zero.
    Void,
    /// Leaves one address.
    Address,
    /// Leaves one value of the node's type.
    Value,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Void => write!(f, "void"),
            Shape::Address => write!(f, "address"),
            Shape::Value => write!(f, "value"),
        }
    }
}

/// A shaped run of instructions produced for one tree node. Fragments are
/// moved into their parent; nothing holds on to a consumed fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeFragment {
    shape: Shape,
    instructions: Vec<Instruction>,
}

impl CodeFragment {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            instructions: Vec::new(),
        }
    }

    pub fn void() -> Self {
        Self::new(Shape::Void)
    }

    pub fn address() -> Self {
        Self::new(Shape::Address)
    }

    pub fn value() -> Self {
        Self::new(Shape::Value)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn is_void(&self) -> bool {
        self.shape == Shape::Void
    }

    pub fn is_address(&self) -> bool {
        self.shape == Shape::Address
    }

    pub fn is_value(&self) -> bool {
        self.shape == Shape::Value
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn add(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Splice a strategy's output in place.
    pub fn add_chunk(&mut self, chunk: Vec<Instruction>) {
        self.instructions.extend(chunk);
    }

    /// Concatenate `other` after this fragment. A void fragment cannot be
    /// spliced into one that produces something, and an address must be
    /// loaded with [`value_of`] before it joins a value.
    pub fn append(&mut self, other: CodeFragment) -> Result<(), CodegenError> {
        let void_into_result = other.is_void() && !self.is_void();
        let address_into_value = other.is_address() && self.is_value();
        if void_into_result || address_into_value {
            return Err(CodegenError::ShapeMismatch {
                expected: self.shape,
                found: other.shape,
                node: "fragment append".to_string(),
                span: Span::dummy(),
            });
        }
        self.instructions.extend(other.instructions);
        Ok(())
    }

    pub fn mark_as_value(&mut self) {
        self.shape = Shape::Value;
    }
}

/// Turn an address fragment into a value fragment by appending the load
/// for `ty`.
pub fn value_of(mut fragment: CodeFragment, ty: Ty) -> Result<CodeFragment, CodegenError> {
    if !fragment.is_address() {
        return Err(CodegenError::ShapeMismatch {
            expected: Shape::Address,
            found: fragment.shape,
            node: "value conversion".to_string(),
            span: Span::dummy(),
        });
    }
    let load = load_opcode(ty).ok_or_else(|| CodegenError::UnloadableType {
        ty,
        node: "value conversion".to_string(),
        span: Span::dummy(),
    })?;
    fragment.add(Instruction::new(load));
    fragment.mark_as_value();
    Ok(fragment)
}

/// Load instruction for a value of type `ty` sitting at an address.
pub fn load_opcode(ty: Ty) -> Option<Opcode> {
    match ty {
        Ty::Integer | Ty::String => Some(Opcode::LoadI),
        Ty::Floating => Some(Opcode::LoadF),
        Ty::Boolean | Ty::Character => Some(Opcode::LoadC),
        Ty::Error | Ty::NoType => None,
    }
}

/// Store instruction for a value of type `ty`; expects `[address, value]`.
pub fn store_opcode(ty: Ty) -> Option<Opcode> {
    match ty {
        Ty::Integer | Ty::String => Some(Opcode::StoreI),
        Ty::Floating => Some(Opcode::StoreF),
        Ty::Boolean | Ty::Character => Some(Opcode::StoreC),
        Ty::Error | Ty::NoType => None,
    }
}
