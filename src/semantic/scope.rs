use std::collections::BTreeMap;

use crate::codegen::fragment::CodeFragment;
use crate::codegen::opcode::{Instruction, Opcode};
use crate::codegen::runtime::GLOBAL_MEMORY_BLOCK;
use crate::types::Ty;

/// A declared name and the storage backing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    name: String,
    ty: Ty,
    mutable: bool,
    offset: u32,
}

impl Binding {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> Ty {
        self.ty
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Byte offset inside the global memory block.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Append code leaving this variable's address on the stack.
    pub fn generate_address(&self, code: &mut CodeFragment) {
        code.add(Instruction::label(Opcode::PushD, GLOBAL_MEMORY_BLOCK).with_comment(&self.name));
        code.add(Instruction::int(Opcode::PushI, self.offset as i32));
        code.add(Instruction::new(Opcode::Add));
    }
}

struct Scope {
    bindings: BTreeMap<String, Binding>,
    /// Allocation offset when the scope was opened.
    base: u32,
}

/// Nested scopes sharing one positive-growing allocator over the global
/// memory block. Leaving a scope releases its storage; the block size is
/// the high-water mark.
pub struct ScopeStack {
    program: Scope,
    nested: Vec<Scope>,
    next_offset: u32,
    high_water: u32,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the program scope.
    pub fn new() -> Self {
        Self {
            program: Scope {
                bindings: BTreeMap::new(),
                base: 0,
            },
            nested: Vec::new(),
            next_offset: 0,
            high_water: 0,
        }
    }

    pub fn enter(&mut self) {
        self.nested.push(Scope {
            bindings: BTreeMap::new(),
            base: self.next_offset,
        });
    }

    /// Close the innermost subscope. The program scope is never popped.
    pub fn leave(&mut self) {
        if let Some(scope) = self.nested.pop() {
            self.next_offset = scope.base;
        }
    }

    pub fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    /// Bind `name` in the innermost scope. Returns the existing binding if
    /// the name is already declared there.
    pub fn declare(&mut self, name: &str, ty: Ty, mutable: bool) -> Result<Binding, Binding> {
        let offset = self.next_offset;
        let scope = match self.nested.last_mut() {
            Some(scope) => scope,
            None => &mut self.program,
        };
        if let Some(existing) = scope.bindings.get(name) {
            return Err(existing.clone());
        }
        let binding = Binding {
            name: name.to_string(),
            ty,
            mutable,
            offset,
        };
        scope.bindings.insert(name.to_string(), binding.clone());
        self.next_offset += ty.size();
        self.high_water = self.high_water.max(self.next_offset);
        Ok(binding)
    }

    /// Innermost binding of `name`, searching outward.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.nested
            .iter()
            .rev()
            .chain(std::iter::once(&self.program))
            .find_map(|scope| scope.bindings.get(name))
    }

    /// Bytes the global memory block must reserve.
    pub fn allocated_size(&self) -> u32 {
        self.high_water
    }
}
