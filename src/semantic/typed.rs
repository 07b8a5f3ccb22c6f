//! Type-annotated tree handed to the code generator.

use crate::ast::{BinOp, UnOp};
use crate::semantic::scope::Binding;
use crate::semantic::signatures::Signature;
use crate::span::{Span, Spanned};
use crate::types::Ty;

#[derive(Clone, Debug)]
pub struct TypedProgram {
    pub body: TypedBlock,
    /// Bytes reserved for the global memory block.
    pub global_size: u32,
}

#[derive(Clone, Debug, Default)]
pub struct TypedBlock {
    pub statements: Vec<Spanned<TypedStmt>>,
}

#[derive(Clone, Debug)]
pub enum TypedStmt {
    Declaration {
        binding: Binding,
        value: TypedExpr,
    },
    Assignment {
        binding: Binding,
        value: TypedExpr,
        signature: Signature,
    },
    Print {
        items: Vec<TypedPrintItem>,
    },
    Block(TypedBlock),
}

#[derive(Clone, Debug)]
pub enum TypedPrintItem {
    Value(TypedExpr),
    Newline,
    Tab,
    Space,
}

#[derive(Clone, Debug)]
pub struct TypedExpr {
    pub kind: ExprKind,
    pub ty: Ty,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    IntConst(i32),
    FloatConst(f64),
    BoolConst(bool),
    CharConst(u8),
    StrConst {
        value: String,
        /// Name of the variable this literal initializes, used to make the
        /// data label readable.
        name: Option<String>,
    },
    Identifier(Binding),
    Binary {
        op: BinOp,
        lhs: Box<TypedExpr>,
        rhs: Box<TypedExpr>,
        signature: Signature,
    },
    Unary {
        op: UnOp,
        operand: Box<TypedExpr>,
        signature: Signature,
    },
    Cast {
        operand: Box<TypedExpr>,
        target: Ty,
        signature: Signature,
    },
    Error,
}

impl TypedExpr {
    pub fn new(kind: ExprKind, ty: Ty, span: Span) -> Self {
        Self { kind, ty, span }
    }

    pub fn error(span: Span) -> Self {
        Self::new(ExprKind::Error, Ty::Error, span)
    }

    /// Short description for internal error messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            ExprKind::IntConst(n) => format!("integer constant {}", n),
            ExprKind::FloatConst(x) => format!("floating constant {:?}", x),
            ExprKind::BoolConst(b) => format!("boolean constant {}", b),
            ExprKind::CharConst(c) => format!("character constant ^{}^", *c as char),
            ExprKind::StrConst { .. } => "string constant".to_string(),
            ExprKind::Identifier(binding) => format!("identifier '{}'", binding.name()),
            ExprKind::Binary { op, .. } => format!("operator {}", op),
            ExprKind::Unary { op, .. } => format!("operator {}", op.as_str()),
            ExprKind::Cast { target, .. } => format!("cast to {}", target),
            ExprKind::Error => "error node".to_string(),
        }
    }
}
