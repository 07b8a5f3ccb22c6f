use std::fmt;

use crate::span::Spanned;
use crate::types::Ty;

/// A parsed `.pika` program: `exec { ... }`.
#[derive(Clone, Debug)]
pub struct Program {
    pub body: Spanned<Block>,
}

#[derive(Clone, Debug, Default)]
pub struct Block {
    pub statements: Vec<Spanned<Stmt>>,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    /// `const x := e.` or `var x := e.`
    Declaration {
        mutable: bool,
        name: Spanned<String>,
        value: Spanned<Expr>,
    },
    /// `x := e.`
    Assignment {
        target: Spanned<String>,
        value: Spanned<Expr>,
    },
    /// `print e, _n_ ; e.`
    Print { items: Vec<Spanned<PrintItem>> },
    /// Nested `{ ... }`, opens a subscope.
    Block(Block),
}

#[derive(Clone, Debug)]
pub enum PrintItem {
    Expr(Spanned<Expr>),
    /// `_n_`
    Newline,
    /// `_t_`
    Tab,
    /// `;` separator
    Space,
}

#[derive(Clone, Debug)]
pub enum Expr {
    Literal(Literal),
    Var(String),
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    UnOp {
        op: UnOp,
        operand: Box<Spanned<Expr>>,
    },
    /// `[e | type]`
    Cast {
        operand: Box<Spanned<Expr>>,
        target: Spanned<Ty>,
    },
    /// Placeholder left by syntax error recovery.
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i32),
    Floating(f64),
    Boolean(bool),
    Character(u8),
    Str(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Gt | BinOp::GtEq | BinOp::Lt | BinOp::LtEq | BinOp::Eq | BinOp::NotEq
        )
    }

    /// Short-circuit logical operators.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnOp {
    Not,
}

impl UnOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnOp::Not => "!",
        }
    }
}
