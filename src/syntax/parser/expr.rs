use crate::ast::*;
use crate::span::{Span, Spanned};
use crate::syntax::lexeme::Lexeme;
use crate::types::Ty;

use super::Parser;

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Spanned<Expr> {
        self.parse_expr_bp(0)
    }

    /// Each operator in a left-associative chain is one level of tree
    /// depth, so chains count against the nesting guard like parentheses.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Spanned<Expr> {
        let mut lhs = self.parse_unary();
        let mut levels = 0;

        loop {
            let op = match self.peek() {
                Lexeme::OrOr => BinOp::Or,
                Lexeme::AndAnd => BinOp::And,
                Lexeme::Gt => BinOp::Gt,
                Lexeme::GtEq => BinOp::GtEq,
                Lexeme::Lt => BinOp::Lt,
                Lexeme::LtEq => BinOp::LtEq,
                Lexeme::EqEq => BinOp::Eq,
                Lexeme::NotEq => BinOp::NotEq,
                Lexeme::Plus => BinOp::Add,
                Lexeme::Minus => BinOp::Sub,
                Lexeme::Star => BinOp::Mul,
                Lexeme::Slash => BinOp::Div,
                _ => break,
            };

            let (l_bp, r_bp) = op_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            self.advance(); // consume operator
            if !self.enter_nesting() {
                self.depth -= levels + 1;
                let span = lhs.span.merge(self.skip_expression());
                return Spanned::new(Expr::Error, span);
            }
            levels += 1;
            let rhs = self.parse_expr_bp(r_bp);
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        self.depth -= levels;
        lhs
    }

    /// Skip the rest of an expression that is already in error, up to the
    /// token that ends its statement. Returns the span of the last token
    /// skipped.
    fn skip_expression(&mut self) -> Span {
        while !matches!(self.peek(), Lexeme::Dot | Lexeme::RBrace | Lexeme::Eof) {
            self.advance();
        }
        self.prev_span()
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        if self.at(&Lexeme::Bang) {
            let start = self.current_span();
            self.advance();
            if !self.enter_nesting() {
                self.exit_nesting();
                return Spanned::new(Expr::Error, start);
            }
            let operand = self.parse_unary();
            self.exit_nesting();
            let span = start.merge(operand.span);
            return Spanned::new(
                Expr::UnOp {
                    op: UnOp::Not,
                    operand: Box::new(operand),
                },
                span,
            );
        }
        self.parse_atomic()
    }

    fn parse_atomic(&mut self) -> Spanned<Expr> {
        let start = self.current_span();

        match self.peek().clone() {
            Lexeme::Integer(n) => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Integer(n)), start)
            }
            Lexeme::Floating(x) => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Floating(x)), start)
            }
            Lexeme::Character(c) => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Character(c)), start)
            }
            Lexeme::Str(s) => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Str(s)), start)
            }
            Lexeme::True => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Boolean(true)), start)
            }
            Lexeme::False => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Boolean(false)), start)
            }
            Lexeme::Ident(name) => {
                self.advance();
                Spanned::new(Expr::Var(name), start)
            }
            Lexeme::LParen => {
                self.advance();
                if !self.enter_nesting() {
                    self.exit_nesting();
                    return Spanned::new(Expr::Error, start);
                }
                let inner = self.parse_expr();
                self.exit_nesting();
                self.expect(&Lexeme::RParen);
                Spanned::new(inner.node, start.merge(self.prev_span()))
            }
            Lexeme::LBracket => self.parse_cast(),
            _ => {
                self.error_at_current(&format!(
                    "expected expression, found {}",
                    self.peek().description()
                ));
                Spanned::new(Expr::Error, start)
            }
        }
    }

    /// `[ expr | type ]`
    fn parse_cast(&mut self) -> Spanned<Expr> {
        let start = self.expect(&Lexeme::LBracket);
        if !self.enter_nesting() {
            self.exit_nesting();
            return Spanned::new(Expr::Error, start);
        }
        let operand = self.parse_expr();
        self.exit_nesting();
        self.expect(&Lexeme::Pipe);
        let target = self.parse_type();
        self.expect(&Lexeme::RBracket);
        let span = start.merge(self.prev_span());
        Spanned::new(
            Expr::Cast {
                operand: Box::new(operand),
                target,
            },
            span,
        )
    }

    fn parse_type(&mut self) -> Spanned<Ty> {
        let span = self.current_span();
        let ty = match self.peek() {
            Lexeme::IntTy => Ty::Integer,
            Lexeme::FloatTy => Ty::Floating,
            Lexeme::BoolTy => Ty::Boolean,
            Lexeme::CharTy => Ty::Character,
            Lexeme::StringTy => Ty::String,
            _ => {
                self.error_with_help(
                    &format!("expected type, found {}", self.peek().description()),
                    "types are `int`, `float`, `bool`, `char` and `string`",
                );
                return Spanned::new(Ty::Error, span);
            }
        };
        self.advance();
        Spanned::new(ty, span)
    }
}

/// Returns (left binding power, right binding power) for a binary operator.
/// Every level is left-associative.
fn op_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::Gt | BinOp::GtEq | BinOp::Lt | BinOp::LtEq | BinOp::Eq | BinOp::NotEq => (5, 6),
        BinOp::Add | BinOp::Sub => (7, 8),
        BinOp::Mul | BinOp::Div => (9, 10),
    }
}
