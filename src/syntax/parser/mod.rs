mod expr;

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};
use crate::syntax::lexeme::Lexeme;

const MAX_NESTING_DEPTH: u32 = 256;

pub struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        let mut tokens = tokens;
        if tokens.last().map(|t| &t.node) != Some(&Lexeme::Eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Spanned::new(Lexeme::Eof, Span::new(end, end)));
        }
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_with_help(
                "nesting depth exceeded (maximum 256 levels)",
                "split deeply nested blocks or expressions into separate statements",
            );
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    pub fn parse_program(mut self) -> Result<Program, Vec<Diagnostic>> {
        if !self.at(&Lexeme::Exec) {
            self.error_with_help(
                "expected 'exec' at the start of the program",
                "every .pika program is a single `exec { ... }` block",
            );
            return Err(self.diagnostics);
        }
        self.advance();
        let body = self.parse_block();

        if !self.at(&Lexeme::Eof) {
            self.error_at_current(&format!(
                "expected end of file after the main block, found {}",
                self.peek().description()
            ));
        }

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        tracing::debug!(statements = body.node.statements.len(), "parsed program");
        Ok(Program { body })
    }

    fn parse_block(&mut self) -> Spanned<Block> {
        let start = self.current_span();
        self.expect(&Lexeme::LBrace);
        if !self.enter_nesting() {
            self.exit_nesting();
            return Spanned::new(Block::default(), start);
        }

        let mut statements = Vec::new();
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            if let Some(stmt) = self.parse_stmt() {
                statements.push(stmt);
            }
        }
        self.expect(&Lexeme::RBrace);
        self.exit_nesting();

        let span = start.merge(self.prev_span());
        Spanned::new(Block { statements }, span)
    }

    fn parse_stmt(&mut self) -> Option<Spanned<Stmt>> {
        let start = self.current_span();
        let stmt = match self.peek() {
            Lexeme::Const | Lexeme::Var => self.parse_declaration(),
            Lexeme::Ident(_) => self.parse_assignment(),
            Lexeme::Print => self.parse_print(),
            Lexeme::LBrace => Stmt::Block(self.parse_block().node),
            _ => {
                self.error_with_help(
                    &format!("expected statement, found {}", self.peek().description()),
                    "statements start with `const`, `var`, `print`, a name or `{`",
                );
                self.advance();
                return None;
            }
        };
        let span = start.merge(self.prev_span());
        Some(Spanned::new(stmt, span))
    }

    fn parse_declaration(&mut self) -> Stmt {
        let mutable = self.advance().node == Lexeme::Var;
        let name = self.expect_ident();
        self.expect(&Lexeme::Assign);
        let value = self.parse_expr();
        self.expect(&Lexeme::Dot);
        Stmt::Declaration {
            mutable,
            name,
            value,
        }
    }

    fn parse_assignment(&mut self) -> Stmt {
        let target = self.expect_ident();
        self.expect(&Lexeme::Assign);
        let value = self.parse_expr();
        self.expect(&Lexeme::Dot);
        Stmt::Assignment { target, value }
    }

    fn parse_print(&mut self) -> Stmt {
        self.expect(&Lexeme::Print);
        let mut items = Vec::new();
        loop {
            let span = self.current_span();
            match self.peek() {
                Lexeme::Dot | Lexeme::Eof => break,
                Lexeme::Newline => {
                    self.advance();
                    items.push(Spanned::new(PrintItem::Newline, span));
                }
                Lexeme::Tab => {
                    self.advance();
                    items.push(Spanned::new(PrintItem::Tab, span));
                }
                Lexeme::Semicolon => {
                    self.advance();
                    items.push(Spanned::new(PrintItem::Space, span));
                }
                Lexeme::Comma => {
                    self.advance();
                }
                _ => {
                    let before = self.pos;
                    let expr = self.parse_expr();
                    let span = expr.span;
                    items.push(Spanned::new(PrintItem::Expr(expr), span));
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }
        self.expect(&Lexeme::Dot);
        Stmt::Print { items }
    }

    // --- Token helpers ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let tok = &self.tokens[self.pos];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    fn expect_ident(&mut self) -> Spanned<String> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Spanned::new(name, span)
        } else {
            self.error_at_current(&format!(
                "expected identifier, found {}",
                self.peek().description()
            ));
            Spanned::new("_error_".to_string(), self.current_span())
        }
    }

    fn error_at_current(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}
