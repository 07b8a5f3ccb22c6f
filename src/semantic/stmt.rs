use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::Spanned;

use super::signatures::OperatorKey;
use super::typed::{ExprKind, TypedBlock, TypedPrintItem, TypedStmt};
use super::Analyzer;

impl Analyzer<'_> {
    pub(super) fn analyze_statements(&mut self, statements: &[Spanned<Stmt>]) -> TypedBlock {
        let mut out = Vec::with_capacity(statements.len());
        for stmt in statements {
            if let Some(typed) = self.analyze_stmt(stmt) {
                out.push(Spanned::new(typed, stmt.span));
            }
        }
        TypedBlock { statements: out }
    }

    fn analyze_stmt(&mut self, stmt: &Spanned<Stmt>) -> Option<TypedStmt> {
        match &stmt.node {
            Stmt::Declaration {
                mutable,
                name,
                value,
            } => self.analyze_declaration(*mutable, name, value),
            Stmt::Assignment { target, value } => self.analyze_assignment(target, value),
            Stmt::Print { items } => Some(self.analyze_print(items)),
            Stmt::Block(block) => {
                self.scopes.enter();
                let typed = self.analyze_statements(&block.statements);
                self.scopes.leave();
                Some(TypedStmt::Block(typed))
            }
        }
    }

    fn analyze_declaration(
        &mut self,
        mutable: bool,
        name: &Spanned<String>,
        value: &Spanned<Expr>,
    ) -> Option<TypedStmt> {
        let mut value = self.analyze_expr(value);
        if let ExprKind::StrConst { name: hint, .. } = &mut value.kind {
            *hint = Some(name.node.clone());
        }

        match self.scopes.declare(&name.node, value.ty, mutable) {
            Ok(binding) => Some(TypedStmt::Declaration { binding, value }),
            Err(existing) => {
                let kind = if existing.is_mutable() { "var" } else { "const" };
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("'{}' is already declared in this scope", name.node),
                        name.span,
                    )
                    .with_note(format!(
                        "earlier declaration: {} {} of type {}",
                        kind,
                        existing.name(),
                        existing.ty()
                    ))
                    .with_help(
                        "open a nested block to shadow it, or pick another name".to_string(),
                    ),
                );
                None
            }
        }
    }

    fn analyze_assignment(
        &mut self,
        target: &Spanned<String>,
        value: &Spanned<Expr>,
    ) -> Option<TypedStmt> {
        let value = self.analyze_expr(value);
        let Some(binding) = self.scopes.lookup(&target.node).cloned() else {
            self.error(
                format!("undefined identifier '{}'", target.node),
                target.span,
            );
            return None;
        };

        if !binding.is_mutable() {
            self.diagnostics.push(
                Diagnostic::error(
                    format!("cannot assign to constant '{}'", target.node),
                    target.span,
                )
                .with_help(format!(
                    "declare it with `var {} := ...` to make it assignable",
                    target.node
                )),
            );
            return None;
        }

        if binding.ty().is_error() || value.ty.is_error() {
            return None;
        }

        let operands = [binding.ty(), value.ty];
        let signature = self.registry.resolve(OperatorKey::Assign, &operands).clone();
        if signature.is_null() {
            self.diagnostics.push(
                Diagnostic::error(
                    format!(
                        "cannot assign a value of type {} to '{}' of type {}",
                        value.ty,
                        target.node,
                        binding.ty()
                    ),
                    value.span,
                )
                .with_help(format!("convert it with `[... | {}]`", binding.ty())),
            );
            return None;
        }

        Some(TypedStmt::Assignment {
            binding,
            value,
            signature,
        })
    }

    fn analyze_print(&mut self, items: &[Spanned<PrintItem>]) -> TypedStmt {
        let items = items
            .iter()
            .map(|item| match &item.node {
                PrintItem::Expr(expr) => TypedPrintItem::Value(self.analyze_expr(expr)),
                PrintItem::Newline => TypedPrintItem::Newline,
                PrintItem::Tab => TypedPrintItem::Tab,
                PrintItem::Space => TypedPrintItem::Space,
            })
            .collect();
        TypedStmt::Print { items }
    }
}
