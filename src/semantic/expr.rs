use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};
use crate::types::{display_types, Ty};

use super::signatures::{OperatorKey, Signature};
use super::typed::{ExprKind, TypedExpr};
use super::Analyzer;

impl Analyzer<'_> {
    pub(super) fn analyze_expr(&mut self, expr: &Spanned<Expr>) -> TypedExpr {
        let span = expr.span;
        match &expr.node {
            Expr::Literal(lit) => literal(lit, span),
            Expr::Var(name) => match self.scopes.lookup(name) {
                Some(binding) => {
                    let ty = binding.ty();
                    TypedExpr::new(ExprKind::Identifier(binding.clone()), ty, span)
                }
                None => {
                    self.error(format!("undefined identifier '{}'", name), span);
                    TypedExpr::error(span)
                }
            },
            Expr::BinOp { op, lhs, rhs } => {
                let lhs = self.analyze_expr(lhs);
                let rhs = self.analyze_expr(rhs);
                let key = OperatorKey::for_binary(*op);
                match self.resolve_operator(key, &[lhs.ty, rhs.ty], span) {
                    Some(signature) => {
                        let ty = signature.result();
                        TypedExpr::new(
                            ExprKind::Binary {
                                op: *op,
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                                signature,
                            },
                            ty,
                            span,
                        )
                    }
                    None => TypedExpr::error(span),
                }
            }
            Expr::UnOp { op, operand } => {
                let operand = self.analyze_expr(operand);
                let key = OperatorKey::for_unary(*op);
                match self.resolve_operator(key, &[operand.ty], span) {
                    Some(signature) => {
                        let ty = signature.result();
                        TypedExpr::new(
                            ExprKind::Unary {
                                op: *op,
                                operand: Box::new(operand),
                                signature,
                            },
                            ty,
                            span,
                        )
                    }
                    None => TypedExpr::error(span),
                }
            }
            Expr::Cast { operand, target } => {
                let operand = self.analyze_expr(operand);
                if operand.ty.is_error() || target.node.is_error() {
                    return TypedExpr::error(span);
                }
                let types = [operand.ty, target.node];
                let signature = self.registry.resolve(OperatorKey::Cast, &types).clone();
                if signature.is_null() {
                    let targets = self.cast_targets(operand.ty);
                    self.diagnostics.push(
                        Diagnostic::error(
                            format!("cannot cast {} to {}", operand.ty, target.node),
                            span,
                        )
                        .with_note(format!("{} converts to: {}", operand.ty, targets)),
                    );
                    return TypedExpr::error(span);
                }
                let ty = signature.result();
                TypedExpr::new(
                    ExprKind::Cast {
                        operand: Box::new(operand),
                        target: target.node,
                        signature,
                    },
                    ty,
                    span,
                )
            }
            Expr::Error => TypedExpr::error(span),
        }
    }

    /// Resolve an operator; report a type error when nothing accepts the
    /// operands. Operands that already failed are not reported again.
    fn resolve_operator(
        &mut self,
        key: OperatorKey,
        types: &[Ty],
        span: Span,
    ) -> Option<Signature> {
        if types.iter().any(|t| t.is_error()) {
            return None;
        }
        let signature = self.registry.resolve(key, types);
        if !signature.is_null() {
            return Some(signature.clone());
        }

        let accepted: Vec<String> = self
            .registry
            .signatures_of(key)
            .iter()
            .map(|sig| display_types(sig.params()))
            .collect();
        self.diagnostics.push(
            Diagnostic::error(
                format!(
                    "operator {} not defined for types {}",
                    key.symbol(),
                    display_types(types)
                ),
                span,
            )
            .with_note(format!("accepted operand types: {}", accepted.join(", "))),
        );
        None
    }

    fn cast_targets(&self, from: Ty) -> String {
        let targets: Vec<&str> = self
            .registry
            .signatures_of(OperatorKey::Cast)
            .iter()
            .filter(|sig| sig.params().first() == Some(&from))
            .filter_map(|sig| sig.params().get(1).map(|t| t.keyword()))
            .collect();
        targets.join(", ")
    }
}

fn literal(lit: &Literal, span: Span) -> TypedExpr {
    let (kind, ty) = match lit {
        Literal::Integer(n) => (ExprKind::IntConst(*n), Ty::Integer),
        Literal::Floating(x) => (ExprKind::FloatConst(*x), Ty::Floating),
        Literal::Boolean(b) => (ExprKind::BoolConst(*b), Ty::Boolean),
        Literal::Character(c) => (ExprKind::CharConst(*c), Ty::Character),
        Literal::Str(s) => (
            ExprKind::StrConst {
                value: s.clone(),
                name: None,
            },
            Ty::String,
        ),
    };
    TypedExpr::new(kind, ty, span)
}
