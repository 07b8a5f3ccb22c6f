use crate::codegen::fragment::Shape;
use crate::span::Span;
use crate::types::Ty;

/// Internal-consistency failures during lowering. A well-typed tree never
/// produces one; each names the offending node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodegenError {
    #[error("{node} at {span} has no resolved signature")]
    NullSignature { node: String, span: Span },

    #[error("{node} at {span}: no load instruction for type {ty}")]
    UnloadableType { ty: Ty, node: String, span: Span },

    #[error("{node} at {span}: expected {expected} fragment, found {found}")]
    ShapeMismatch {
        expected: Shape,
        found: Shape,
        node: String,
        span: Span,
    },

    #[error("error node at {span} reached code generation")]
    ErrorNode { span: Span },

    #[error("{node} at {span}: unexpected type {ty}")]
    UnexpectedType { ty: Ty, node: String, span: Span },
}

impl CodegenError {
    pub fn span(&self) -> Span {
        match self {
            CodegenError::NullSignature { span, .. }
            | CodegenError::UnloadableType { span, .. }
            | CodegenError::ShapeMismatch { span, .. }
            | CodegenError::ErrorNode { span }
            | CodegenError::UnexpectedType { span, .. } => *span,
        }
    }

    /// Attach the node being lowered to an error raised by a helper that
    /// only saw fragments.
    pub fn at(self, what: &str, at: Span) -> Self {
        match self {
            CodegenError::NullSignature { .. } => CodegenError::NullSignature {
                node: what.to_string(),
                span: at,
            },
            CodegenError::UnloadableType { ty, .. } => CodegenError::UnloadableType {
                ty,
                node: what.to_string(),
                span: at,
            },
            CodegenError::ShapeMismatch {
                expected, found, ..
            } => CodegenError::ShapeMismatch {
                expected,
                found,
                node: what.to_string(),
                span: at,
            },
            CodegenError::ErrorNode { .. } => CodegenError::ErrorNode { span: at },
            CodegenError::UnexpectedType { ty, .. } => CodegenError::UnexpectedType {
                ty,
                node: what.to_string(),
                span: at,
            },
        }
    }
}
