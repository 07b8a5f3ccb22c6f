mod expr;
pub mod scope;
pub mod signatures;
mod stmt;
pub mod typed;

use crate::ast::Program;
use crate::diagnostic::Diagnostic;
use crate::span::Span;

use scope::ScopeStack;
use signatures::SignatureRegistry;
use typed::TypedProgram;

/// Resolves names, types and operator signatures, producing the typed tree.
pub struct Analyzer<'r> {
    registry: &'r SignatureRegistry,
    scopes: ScopeStack,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> Analyzer<'r> {
    pub fn new(registry: &'r SignatureRegistry) -> Self {
        Self {
            registry,
            scopes: ScopeStack::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Analyze a whole program. Any error diagnostic aborts.
    pub fn analyze_program(mut self, program: &Program) -> Result<TypedProgram, Vec<Diagnostic>> {
        // The main block lives directly in the program scope.
        let body = self.analyze_statements(&program.body.node.statements);
        let global_size = self.scopes.allocated_size();

        if self.diagnostics.iter().any(|d| d.is_error()) {
            return Err(self.diagnostics);
        }
        tracing::debug!(global_size, "analyzed program");
        Ok(TypedProgram { body, global_size })
    }

    fn error(&mut self, msg: String, span: Span) {
        self.diagnostics.push(Diagnostic::error(msg, span));
    }
}

/// Convenience wrapper: analyze `program` against `registry`.
pub fn analyze(
    program: &Program,
    registry: &SignatureRegistry,
) -> Result<TypedProgram, Vec<Diagnostic>> {
    Analyzer::new(registry).analyze_program(program)
}
