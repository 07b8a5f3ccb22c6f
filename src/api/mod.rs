use crate::codegen::{self, render_program, CodegenError};
use crate::config::CompileOptions;
use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::semantic::signatures::SignatureRegistry;
use crate::semantic::typed::TypedProgram;
use crate::semantic::analyze;
use crate::syntax::parse_source;


/// Why a compilation produced no assembly.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The program was rejected; the diagnostics say why.
    #[error("compilation failed with {} error(s)", .0.iter().filter(|d| d.is_error()).count())]
    Rejected(Vec<Diagnostic>),
    /// A checked program could not be lowered. Always a compiler bug.
    #[error("internal compiler error: {0}")]
    Internal(#[from] CodegenError),
}

impl CompileError {
    /// Flatten into diagnostics, turning an internal failure into one
    /// error at the offending node.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            CompileError::Rejected(diagnostics) => diagnostics,
            CompileError::Internal(err) => {
                let span = err.span();
                vec![Diagnostic::error(format!("internal compiler error: {}", err), span)
                    .with_note("the program type-checked but could not be lowered".to_string())]
            }
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal(_))
    }
}

/// Compile a Pika source string to ASMEmu assembly, printing diagnostics.
pub fn compile(source: &str, filename: &str) -> Result<String, Vec<Diagnostic>> {
    compile_with_options(source, filename, &CompileOptions::default())
}

/// Compile a Pika source string to ASMEmu assembly with options, printing
/// diagnostics.
pub fn compile_with_options(
    source: &str,
    filename: &str,
    options: &CompileOptions,
) -> Result<String, Vec<Diagnostic>> {
    compile_silent(source, options).map_err(|err| {
        let diagnostics = err.into_diagnostics();
        render_diagnostics(&diagnostics, filename, source);
        diagnostics
    })
}

/// Compile without printing anything; the caller decides how to report.
pub fn compile_silent(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let registry = SignatureRegistry::new();
    let program = analyze_source(source, options, &registry).map_err(CompileError::Rejected)?;
    let instructions = codegen::generate(&program)?;
    tracing::info!(instructions = instructions.len(), "generated assembly");
    Ok(render_program(&instructions, options.emit_comments))
}

/// Lex, parse and analyze only, printing diagnostics.
pub fn check(source: &str, filename: &str) -> Result<(), Vec<Diagnostic>> {
    check_with_options(source, filename, &CompileOptions::default())
}

pub fn check_with_options(
    source: &str,
    filename: &str,
    options: &CompileOptions,
) -> Result<(), Vec<Diagnostic>> {
    let registry = SignatureRegistry::new();
    match analyze_source(source, options, &registry) {
        Ok(_) => Ok(()),
        Err(errors) => {
            render_diagnostics(&errors, filename, source);
            Err(errors)
        }
    }
}

/// Front half of the pipeline: source to typed tree.
pub fn analyze_source(
    source: &str,
    options: &CompileOptions,
    registry: &SignatureRegistry,
) -> Result<TypedProgram, Vec<Diagnostic>> {
    let program = parse_source(source, options.max_identifier_length)?;
    analyze(&program, registry)
}
