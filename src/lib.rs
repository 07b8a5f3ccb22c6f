pub mod api;
pub mod ast;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod semantic;
pub mod span;
pub mod syntax;
pub mod types;

// Re-exports: short paths for the CLI, tests and benches
pub use syntax::lexeme;
pub use syntax::lexer;
pub use syntax::parser;

pub use api::*;
pub use config::CompileOptions;
