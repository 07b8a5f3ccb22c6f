pub mod lexeme;
pub mod lexer;
pub mod parser;

use crate::ast::Program;
use crate::diagnostic::Diagnostic;
use lexer::Lexer;
use parser::Parser;

/// Lex and parse a whole program. Lexical errors stop before parsing.
pub fn parse_source(
    source: &str,
    max_identifier_length: usize,
) -> Result<Program, Vec<Diagnostic>> {
    let (tokens, lex_errors) = Lexer::new(source)
        .with_max_identifier_length(max_identifier_length)
        .tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    Parser::new(tokens).parse_program()
}
