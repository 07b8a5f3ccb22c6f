use std::path::{Path, PathBuf};

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::syntax::lexer::MAX_IDENTIFIER_LENGTH;

/// Name of the optional project file, looked up from the input's directory
/// upward.
pub const PROJECT_FILE: &str = "pika.toml";

/// Knobs for one compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub max_identifier_length: usize,
    /// Emit `%%` comments after instructions that carry one.
    pub emit_comments: bool,
    /// Extension of the generated assembly file.
    pub output_extension: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_identifier_length: MAX_IDENTIFIER_LENGTH,
            emit_comments: true,
            output_extension: "asm".to_string(),
        }
    }
}

impl CompileOptions {
    /// Load options from a pika.toml file. Missing keys keep their defaults.
    /// Unknown keys come back as warnings.
    pub fn load(toml_path: &Path) -> Result<(CompileOptions, Vec<Diagnostic>), Diagnostic> {
        let content = std::fs::read_to_string(toml_path).map_err(|e| {
            Diagnostic::error(
                format!("cannot read '{}': {}", toml_path.display(), e),
                Span::dummy(),
            )
        })?;
        Self::parse(&content, &toml_path.display().to_string())
    }

    /// Parse the `[compiler]` section of a project file. Other sections are
    /// ignored.
    pub fn parse(
        content: &str,
        origin: &str,
    ) -> Result<(CompileOptions, Vec<Diagnostic>), Diagnostic> {
        let mut options = CompileOptions::default();
        let mut warnings = Vec::new();
        let mut current_section = String::new();

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with('#') || trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            if current_section != "compiler" {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(malformed(origin, index, "expected `key = value`"));
            };
            let key = key.trim().trim_matches('"');
            let value = value.trim();

            match key {
                "max_identifier_length" => {
                    options.max_identifier_length = match value.parse::<usize>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(malformed(
                                origin,
                                index,
                                "`max_identifier_length` must be a positive integer",
                            ))
                        }
                    };
                }
                "emit_comments" => {
                    options.emit_comments = match value {
                        "true" => true,
                        "false" => false,
                        _ => {
                            return Err(malformed(
                                origin,
                                index,
                                "`emit_comments` must be `true` or `false`",
                            ))
                        }
                    };
                }
                "output_extension" => {
                    let ext = value.trim_matches('"').trim_start_matches('.');
                    if ext.is_empty() || !value.starts_with('"') {
                        return Err(malformed(
                            origin,
                            index,
                            "`output_extension` must be a non-empty quoted string",
                        ));
                    }
                    options.output_extension = ext.to_string();
                }
                other => {
                    warnings.push(
                        Diagnostic::warning(
                            format!(
                                "unknown compiler option `{}` in {} at line {}",
                                other,
                                origin,
                                index + 1
                            ),
                            Span::dummy(),
                        )
                        .with_help(
                            "known options: max_identifier_length, emit_comments, output_extension"
                                .to_string(),
                        ),
                    );
                }
            }
        }

        Ok((options, warnings))
    }

    /// Try to find a pika.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(PROJECT_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Options for compiling `input`: the nearest project file if there is
    /// one, defaults otherwise.
    pub fn for_input(input: &Path) -> Result<(CompileOptions, Vec<Diagnostic>), Diagnostic> {
        let start = input.parent().unwrap_or(Path::new("."));
        match Self::find(start) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using project file");
                Self::load(&path)
            }
            None => Ok((CompileOptions::default(), Vec::new())),
        }
    }

    /// Default output path: the input with the configured extension.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.output_extension)
    }
}

fn malformed(origin: &str, index: usize, what: &str) -> Diagnostic {
    Diagnostic::error(
        format!("malformed {} at line {}: {}", origin, index + 1, what),
        Span::dummy(),
    )
}
