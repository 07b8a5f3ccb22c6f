pub mod build;
pub mod check;
pub mod signatures;

use std::path::{Path, PathBuf};
use std::process;

use pika::CompileOptions;

/// Exit status when the program is rejected or the input is unusable.
pub const EXIT_REJECTED: i32 = 1;
/// Exit status for internal compiler errors.
pub const EXIT_INTERNAL: i32 = 2;

/// A source file read from disk, ready to compile.
pub struct ResolvedInput {
    pub path: PathBuf,
    pub filename: String,
    pub source: String,
    pub options: CompileOptions,
}

/// Read `input` and pick up options from the nearest pika.toml, exiting on
/// any problem.
pub fn resolve_input(input: &Path) -> ResolvedInput {
    if !input.extension().is_some_and(|e| e == "pika") {
        eprintln!("error: input must be a .pika file");
        process::exit(EXIT_REJECTED);
    }

    let source = match std::fs::read_to_string(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", input.display(), e);
            process::exit(EXIT_REJECTED);
        }
    };

    let options = match CompileOptions::for_input(input) {
        Ok((options, warnings)) => {
            for warning in &warnings {
                eprintln!("warning: {}", warning.message);
                if let Some(help) = &warning.help {
                    eprintln!("  help: {}", help);
                }
            }
            options
        }
        Err(e) => {
            eprintln!("error: {}", e.message);
            process::exit(EXIT_REJECTED);
        }
    };

    ResolvedInput {
        path: input.to_path_buf(),
        filename: input.to_string_lossy().to_string(),
        source,
        options,
    }
}
