use std::path::PathBuf;
use std::process;

use clap::Args;

use pika::diagnostic::render_diagnostics;

use super::{resolve_input, EXIT_INTERNAL, EXIT_REJECTED};

#[derive(Args)]
pub struct BuildArgs {
    /// Input .pika file
    pub input: PathBuf,
    /// Output assembly file (default: <input>.asm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Leave `%%` comments out of the generated assembly
    #[arg(long)]
    pub no_comments: bool,
}

pub fn cmd_build(args: BuildArgs) {
    let BuildArgs {
        input,
        output,
        no_comments,
    } = args;
    let mut ri = resolve_input(&input);
    if no_comments {
        ri.options.emit_comments = false;
    }

    let asm = match pika::compile_silent(&ri.source, &ri.options) {
        Ok(asm) => asm,
        Err(err) => {
            let code = if err.is_internal() {
                EXIT_INTERNAL
            } else {
                EXIT_REJECTED
            };
            render_diagnostics(&err.into_diagnostics(), &ri.filename, &ri.source);
            process::exit(code);
        }
    };

    let out_path = output.unwrap_or_else(|| ri.options.output_path(&ri.path));
    if let Err(e) = std::fs::write(&out_path, &asm) {
        eprintln!("error: cannot write '{}': {}", out_path.display(), e);
        process::exit(EXIT_REJECTED);
    }
    eprintln!("Compiled -> {}", out_path.display());
}
