use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{resolve_input, EXIT_REJECTED};

#[derive(Args)]
pub struct CheckArgs {
    /// Input .pika file
    pub input: PathBuf,
}

pub fn cmd_check(args: CheckArgs) {
    let ri = resolve_input(&args.input);
    match pika::check_with_options(&ri.source, &ri.filename, &ri.options) {
        Ok(()) => eprintln!("OK: {}", args.input.display()),
        Err(_) => process::exit(EXIT_REJECTED),
    }
}
