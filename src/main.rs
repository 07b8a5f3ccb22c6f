use clap::{Parser, Subcommand};

mod cli;

use cli::build::BuildArgs;
use cli::check::CheckArgs;
use cli::signatures::SignaturesArgs;

#[derive(Parser)]
#[command(
    name = "pika",
    version,
    about = "Pika compiler targeting the ASMEmu stack machine"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a .pika file to ASMEmu assembly
    Build(BuildArgs),
    /// Lex, parse and type-check without emitting assembly
    Check(CheckArgs),
    /// Print the operator signature table
    Signatures(SignaturesArgs),
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Command::Build(args) => cli::build::cmd_build(args),
        Command::Check(args) => cli::check::cmd_check(args),
        Command::Signatures(args) => cli::signatures::cmd_signatures(args),
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn setup_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
