use std::process;

use clap::Args;

use pika::semantic::signatures::{OperatorKey, SignatureRegistry};

use super::EXIT_REJECTED;

#[derive(Args)]
pub struct SignaturesArgs {
    /// Only show one operator (e.g. add, greater-equal, cast)
    #[arg(long, value_name = "NAME")]
    pub operator: Option<String>,
}

pub fn cmd_signatures(args: SignaturesArgs) {
    let only = match args.operator.as_deref() {
        None => None,
        Some(name) => match OperatorKey::from_name(name) {
            Some(key) => Some(key),
            None => {
                let known: Vec<&str> = OperatorKey::ALL.iter().map(|k| k.name()).collect();
                eprintln!("error: unknown operator '{}'", name);
                eprintln!("  known operators: {}", known.join(", "));
                process::exit(EXIT_REJECTED);
            }
        },
    };
    print!("{}", SignatureRegistry::new().table(only));
}
