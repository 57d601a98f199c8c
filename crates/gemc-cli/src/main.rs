mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { input, options } => commands::check::run(input, options),
        Command::Dump { input, options } => commands::dump::run(input, options),
        Command::Build { input, options } => commands::build::run(input, options),
    }
}
