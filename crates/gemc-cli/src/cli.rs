//! Argument parsing for the `gemc` driver.
//!
//! The lexer/parser front-end is pinned out of this workspace, so every
//! command here takes already-built IR - a JSON-serialized `Node::Program`
//! - rather than `.gem` source text. A real deployment would sit this CLI
//! behind the front end that produces that IR; for this workspace the IR
//! file on disk stands in for that seam.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

#[derive(Parser)]
#[command(name = "gemc", bin_name = "gemc")]
#[command(about = "Middle-end driver for the Gem compiler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the analyser and node-expansion passes and report diagnostics
    #[command(after_help = r#"EXAMPLES:
  gemc check main.ir.json
  gemc check main.ir.json --no-stdlib"#)]
    Check {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        options: OptionsArgs,
    },

    /// Run the full pipeline and print the lowered IR
    #[command(after_help = r#"EXAMPLES:
  gemc dump main.ir.json
  gemc dump main.ir.json --debug"#)]
    Dump {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        options: OptionsArgs,
    },

    /// Run the full pipeline and hand the result to a backend
    #[command(after_help = r#"EXAMPLES:
  gemc build main.ir.json"#)]
    Build {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        options: OptionsArgs,
    },
}

#[derive(Args)]
pub struct InputArgs {
    /// Path to a JSON-serialized `Node::Program`
    pub path: PathBuf,

    /// Colorize diagnostic output
    #[arg(long, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,
}

#[derive(Args)]
pub struct OptionsArgs {
    /// Skip loading the `core` native library
    #[arg(long)]
    pub no_stdlib: bool,

    /// Keep codegen artefacts from a previous run
    #[arg(long)]
    pub clean: bool,

    /// Enable backend optimizations
    #[arg(long)]
    pub optimize: bool,

    /// Emit debug info
    #[arg(long)]
    pub debug: bool,
}

impl OptionsArgs {
    pub fn into_compile_options(self) -> gemc_core::CompileOptions {
        gemc_core::CompileOptions {
            clean: self.clean,
            optimize: self.optimize,
            debug: self.debug,
            no_stdlib: self.no_stdlib,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_requires_a_path() {
        let result = Cli::try_parse_from(["gemc", "check"]);
        assert!(result.is_err());
    }

    #[test]
    fn check_parses_path_and_flags() {
        let cli = Cli::try_parse_from(["gemc", "check", "main.ir.json", "--no-stdlib"]).unwrap();
        let Command::Check { input, options } = cli.command else { panic!("expected Check") };
        assert_eq!(input.path, PathBuf::from("main.ir.json"));
        assert!(options.no_stdlib);
        assert!(!options.optimize);
    }

    #[test]
    fn dump_defaults_color_to_auto() {
        let cli = Cli::try_parse_from(["gemc", "dump", "main.ir.json"]).unwrap();
        let Command::Dump { input, .. } = cli.command else { panic!("expected Dump") };
        assert!(matches!(input.color, ColorChoice::Auto));
    }

    #[test]
    fn build_parses_color_flag() {
        let cli = Cli::try_parse_from(["gemc", "build", "main.ir.json", "--color", "never"]).unwrap();
        let Command::Build { input, .. } = cli.command else { panic!("expected Build") };
        assert!(!ColorChoice::Never.should_colorize());
        assert!(matches!(input.color, ColorChoice::Never));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["gemc", "frobnicate"]).is_err());
    }
}
