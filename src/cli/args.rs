use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::InputFormat;

/// CLI arguments for the phpgen binary.
#[derive(Parser, Debug)]
#[command(
    name = "phpgen",
    version,
    about = "Generate PHP source from tagged IR and run it"
)]
pub struct CliArgs {
    /// Path to a phpgen.json config file (default: ./phpgen.json when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the PHP program generated from IR.
    Dump(InputArgs),

    /// Generate PHP from IR and run it; the exit code mirrors PHP's.
    Eval {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        php: PhpArgs,
    },

    /// Run an existing PHP file.
    Exec {
        /// PHP source file; `-` reads stdin.
        file: PathBuf,
        #[command(flatten)]
        php: PhpArgs,
    },

    /// Print the installed PHP version.
    Version(PhpArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    /// IR file; stdin when omitted or `-`.
    pub input: Option<PathBuf>,

    /// IR notation (default: from the file extension, then config).
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<InputFormat>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct PhpArgs {
    /// PHP interpreter binary.
    #[arg(long)]
    pub php: Option<PathBuf>,

    /// Kill the interpreter after this many milliseconds.
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}
