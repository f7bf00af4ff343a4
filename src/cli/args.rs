use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for re-emitting a table in another dialect
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Dialect of the input (default: settings.default_dialect)
    #[arg(short = 'f', long, value_name = "DIALECT")]
    pub from: Option<String>,

    /// Dialect of the output (default: settings.default_dialect)
    #[arg(short = 't', long, value_name = "DIALECT")]
    pub to: Option<String>,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for converting a table to JSON
#[derive(Args, Debug)]
pub struct JsonArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Dialect of the input
    #[arg(short = 'f', long, value_name = "DIALECT")]
    pub from: Option<String>,

    /// Pretty-print JSON output
    #[arg(short = 'p', long)]
    pub pretty: bool,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for converting JSON to a table
#[derive(Args, Debug)]
pub struct FromJsonArgs {
    /// Input file holding a JSON array of flat objects (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Dialect of the output
    #[arg(short = 't', long, value_name = "DIALECT")]
    pub to: Option<String>,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for validating a table
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Dialect of the input
    #[arg(short = 'f', long, value_name = "DIALECT")]
    pub from: Option<String>,
}

/// Dialects subcommand actions
#[derive(Subcommand, Debug)]
pub enum DialectsAction {
    /// List available dialects
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the settings of one dialect
    Show {
        /// Dialect name
        dialect: String,
    },
}
