mod args;
mod config;
mod global;
mod handlers;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{CheckArgs, ConvertArgs, DialectsAction, FromJsonArgs, JsonArgs};
use global::GlobalArgs;

#[derive(Parser)]
#[command(name = "dsvkit")]
#[command(version)]
#[command(about = "Inspect, validate and convert CSV, TSV, PSV and other delimiter-separated tables", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-emit a table in another dialect, one record at a time
    Convert(ConvertArgs),
    /// Convert a table to a JSON array of objects
    Json(JsonArgs),
    /// Convert a JSON array of flat objects to a table
    FromJson(FromJsonArgs),
    /// Parse a whole table and report its shape or the first error
    Check(CheckArgs),
    /// Inspect the dialect registry
    Dialects {
        #[command(subcommand)]
        action: DialectsAction,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.global);

    let registry = config::load_registry(&cli.global)?;

    match cli.command {
        Commands::Convert(args) => handlers::convert::handle(args, &cli.global, &registry),
        Commands::Json(args) => handlers::json::handle(args, &cli.global, &registry),
        Commands::FromJson(args) => handlers::from_json::handle(args, &cli.global, &registry),
        Commands::Check(args) => handlers::check::handle(args, &cli.global, &registry),
        Commands::Dialects { action } => handlers::dialects::handle(action, &cli.global, &registry),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(global: &GlobalArgs) {
    let default_level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
