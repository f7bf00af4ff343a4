use clap::Args;

/// Global arguments that apply to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Extra dialect file merged over the built-in and user dialects
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Log parser and schema decisions to stderr
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress informational notices
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Pad short rows and truncate long rows instead of failing
    #[arg(long, global = true)]
    pub jagged: bool,

    /// Skip blank lines in the input
    #[arg(long, global = true)]
    pub skip_empty_lines: bool,
}
