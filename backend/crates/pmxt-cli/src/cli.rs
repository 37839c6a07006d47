use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "pmxt")]
#[command(about = "Keep the local pmxt server running and call its API")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// API base URL (defaults to the port the server answers on)
    #[arg(long, global = true)]
    pub(crate) base_url: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,
}
