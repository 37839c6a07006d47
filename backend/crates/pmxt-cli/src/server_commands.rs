use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum ServerCommands {
    /// Start the server if it is not running and wait until it is healthy
    Ensure,

    /// Show lock file details and whether the server answers (never starts it)
    Status,

    /// Print the port the server is expected on
    Port,
}
