use crate::server_commands::ServerCommands;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Local server operations
    Server {
        #[command(subcommand)]
        action: ServerCommands,
    },

    /// Call an API endpoint, starting the server first if needed
    Call {
        /// HTTP method (GET, POST, ...)
        method: String,

        /// Request path, e.g. /api/markets
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}
