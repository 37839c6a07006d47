//! pmxt - local server supervisor CLI
//!
//! Makes sure the pmxt server is up before talking to it.
//!
//! # Examples
//!
//! ```bash
//! # Start the server if needed and wait for it
//! pmxt server ensure
//!
//! # Inspect the lock file and health without starting anything
//! pmxt server status --pretty
//!
//! # Call the API (starts the server first if needed)
//! pmxt call GET /api/markets
//! ```

mod cli;
mod commands;
mod server_commands;

use crate::{cli::Cli, commands::Commands, server_commands::ServerCommands};

use pmxt_cli::{CliClientResult, Client, logger};
use pmxt_config::{Config, LogLevel};
use pmxt_supervisor::ServerSupervisor;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(url) = cli.base_url {
        config.supervisor.base_url = Some(url);
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = LogLevel::parse_lossy(level);
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = logger::initialize(
        config.logging.level,
        config.logging.file.as_ref().map(PathBuf::from),
        config.logging.colored,
    ) {
        eprintln!("Warning: {e}");
    }
    config.log_summary();

    let supervisor = match ServerSupervisor::from_config(config.supervisor.clone()) {
        Ok(supervisor) => supervisor,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Server { action } => match action {
            ServerCommands::Ensure => ensure(&supervisor).await,
            ServerCommands::Status => Ok(status(&supervisor).await),
            ServerCommands::Port => Ok(json!({ "port": supervisor.effective_port() })),
        },
        Commands::Call { method, path, body } => {
            call(&supervisor, &method, &path, body.as_deref()).await
        }
    };

    // Handle result
    match result {
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.recovery_hint() {
                eprintln!();
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn ensure(supervisor: &ServerSupervisor) -> CliClientResult<Value> {
    let port = supervisor.ensure_running().await?;
    Ok(json!({ "status": "ready", "port": port }))
}

async fn status(supervisor: &ServerSupervisor) -> Value {
    let reader = supervisor.ports().reader();
    let lock = reader.read().map(|record| {
        json!({
            "port": record.port,
            "pid": record.pid,
            "pid_alive": record.is_process_alive(),
            "started_at": record.started_at().map(|t| t.to_rfc3339()),
        })
    });

    json!({
        "running": supervisor.is_server_running().await,
        "effective_port": supervisor.effective_port(),
        "default_port": supervisor.ports().default_port(),
        "base_url": supervisor.base_url(),
        "lock_file": reader.path().display().to_string(),
        "lock": lock,
    })
}

async fn call(
    supervisor: &ServerSupervisor,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> CliClientResult<Value> {
    let body: Option<Value> = body.map(serde_json::from_str::<Value>).transpose()?;

    let client = Client::connect(supervisor).await?;
    client.call(method, path, body.as_ref()).await
}

