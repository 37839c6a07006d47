use crate::INSTALL_HINT;

use std::panic::Location;
use std::path::PathBuf;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures the supervisor surfaces to callers.
///
/// Detection problems (unreadable lock file, failed probe) never show up
/// here; they are absorbed as "not running". Only failures to act do.
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Launcher '{command}' not found (searched: {searched}) {location}")]
    LauncherNotFound {
        command: String,
        searched: String,
        location: ErrorLocation,
    },

    #[error("Failed to launch {path}: {source} {location}", path = .program.display())]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error(
        "Server did not become ready within {secs}s ({attempts} attempts) {location}",
        secs = .budget.as_secs_f64()
    )]
    ReadinessTimeout {
        attempts: u32,
        budget: Duration,
        location: ErrorLocation,
    },

    #[error("Configuration error: {source} {location}")]
    Config {
        #[source]
        source: pmxt_config::ConfigError,
        location: ErrorLocation,
    },

    #[error("Failed to start pmxt server: {source}\n\n{guidance}")]
    StartupFailed {
        #[source]
        source: Box<SupervisorError>,
        guidance: String,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn launcher_not_found<S: Into<String>>(command: S, searched: &[&str]) -> Self {
        Self::LauncherNotFound {
            command: command.into(),
            searched: searched.join(", "),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn launch_failed(program: PathBuf, source: std::io::Error) -> Self {
        Self::LaunchFailed {
            program,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn readiness_timeout(attempts: u32, budget: Duration) -> Self {
        Self::ReadinessTimeout {
            attempts,
            budget,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Wrap a launch or timeout failure with install and manual-start steps.
    #[track_caller]
    pub fn startup_failed(cause: SupervisorError, launcher_command: &str) -> Self {
        Self::StartupFailed {
            source: Box::new(cause),
            guidance: format!(
                "To fix this:\n  \
                 1. Install the server: {INSTALL_HINT}\n  \
                 2. Or start it manually: {launcher_command}"
            ),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether the launcher could not be found or spawned.
    pub fn is_launch_failure(&self) -> bool {
        match self {
            Self::LauncherNotFound { .. } | Self::LaunchFailed { .. } => true,
            Self::StartupFailed { source, .. } => source.is_launch_failure(),
            _ => false,
        }
    }

    /// Whether the retry budget ran out before the server became healthy.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::ReadinessTimeout { .. } => true,
            Self::StartupFailed { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    pub fn recovery_hint(&self) -> String {
        match self {
            Self::LauncherNotFound { .. } => format!(
                "The pmxt server launcher is not installed. \
                 Install it with `{INSTALL_HINT}`."
            ),
            Self::LaunchFailed { .. } => "The pmxt server launcher could not be started. \
                 Check that it is executable and try starting it manually."
                .to_string(),
            Self::ReadinessTimeout { .. } => "The server is taking too long to start. \
                 Start it manually and check its logs."
                .to_string(),
            Self::Config { .. } => "Configuration has invalid settings. \
                 Check config.toml in the pmxt config directory (PMXT_CONFIG_DIR) \
                 and PMXT_* environment variables."
                .to_string(),
            Self::StartupFailed { source, .. } => source.recovery_hint(),
        }
    }
}

impl From<pmxt_config::ConfigError> for SupervisorError {
    #[track_caller]
    fn from(source: pmxt_config::ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
