use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_COMPANION_PACKAGE, DEFAULT_HEALTH_HOST,
    DEFAULT_LAUNCHER_COMMAND, DEFAULT_MAX_RETRIES, DEFAULT_PORT, DEFAULT_RETRY_DELAY_MS,
    MAX_MAX_RETRIES, MAX_RETRY_DELAY_MS, MIN_MAX_RETRIES, MIN_RETRY_DELAY_MS,
};

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Settings for keeping the local pmxt server alive.
///
/// Immutable once handed to the supervisor. The default port is a plain
/// field so callers and tests can point the supervisor anywhere.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Base URL for API calls. Derived from `default_port` when unset.
    pub base_url: Option<String>,
    /// Port probed when no lock file is present
    pub default_port: u16,
    /// Readiness poll attempts after a launch
    pub max_retries: u32,
    /// Delay between readiness attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Host used for health probes
    pub health_host: String,
    /// Launcher executable name
    pub launcher_command: String,
    /// Package whose `bin/` directory may hold the launcher
    pub companion_package: String,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_port: DEFAULT_PORT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            health_host: String::from(DEFAULT_HEALTH_HOST),
            launcher_command: String::from(DEFAULT_LAUNCHER_COMMAND),
            companion_package: String::from(DEFAULT_COMPANION_PACKAGE),
        }
    }
}

impl SupervisorConfig {
    /// Base URL handed to the API client.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", DEFAULT_HEALTH_HOST, self.default_port),
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_retries < MIN_MAX_RETRIES || self.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::supervisor(format!(
                "supervisor.max_retries must be {}-{}, got {}",
                MIN_MAX_RETRIES, MAX_MAX_RETRIES, self.max_retries
            )));
        }

        if self.retry_delay_ms < MIN_RETRY_DELAY_MS || self.retry_delay_ms > MAX_RETRY_DELAY_MS {
            return Err(ConfigError::supervisor(format!(
                "supervisor.retry_delay_ms must be {}-{}, got {}",
                MIN_RETRY_DELAY_MS, MAX_RETRY_DELAY_MS, self.retry_delay_ms
            )));
        }

        if self.default_port == 0 {
            return Err(ConfigError::supervisor(
                "supervisor.default_port must be a fixed port, got 0",
            ));
        }

        if self.launcher_command.trim().is_empty() {
            return Err(ConfigError::supervisor(
                "supervisor.launcher_command cannot be empty",
            ));
        }

        if self.health_host.trim().is_empty() {
            return Err(ConfigError::supervisor(
                "supervisor.health_host cannot be empty",
            ));
        }

        if let Some(ref base_url) = self.base_url {
            let parsed = Url::parse(base_url).map_err(|e| {
                ConfigError::supervisor(format!("supervisor.base_url '{base_url}' is invalid: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::supervisor(format!(
                    "supervisor.base_url must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }

        Ok(())
    }
}
