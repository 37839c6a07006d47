use crate::{
    CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    LOCK_FILENAME, LoggingConfig, SupervisorConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub supervisor: SupervisorConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the per-user config directory.
    ///
    /// Loading order:
    /// 1. Check for PMXT_CONFIG_DIR env var, else use ~/.pmxt/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply PMXT_* environment variable overrides
    ///
    /// The directory is never created here; it belongs to the server.
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Load from a specific config directory (env overrides still apply).
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the per-user config directory.
    /// Priority: PMXT_CONFIG_DIR env var > ~/.pmxt/
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
            && !dir.is_empty()
        {
            return Ok(PathBuf::from(dir));
        }

        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(CONFIG_DIR_NAME))
    }

    /// Path of the lock file written by the running server.
    pub fn lock_file_path() -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(LOCK_FILENAME))
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.supervisor.validate()?;

        if let Some(ref file) = self.logging.file
            && file.trim().is_empty()
        {
            return Err(ConfigError::logging("logging.file cannot be empty"));
        }

        Ok(())
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  supervisor: base_url={}, default_port={}, retries={}x{}ms",
            self.supervisor.base_url(),
            self.supervisor.default_port,
            self.supervisor.max_retries,
            self.supervisor.retry_delay_ms
        );
        info!(
            "  launcher: command={}, package={}",
            self.supervisor.launcher_command, self.supervisor.companion_package
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Supervisor
        Self::apply_env_option_string("PMXT_BASE_URL", &mut self.supervisor.base_url);
        Self::apply_env_parse("PMXT_DEFAULT_PORT", &mut self.supervisor.default_port);
        Self::apply_env_parse("PMXT_MAX_RETRIES", &mut self.supervisor.max_retries);
        Self::apply_env_parse("PMXT_RETRY_DELAY_MS", &mut self.supervisor.retry_delay_ms);
        Self::apply_env_string("PMXT_HEALTH_HOST", &mut self.supervisor.health_host);
        Self::apply_env_string(
            "PMXT_LAUNCHER_COMMAND",
            &mut self.supervisor.launcher_command,
        );
        Self::apply_env_string(
            "PMXT_COMPANION_PACKAGE",
            &mut self.supervisor.companion_package,
        );

        // Logging
        Self::apply_env_parse("PMXT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("PMXT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("PMXT_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
