mod config;
mod error;
mod lock_file;
mod log_level;
mod logging_config;
mod supervisor_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use lock_file::{LockFileReader, ServerLockRecord, is_process_running};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use supervisor_config::SupervisorConfig;

pub const DEFAULT_PORT: u16 = 3847;
pub const DEFAULT_HEALTH_HOST: &str = "localhost";
pub const DEFAULT_MAX_RETRIES: u32 = 30;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_LAUNCHER_COMMAND: &str = "pmxt-ensure-server";
pub const DEFAULT_COMPANION_PACKAGE: &str = "pmxtjs";

pub const MIN_MAX_RETRIES: u32 = 1;
pub const MAX_MAX_RETRIES: u32 = 1000;
pub const MIN_RETRY_DELAY_MS: u64 = 1;
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

const CONFIG_DIR_ENV: &str = "PMXT_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".pmxt";
const CONFIG_FILENAME: &str = "config.toml";
const LOCK_FILENAME: &str = "server.lock";

const DEFAULT_LOG_LEVEL_STRING: &str = "warn";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;
