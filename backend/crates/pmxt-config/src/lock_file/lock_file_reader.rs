use crate::{Config, ConfigError, ConfigErrorResult, ServerLockRecord};

use std::path::{Path, PathBuf};

/// Fail-open reader for the server lock file.
#[derive(Debug, Clone)]
pub struct LockFileReader {
    path: PathBuf,
}

impl LockFileReader {
    /// Reader for an explicit lock file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reader for `<config_dir>/server.lock`.
    pub fn from_config_dir() -> ConfigErrorResult<Self> {
        Ok(Self::new(Config::lock_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the lock record, treating every failure as "no record".
    ///
    /// A missing, unreadable, empty or malformed file yields `None`.
    pub fn read(&self) -> Option<ServerLockRecord> {
        match self.try_read() {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Ignoring unusable lock file: {e}");
                None
            }
        }
    }

    /// Read the lock record, surfacing why it could not be used.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn try_read(&self) -> ConfigErrorResult<Option<ServerLockRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let record: ServerLockRecord =
            serde_json::from_str(&content).map_err(|e| ConfigError::LockFile {
                path: self.path.clone(),
                source: e,
            })?;

        if record.port == 0 {
            return Err(ConfigError::config(format!(
                "Lock file {} names port 0",
                self.path.display()
            )));
        }

        Ok(Some(record))
    }

    /// Port from the lock record, if there is a usable one.
    pub fn port(&self) -> Option<u16> {
        self.read().map(|record| record.port)
    }
}
