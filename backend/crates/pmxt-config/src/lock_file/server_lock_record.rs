use crate::is_process_running;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last known running server instance, as announced by the server itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerLockRecord {
    /// Port the server bound to (may differ from the default after a collision)
    pub port: u16,
    /// Process ID of the server that wrote the file
    pub pid: u32,
    /// Start time in epoch milliseconds
    pub timestamp: i64,
}

impl ServerLockRecord {
    /// Start time as a UTC datetime, if the timestamp is in range.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Whether the recorded PID still belongs to a live process.
    ///
    /// Diagnostic only: port resolution trusts the health probe, not the PID.
    pub fn is_process_alive(&self) -> bool {
        is_process_running(self.pid)
    }
}
