//! Which port the server is expected on right now.

use pmxt_config::LockFileReader;

/// Resolves the effective port: the lock file's port, else the default.
///
/// Nothing is cached. The server may rewrite the lock file at any time
/// (for example after the default port turned out to be busy).
#[derive(Debug, Clone)]
pub struct PortResolver {
    reader: LockFileReader,
    default_port: u16,
}

impl PortResolver {
    pub fn new(reader: LockFileReader, default_port: u16) -> Self {
        Self {
            reader,
            default_port,
        }
    }

    pub fn effective_port(&self) -> u16 {
        self.reader.port().unwrap_or(self.default_port)
    }

    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    pub fn reader(&self) -> &LockFileReader {
        &self.reader
    }
}
