use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

/// Starts a program that outlives the caller.
pub trait ProcessSpawner: Send + Sync {
    /// Spawn `program` with no arguments, detached. Returns its PID.
    fn spawn_detached(&self, program: &Path) -> std::io::Result<u32>;
}

/// Spawns into a new session with stdio discarded.
///
/// The child handle is dropped right away: once this returns, the caller has
/// no hold over the process and may exit without taking it down. Must be
/// called from within a Tokio runtime, which reaps the orphaned child.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSpawner;

impl ProcessSpawner for DetachedSpawner {
    fn spawn_detached(&self, program: &Path) -> std::io::Result<u32> {
        let mut cmd = Command::new(program);

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Detach on Unix
        #[cfg(unix)]
        {
            unsafe {
                cmd.pre_exec(|| {
                    libc::setsid();
                    Ok(())
                });
            }
        }

        #[cfg(windows)]
        {
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }

        let child = cmd.spawn()?;

        child
            .id()
            .ok_or_else(|| std::io::Error::other("launcher exited before its PID was read"))
    }
}
