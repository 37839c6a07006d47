use crate::{LauncherLocator, ProcessSpawner, SupervisorError, SupervisorResult};

use std::path::PathBuf;
use std::sync::Arc;

use log::info;

/// A launcher process that was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedProcess {
    pub program: PathBuf,
    pub pid: u32,
}

/// Locates the launcher and starts it detached. Never retries.
pub struct ProcessLauncher {
    locator: LauncherLocator,
    spawner: Arc<dyn ProcessSpawner>,
}

impl ProcessLauncher {
    pub fn new(locator: LauncherLocator, spawner: Arc<dyn ProcessSpawner>) -> Self {
        Self { locator, spawner }
    }

    pub fn launch(&self) -> SupervisorResult<LaunchedProcess> {
        let program = self.locator.locate()?;

        let pid = self
            .spawner
            .spawn_detached(&program)
            .map_err(|e| SupervisorError::launch_failed(program.clone(), e))?;

        info!("Spawned {} with PID: {}", program.display(), pid);

        Ok(LaunchedProcess { program, pid })
    }
}
