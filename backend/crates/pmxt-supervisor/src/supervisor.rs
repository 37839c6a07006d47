//! Make sure the pmxt server is up before API calls go out.

use crate::{
    DetachedSpawner, HealthProbe, HttpHealthProbe, LauncherLocator, PortResolver,
    ProcessLauncher, ReadinessPoller, SupervisorError, SupervisorResult, SupervisorState,
};

use std::sync::Arc;

use log::{debug, error, info};
use pmxt_config::{LockFileReader, SupervisorConfig};
use tokio::sync::watch;

/// Orchestrates probe, launch and readiness polling.
///
/// Every `ensure_running` call starts fresh from [`SupervisorState::Unknown`]
/// and re-derives everything from the lock file. Concurrent calls are not
/// serialized; two callers may both launch, and the server that loses the
/// port race is expected to exit on its own.
pub struct ServerSupervisor {
    config: SupervisorConfig,
    ports: PortResolver,
    probe: Arc<dyn HealthProbe>,
    launcher: ProcessLauncher,
    state_tx: watch::Sender<SupervisorState>,
    state_rx: watch::Receiver<SupervisorState>,
}

impl ServerSupervisor {
    /// Build a supervisor from its parts.
    ///
    /// The config is validated here, so a zero retry budget or delay is
    /// rejected before anything can be launched.
    pub fn new(
        config: SupervisorConfig,
        ports: PortResolver,
        probe: Arc<dyn HealthProbe>,
        launcher: ProcessLauncher,
    ) -> SupervisorResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, ports, probe, launcher))
    }

    /// Production wiring: lock file in the per-user config dir, HTTP probe,
    /// default launcher search order and a detached spawner.
    pub fn from_config(config: SupervisorConfig) -> SupervisorResult<Self> {
        config.validate()?;

        let ports = PortResolver::new(LockFileReader::from_config_dir()?, config.default_port);
        let probe = Arc::new(HttpHealthProbe::new(config.health_host.clone()));
        let launcher = ProcessLauncher::new(
            LauncherLocator::for_config(&config),
            Arc::new(DetachedSpawner),
        );

        Ok(Self::assemble(config, ports, probe, launcher))
    }

    fn assemble(
        config: SupervisorConfig,
        ports: PortResolver,
        probe: Arc<dyn HealthProbe>,
        launcher: ProcessLauncher,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(SupervisorState::Unknown);

        Self {
            config,
            ports,
            probe,
            launcher,
            state_tx,
            state_rx,
        }
    }

    /// Ensure a healthy server is reachable, launching one if needed.
    ///
    /// Returns the port the healthy server answered on.
    pub async fn ensure_running(&self) -> SupervisorResult<u16> {
        self.set_state(SupervisorState::Unknown);
        self.set_state(SupervisorState::Checking);

        let port = self.ports.effective_port();
        if self.probe.is_healthy(port).await {
            debug!("pmxt server already running on port {port}");
            self.set_state(SupervisorState::Running { port });
            return Ok(port);
        }

        info!("pmxt server not reachable on port {port}, starting it");
        self.set_state(SupervisorState::Starting);

        if let Err(e) = self.launcher.launch() {
            return Err(self.fail(e));
        }

        match self.poller().await_ready().await {
            Ok(port) => {
                self.set_state(SupervisorState::Ready { port });
                Ok(port)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Probe the effective port once. Never launches.
    pub async fn is_server_running(&self) -> bool {
        self.probe.is_healthy(self.ports.effective_port()).await
    }

    /// Port the server is expected on (lock file port, else the default).
    pub fn get_running_port(&self) -> u16 {
        self.ports.effective_port()
    }

    pub fn effective_port(&self) -> u16 {
        self.ports.effective_port()
    }

    pub fn base_url(&self) -> String {
        self.config.base_url()
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn ports(&self) -> &PortResolver {
        &self.ports
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SupervisorState> {
        self.state_rx.clone()
    }

    /// Get current state.
    pub fn state(&self) -> SupervisorState {
        self.state_rx.borrow().clone()
    }

    fn poller(&self) -> ReadinessPoller {
        ReadinessPoller::from_config(self.probe.clone(), self.ports.clone(), &self.config)
    }

    #[track_caller]
    fn fail(&self, cause: SupervisorError) -> SupervisorError {
        let err = SupervisorError::startup_failed(cause, &self.config.launcher_command);
        error!("{err}");
        self.set_state(SupervisorState::Failed {
            error: err.to_string(),
        });
        err
    }

    fn set_state(&self, state: SupervisorState) {
        let _ = self.state_tx.send(state);
    }
}
