//! Keeps the local pmxt server running before the SDK talks to it.
//!
//! The [`ServerSupervisor`] probes the port announced in the server's lock
//! file (or the default port), launches a detached server when nothing
//! answers, then polls until the server reports healthy or the retry budget
//! runs out.

mod error;
mod health;
mod launcher;
mod poller;
mod port;
mod supervisor;
mod supervisor_state;

#[cfg(test)]
mod tests;

pub use error::{Result as SupervisorResult, SupervisorError};
pub use health::{HealthProbe, HealthResponse, HttpHealthProbe, ProbeOutcome};
pub use launcher::{
    BundledResolver, CompanionPackageResolver, DetachedSpawner, LaunchedProcess,
    LauncherLocator, LauncherResolver, ProcessLauncher, ProcessSpawner, SearchPathResolver,
};
pub use poller::ReadinessPoller;
pub use port::PortResolver;
pub use supervisor::ServerSupervisor;
pub use supervisor_state::SupervisorState;

const HEALTH_ENDPOINT: &str = "health";
const HEALTHY_STATUS: &str = "ok";
const LAUNCHER_BIN_DIR: &str = "bin";
const NODE_MODULES_DIR: &str = "node_modules";
const COMPANION_DIR_ENV: &str = "PMXT_CORE_DIR";

const INSTALL_HINT: &str = "npm install -g pmxtjs";
