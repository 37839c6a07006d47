/// Where the current `ensure_running` call stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorState {
    /// Nothing checked yet for this call
    Unknown,
    /// Probing the effective port
    Checking,
    /// Server was already healthy; nothing launched
    Running { port: u16 },
    /// Launcher started, waiting for readiness
    Starting,
    /// Launched server became healthy
    Ready { port: u16 },
    /// Could not launch or the server never became ready
    Failed { error: String },
}
