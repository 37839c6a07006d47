mod launcher;

use crate::{
    HealthProbe, LauncherLocator, LauncherResolver, PortResolver, ProbeOutcome, ProcessLauncher,
    ProcessSpawner, ServerSupervisor,
};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pmxt_config::{LockFileReader, SupervisorConfig};

pub(crate) const DEFAULT_TEST_PORT: u16 = 3847;
pub(crate) const LAUNCHER: &str = "pmxt-ensure-server";

type ProbeFn = dyn Fn(u16, u32) -> ProbeOutcome + Send + Sync;
type SpawnFn = dyn Fn(&Path) -> std::io::Result<u32> + Send + Sync;

/// Probe whose answer is computed from (port, zero-based call index).
pub(crate) struct FakeProbe {
    answer: Box<ProbeFn>,
    calls: AtomicU32,
    ports: Mutex<Vec<u16>>,
}

impl FakeProbe {
    pub(crate) fn new(answer: impl Fn(u16, u32) -> ProbeOutcome + Send + Sync + 'static) -> Self {
        Self {
            answer: Box::new(answer),
            calls: AtomicU32::new(0),
            ports: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn always_healthy() -> Self {
        Self::new(|_, _| ProbeOutcome::Healthy)
    }

    pub(crate) fn never_healthy() -> Self {
        Self::new(|_, _| refused())
    }

    /// Unhealthy for the first `n` calls, healthy afterwards.
    pub(crate) fn healthy_after(n: u32) -> Self {
        Self::new(move |_, call| {
            if call >= n {
                ProbeOutcome::Healthy
            } else {
                refused()
            }
        })
    }

    /// Healthy only when probed on `healthy_port`.
    pub(crate) fn healthy_on(healthy_port: u16) -> Self {
        Self::new(move |port, _| {
            if port == healthy_port {
                ProbeOutcome::Healthy
            } else {
                refused()
            }
        })
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn ports(&self) -> Vec<u16> {
        self.ports.lock().unwrap().clone()
    }
}

#[async_trait]
impl HealthProbe for FakeProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.ports.lock().unwrap().push(port);
        (self.answer)(port, call)
    }
}

pub(crate) fn refused() -> ProbeOutcome {
    ProbeOutcome::Indeterminate {
        reason: "connection refused".into(),
    }
}

/// Spawner that records calls instead of starting anything.
pub(crate) struct FakeSpawner {
    result: Box<SpawnFn>,
    spawned: Mutex<Vec<PathBuf>>,
}

impl FakeSpawner {
    pub(crate) fn new(
        result: impl Fn(&Path) -> std::io::Result<u32> + Send + Sync + 'static,
    ) -> Self {
        Self {
            result: Box::new(result),
            spawned: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn ok(pid: u32) -> Self {
        Self::new(move |_| Ok(pid))
    }

    pub(crate) fn failing(kind: std::io::ErrorKind) -> Self {
        Self::new(move |_| Err(std::io::Error::new(kind, "spawn failed")))
    }

    pub(crate) fn spawned(&self) -> Vec<PathBuf> {
        self.spawned.lock().unwrap().clone()
    }
}

impl ProcessSpawner for FakeSpawner {
    fn spawn_detached(&self, program: &Path) -> std::io::Result<u32> {
        self.spawned.lock().unwrap().push(program.to_path_buf());
        (self.result)(program)
    }
}

/// Resolver with a fixed answer.
pub(crate) struct FixedResolver {
    pub(crate) name: &'static str,
    pub(crate) path: Option<PathBuf>,
}

impl LauncherResolver for FixedResolver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn resolve(&self) -> Option<PathBuf> {
        self.path.clone()
    }
}

pub(crate) fn write_lock(dir: &Path, port: u16) {
    let record = serde_json::json!({ "port": port, "pid": 1, "timestamp": 0 });
    std::fs::write(dir.join("server.lock"), record.to_string()).unwrap();
}

pub(crate) fn resolver_in(dir: &Path, default_port: u16) -> PortResolver {
    PortResolver::new(LockFileReader::new(dir.join("server.lock")), default_port)
}

pub(crate) fn test_config(max_retries: u32, retry_delay_ms: u64) -> SupervisorConfig {
    SupervisorConfig {
        max_retries,
        retry_delay_ms,
        default_port: DEFAULT_TEST_PORT,
        ..SupervisorConfig::default()
    }
}

/// Launcher that resolves to `launcher` (or nothing) and spawns via `spawner`.
pub(crate) fn fake_launcher(
    launcher: Option<PathBuf>,
    spawner: Arc<FakeSpawner>,
) -> ProcessLauncher {
    let locator = LauncherLocator::new(
        LAUNCHER,
        vec![Box::new(FixedResolver {
            name: "fixed",
            path: launcher,
        })],
    );
    ProcessLauncher::new(locator, spawner)
}

pub(crate) fn fake_supervisor(
    config: SupervisorConfig,
    dir: &Path,
    probe: Arc<FakeProbe>,
    launcher: ProcessLauncher,
) -> ServerSupervisor {
    let ports = resolver_in(dir, config.default_port);
    ServerSupervisor::new(config, ports, probe, launcher).unwrap()
}
