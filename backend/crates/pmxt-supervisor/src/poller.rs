//! Bounded readiness polling after a launch.

use crate::{HealthProbe, PortResolver, SupervisorError, SupervisorResult};

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use pmxt_config::SupervisorConfig;

/// Probes the effective port until healthy or the retry budget is spent.
pub struct ReadinessPoller {
    probe: Arc<dyn HealthProbe>,
    ports: PortResolver,
    max_retries: u32,
    retry_delay: Duration,
}

impl ReadinessPoller {
    pub fn new(
        probe: Arc<dyn HealthProbe>,
        ports: PortResolver,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            probe,
            ports,
            max_retries,
            retry_delay,
        }
    }

    pub fn from_config(
        probe: Arc<dyn HealthProbe>,
        ports: PortResolver,
        config: &SupervisorConfig,
    ) -> Self {
        Self::new(probe, ports, config.max_retries, config.retry_delay())
    }

    /// Total time this poller may spend sleeping.
    pub fn budget(&self) -> Duration {
        self.retry_delay.saturating_mul(self.max_retries)
    }

    /// Wait for the server to report healthy.
    ///
    /// The port is resolved again on every attempt so a server that moved
    /// off a busy default port is still found. Returns the port that
    /// answered.
    pub async fn await_ready(&self) -> SupervisorResult<u16> {
        let mut first_port = None;

        for attempt in 1..=self.max_retries {
            let port = self.ports.effective_port();
            let first = *first_port.get_or_insert(port);

            let outcome = self.probe.probe(port).await;
            if outcome.is_healthy() {
                if port != first {
                    info!("Server ready on port {port} (first probed {first})");
                } else {
                    info!("Server ready on port {port} after {attempt} attempt(s)");
                }
                return Ok(port);
            }

            debug!(
                "Readiness attempt {attempt}/{} on port {port}: {outcome:?}",
                self.max_retries
            );
            tokio::time::sleep(self.retry_delay).await;
        }

        Err(SupervisorError::readiness_timeout(
            self.max_retries,
            self.budget(),
        ))
    }
}
