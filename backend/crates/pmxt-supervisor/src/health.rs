//! Single-shot health checks against the local server.

use crate::{HEALTH_ENDPOINT, HEALTHY_STATUS};

use async_trait::async_trait;
use pmxt_config::DEFAULT_HEALTH_HOST;

/// Result of one health probe.
///
/// Keeps "the server said no" apart from "we could not tell", even though
/// both count as not healthy at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Server answered 2xx with `{"status": "ok"}`
    Healthy,
    /// Server answered, but not healthy (non-2xx or another status value)
    Unhealthy { reason: String },
    /// No usable answer (connection refused, transport error, unreadable body)
    Indeterminate { reason: String },
}

impl ProbeOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Response from the /health endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probe the server on `port` once. Never fails; problems become outcomes.
    async fn probe(&self, port: u16) -> ProbeOutcome;

    /// Fail-open boolean view of [`HealthProbe::probe`].
    async fn is_healthy(&self, port: u16) -> bool {
        self.probe(port).await.is_healthy()
    }
}

/// Probes `GET http://<host>:<port>/health` with reqwest.
///
/// No timeout beyond the transport default is applied.
pub struct HttpHealthProbe {
    client: reqwest::Client,
    host: String,
}

impl HttpHealthProbe {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into(),
        }
    }

    pub fn url(&self, port: u16) -> String {
        format!("http://{}:{}/{}", self.host, port, HEALTH_ENDPOINT)
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH_HOST)
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        let url = self.url(port);

        let outcome = match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<HealthResponse>().await {
                Ok(health) if health.status == HEALTHY_STATUS => ProbeOutcome::Healthy,
                Ok(health) => ProbeOutcome::Unhealthy {
                    reason: format!("status '{}'", health.status),
                },
                Err(e) => ProbeOutcome::Indeterminate {
                    reason: format!("Invalid response: {e}"),
                },
            },
            Ok(resp) => ProbeOutcome::Unhealthy {
                reason: format!("HTTP {}", resp.status()),
            },
            Err(e) => ProbeOutcome::Indeterminate {
                reason: e.to_string(),
            },
        };

        log::trace!("Health probe {url}: {outcome:?}");
        outcome
    }
}
