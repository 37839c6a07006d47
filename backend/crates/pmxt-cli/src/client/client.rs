use crate::{CliClientResult, ClientError};

use std::panic::Location;

use error_location::ErrorLocation;
use pmxt_supervisor::ServerSupervisor;
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;

/// Opaque HTTP caller for the pmxt server API
///
/// Only knows a base path. Which endpoints exist is the server's business.
pub struct Client {
    pub base_path: String,
    client: ReqwestClient,
}

impl Client {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_path` - Server URL (e.g., "http://localhost:3847")
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            client: ReqwestClient::new(),
        }
    }

    /// Make sure the server is running, then build a client pointed at it.
    ///
    /// An explicitly configured base URL wins; otherwise the client targets
    /// the port the server actually answered on.
    pub async fn connect(supervisor: &ServerSupervisor) -> CliClientResult<Self> {
        let port = supervisor.ensure_running().await?;

        let base_path = match supervisor.config().base_url {
            Some(ref url) => url.clone(),
            None => format!("http://{}:{}", supervisor.config().health_host, port),
        };

        Ok(Self::new(&base_path))
    }

    /// Build a request against the base path
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = if path.starts_with('/') {
            format!("{}{}", self.base_path, path)
        } else {
            format!("{}/{}", self.base_path, path)
        };
        self.client.request(method, &url)
    }

    /// Execute request and handle errors
    async fn execute(&self, req: reqwest::RequestBuilder) -> CliClientResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        if !status.is_success() {
            let error = body.get("error");
            let code = error
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| status.as_u16().to_string());
            let message = error
                .and_then(|e| e.get("message"))
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(ClientError::Api {
                code,
                message,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(body)
    }

    /// Call `method path` with an optional JSON body
    pub async fn call(&self, method: &str, path: &str, body: Option<&Value>) -> CliClientResult<Value> {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|e| ClientError::invalid_request(format!("bad method '{method}': {e}")))?;

        let mut req = self.request(method, path);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.execute(req).await
    }

    pub async fn get(&self, path: &str) -> CliClientResult<Value> {
        self.call("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> CliClientResult<Value> {
        self.call("POST", path, Some(body)).await
    }
}
