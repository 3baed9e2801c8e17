//! HTTP transport for master-data lookups.

use futures::future::BoxFuture;
use std::time::Duration;
use tracing::debug;

use super::{LookupEnvelope, LookupRequest, LookupService};
use crate::config::BackendConfig;
use crate::core::GridError;

/// Posts [`LookupRequest`]s as JSON to a single endpoint.
///
/// No retries and no timeout of its own unless the config sets one.
#[derive(Debug, Clone)]
pub struct HttpLookupService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLookupService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Build a client from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, GridError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| GridError::ConfigError {
            message: format!("Failed to build HTTP client: {e}"),
        })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &LookupRequest) -> Result<LookupEnvelope, GridError> {
        let message_type = request.message_type.to_string();
        debug!("POST {} ({})", self.endpoint, message_type);

        let response = self.client.post(&self.endpoint).json(request).send().await.map_err(|e| {
            GridError::LookupTransport {
                message_type: message_type.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GridError::LookupStatus {
                message_type,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| GridError::LookupTransport {
            message_type: message_type.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| GridError::LookupDecode {
            message_type,
            reason: e.to_string(),
        })
    }
}

impl LookupService for HttpLookupService {
    fn name(&self) -> &str {
        "http"
    }

    fn lookup<'a>(
        &'a self,
        request: &'a LookupRequest,
    ) -> BoxFuture<'a, Result<LookupEnvelope, GridError>> {
        Box::pin(self.send(request))
    }
}
