//! Veo HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::credential::ApiKey;
use crate::error::{VeoError, VeoResult};
use crate::types::{GenerateVideosRequest, Operation, VeoModel};

/// Configuration for the Veo client.
#[derive(Debug, Clone)]
pub struct VeoClientConfig {
    /// Base URL of the provider API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for VeoClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(300), // downloads can be large
        }
    }
}

impl VeoClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VEO_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            timeout: Duration::from_secs(
                std::env::var("VEO_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}

/// Client for the Veo generative-video API.
pub struct VeoClient {
    http: Client,
    config: VeoClientConfig,
}

impl VeoClient {
    /// Create a new Veo client.
    pub fn new(config: VeoClientConfig) -> VeoResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VeoError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VeoResult<Self> {
        Self::new(VeoClientConfig::from_env())
    }

    /// Submit a generation job, returning its operation handle.
    pub async fn generate_videos(
        &self,
        key: &ApiKey,
        model: VeoModel,
        request: &GenerateVideosRequest,
    ) -> VeoResult<Operation> {
        let url = format!(
            "{}/models/{}:predictLongRunning?key={}",
            self.config.base_url,
            model.as_str(),
            urlencoding::encode(key.as_str()),
        );

        debug!(model = model.as_str(), "Submitting generation job");

        let response = self.http.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VeoError::from_provider_body(status, &body));
        }

        let operation: Operation = response.json().await?;
        if operation.name.is_empty() {
            return Err(VeoError::InvalidResponse(
                "operation handle carries no name".to_string(),
            ));
        }

        Ok(operation)
    }

    /// Refresh an operation handle from the provider.
    pub async fn get_operation(&self, key: &ApiKey, operation: &Operation) -> VeoResult<Operation> {
        let url = format!(
            "{}/{}?key={}",
            self.config.base_url,
            operation.name,
            urlencoding::encode(key.as_str()),
        );

        debug!(operation = %operation.name, "Refreshing operation status");

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VeoError::from_provider_body(status, &body));
        }

        Ok(response.json().await?)
    }

    /// Download a finished artifact.
    ///
    /// The provider expects the credential appended as a query parameter.
    /// A 404 here means the key was invalidated or rotated, not that the
    /// artifact is missing.
    pub async fn download(&self, key: &ApiKey, uri: &str) -> VeoResult<Vec<u8>> {
        let url = download_url(uri, key);

        debug!("Downloading final artifact");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(VeoError::CredentialRejected);
        }

        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string();
            return Err(VeoError::DownloadFailed(reason));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Append the credential to an artifact URI, respecting any query string
/// the provider already put there.
fn download_url(uri: &str, key: &ApiKey) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!(
        "{}{}key={}",
        uri,
        separator,
        urlencoding::encode(key.as_str())
    )
}
