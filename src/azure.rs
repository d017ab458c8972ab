//! Azure OpenAI embedding provider using the deployments REST API.
//!
//! This module is only available when the `azure-openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SearchError};

/// The default deployment name for Azure OpenAI embeddings.
const DEFAULT_DEPLOYMENT: &str = "text-embedding-ada-002";

/// The default dimensionality for `text-embedding-ada-002`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// The default Azure OpenAI API version.
const DEFAULT_API_VERSION: &str = "2023-07-01-preview";

/// An [`EmbeddingProvider`] backed by the Azure OpenAI embeddings API.
///
/// Uses `reqwest` to call the
/// `/openai/deployments/{deployment}/embeddings` endpoint directly.
///
/// # Configuration
///
/// - `deployment` – defaults to `text-embedding-ada-002`.
/// - `api_version` – defaults to `2023-07-01-preview`.
/// - `endpoint` and `api_key` – from the constructor or the
///   `AZURE_OPENAI_ENDPOINT` / `AZURE_OPENAI_API_KEY` environment variables.
///
/// # Example
///
/// ```rust,ignore
/// use acl_search::azure::AzureEmbeddingProvider;
///
/// let provider = AzureEmbeddingProvider::new("https://my-resource.openai.azure.com", "key")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct AzureEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    dimensions: usize,
}

impl AzureEmbeddingProvider {
    /// Create a new provider for the given resource endpoint and API key.
    ///
    /// Uses the default deployment (`text-embedding-ada-002`) and API
    /// version (`2023-07-01-preview`).
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let api_key = api_key.into();
        if endpoint.is_empty() {
            return Err(SearchError::Embedding {
                provider: "AzureOpenAI".into(),
                message: "endpoint must not be empty".into(),
            });
        }
        if api_key.is_empty() {
            return Err(SearchError::Embedding {
                provider: "AzureOpenAI".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            deployment: DEFAULT_DEPLOYMENT.into(),
            api_version: DEFAULT_API_VERSION.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create a new provider from the `AZURE_OPENAI_ENDPOINT` and
    /// `AZURE_OPENAI_API_KEY` environment variables.
    pub fn from_env() -> Result<Self> {
        let endpoint =
            std::env::var("AZURE_OPENAI_ENDPOINT").map_err(|_| SearchError::Embedding {
                provider: "AzureOpenAI".into(),
                message: "AZURE_OPENAI_ENDPOINT environment variable not set".into(),
            })?;
        let api_key = std::env::var("AZURE_OPENAI_API_KEY").map_err(|_| SearchError::Embedding {
            provider: "AzureOpenAI".into(),
            message: "AZURE_OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(endpoint, api_key)
    }

    /// Set the deployment name of the embedding model.
    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    /// Set the API version query parameter.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the dimensionality reported for this deployment's embeddings.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    fn embeddings_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

// ── Azure OpenAI API request/response types ────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for AzureEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(
            provider = "AzureOpenAI",
            deployment = %self.deployment,
            text_len = text.len(),
            "embedding query text"
        );

        let response = self
            .client
            .post(self.embeddings_url())
            .header("api-key", &self.api_key)
            .json(&EmbeddingRequest { input: text })
            .send()
            .await
            .map_err(|e| {
                error!(provider = "AzureOpenAI", error = %e, "request failed");
                SearchError::Embedding {
                    provider: "AzureOpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "AzureOpenAI", %status, "API error");
            return Err(SearchError::Embedding {
                provider: "AzureOpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "AzureOpenAI", error = %e, "failed to parse response");
            SearchError::Embedding {
                provider: "AzureOpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        embedding_response.data.into_iter().next().map(|d| d.embedding).ok_or_else(|| {
            SearchError::Embedding {
                provider: "AzureOpenAI".into(),
                message: "API returned empty response".into(),
            }
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
