use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EmbeddingModel, InferenceError, LabelScore, SentimentModel};

/// Configuration for the model inference server
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of a text-embeddings-inference compatible server
    pub base_url: String,
    /// Bearer token, if the server requires one
    pub api_token: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl InferenceConfig {
    /// Create config from environment variables
    ///
    /// Fails with [`InferenceError::Unavailable`] when no server is configured.
    pub fn from_env() -> Result<Self, InferenceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InferenceError> {
        let base_url = lookup("CALLSIGHT_INFERENCE_URL").ok_or_else(|| {
            InferenceError::Unavailable("CALLSIGHT_INFERENCE_URL not set".to_string())
        })?;
        let api_token = lookup("CALLSIGHT_INFERENCE_TOKEN");
        let timeout_ms = match lookup("CALLSIGHT_INFERENCE_TIMEOUT_MS") {
            Some(value) => value.trim().parse().map_err(|_| {
                InferenceError::Unavailable(format!(
                    "CALLSIGHT_INFERENCE_TIMEOUT_MS must be an integer, got {:?}",
                    value
                ))
            })?,
            None => 5000,
        };

        Ok(Self {
            base_url,
            api_token,
            timeout_ms,
        })
    }

    /// Create with custom settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout_ms: 5000,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// HTTP client for a sentence encoder and a sentiment classifier
///
/// Speaks the text-embeddings-inference API: `POST /embed`, `POST /predict`
/// and `GET /health`.
pub struct InferenceClient {
    client: Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build inference HTTP client")?;
        Ok(Self { client, config })
    }

    /// Check the server is reachable and healthy
    pub async fn probe(&self) -> Result<(), InferenceError> {
        let request = self.client.get(self.config.endpoint("health"));
        self.send(request).await?;
        Ok(())
    }

    /// Encode `text` into a sentence embedding
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, InferenceError> {
        let request = self
            .client
            .post(self.config.endpoint("embed"))
            .json(&InferenceRequest { inputs: text });

        let response: Vec<Vec<f32>> = self.send(request).await?.json().await?;
        debug!("Received {} embedding(s)", response.len());

        response
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::malformed("empty embedding batch"))
    }

    /// Classify the sentiment of `text`
    pub async fn predict(&self, text: &str) -> Result<Vec<LabelScore>, InferenceError> {
        let request = self
            .client
            .post(self.config.endpoint("predict"))
            .json(&InferenceRequest { inputs: text });

        let response: PredictResponse = self.send(request).await?.json().await?;
        let scores = match response {
            PredictResponse::Single(scores) => scores,
            PredictResponse::Batch(batch) => batch.into_iter().next().unwrap_or_default(),
        };

        if scores.is_empty() {
            return Err(InferenceError::malformed("no class scores returned"));
        }
        Ok(scores)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, InferenceError> {
        let request = match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(self.config.timeout_ms)
            } else {
                InferenceError::Request(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl SentimentModel for InferenceClient {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, InferenceError> {
        self.predict(text).await
    }
}

#[async_trait]
impl EmbeddingModel for InferenceClient {
    async fn encode(&self, text: &str) -> Result<Vec<f32>, InferenceError> {
        self.embed(text).await
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Single(Vec<LabelScore>),
    Batch(Vec<Vec<LabelScore>>),
}
