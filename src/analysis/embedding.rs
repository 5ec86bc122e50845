use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::heuristics::{normalize, HashedEmbedder, EMBEDDING_DIM};
use crate::inference::{EmbeddingModel, InferenceError};

/// Produces an [`EMBEDDING_DIM`]-length unit (or zero) vector
#[async_trait]
pub trait EmbeddingSynthesizer: Send + Sync {
    async fn embed(&self, text: &str) -> Vec<f32>;

    /// Short strategy name for logs
    fn name(&self) -> &'static str;
}

/// Feature-hashing strategy, always available
#[derive(Debug, Clone)]
pub struct HeuristicEmbedding {
    embedder: Arc<HashedEmbedder>,
}

impl HeuristicEmbedding {
    pub fn new(embedder: Arc<HashedEmbedder>) -> Self {
        Self { embedder }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        self.embedder.embed(text)
    }
}

#[async_trait]
impl EmbeddingSynthesizer for HeuristicEmbedding {
    async fn embed(&self, text: &str) -> Vec<f32> {
        self.embed_sync(text)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Encoder-backed strategy with a per-call hashed fallback
pub struct ModelEmbedding {
    model: Arc<dyn EmbeddingModel>,
    fallback: HeuristicEmbedding,
    timeout: Option<Duration>,
}

impl ModelEmbedding {
    pub fn new(
        model: Arc<dyn EmbeddingModel>,
        fallback: HeuristicEmbedding,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            model,
            fallback,
            timeout,
        }
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>, InferenceError> {
        let raw = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.model.encode(text))
                .await
                .map_err(|_| InferenceError::Timeout(limit.as_millis() as u64))??,
            None => self.model.encode(text).await?,
        };
        validate_embedding(&raw)
    }
}

#[async_trait]
impl EmbeddingSynthesizer for ModelEmbedding {
    async fn embed(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            return vec![0.0; EMBEDDING_DIM];
        }

        match self.encode(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Embedding model failed, using hashed fallback: {}", e);
                self.fallback.embed_sync(text)
            }
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

/// Check shape and values of an encoder output and L2-normalize it
pub fn validate_embedding(raw: &[f32]) -> Result<Vec<f32>, InferenceError> {
    if raw.len() != EMBEDDING_DIM {
        return Err(InferenceError::malformed(format!(
            "expected {} dimensions, got {}",
            EMBEDDING_DIM,
            raw.len()
        )));
    }
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(InferenceError::malformed("non-finite embedding value"));
    }

    let values: Vec<f64> = raw.iter().map(|&v| f64::from(v)).collect();
    let normalized = normalize(&values);
    if normalized.iter().all(|&v| v == 0.0) {
        return Err(InferenceError::malformed("zero-magnitude embedding"));
    }
    Ok(normalized)
}
