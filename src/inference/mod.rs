pub mod client;
pub mod error;

pub use client::*;
pub use error::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Confidence for one sentiment class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// A sentiment classifier returning per-class confidences
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, InferenceError>;
}

/// A sentence encoder returning a fixed-length vector
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn encode(&self, text: &str) -> Result<Vec<f32>, InferenceError>;
}
