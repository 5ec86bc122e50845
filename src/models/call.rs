use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored call with its transcript and any previously derived signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    /// Record identifier (UUID), generated when the input omits it
    #[serde(default = "generate_record_id")]
    pub id: String,
    /// External call identifier
    pub call_id: String,
    pub agent_id: String,
    pub customer_id: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub start_time: DateTime<Utc>,
    pub duration_seconds: u32,
    /// Raw transcript with `Agent:` / `Customer:` line prefixes
    pub transcript: String,
    #[serde(default)]
    pub agent_talk_ratio: Option<f64>,
    #[serde(default)]
    pub customer_sentiment_score: Option<f64>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

fn generate_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl CallRecord {
    /// Whether all three signals have been derived for this call
    pub fn has_signals(&self) -> bool {
        self.agent_talk_ratio.is_some()
            && self.customer_sentiment_score.is_some()
            && self.embedding.is_some()
    }

    /// Return a copy of this record carrying the given signals
    pub fn with_signals(&self, signals: &CallSignals) -> Self {
        Self {
            agent_talk_ratio: Some(signals.talk_ratio),
            customer_sentiment_score: Some(signals.sentiment),
            embedding: Some(signals.embedding.clone()),
            ..self.clone()
        }
    }
}

/// The three signals derived from one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSignals {
    /// Agent share of non-filler words, in [0, 1]
    pub talk_ratio: f64,
    /// Customer sentiment, in [-1, 1]
    pub sentiment: f64,
    /// Unit-length (or zero) embedding of the full transcript
    pub embedding: Vec<f32>,
}

/// One entry of a similar-calls ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCall {
    pub call_id: String,
    /// Cosine similarity to the query, in [-1, 1]
    pub similarity: f64,
    pub agent_id: String,
    pub sentiment: Option<f64>,
}

/// Similar calls plus coaching nudges for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub similar_calls: Vec<SimilarCall>,
    pub coaching_nudges: Vec<String>,
}

/// Aggregated signals for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnalytics {
    pub agent_id: String,
    pub avg_sentiment: f64,
    pub avg_talk_ratio: f64,
    pub total_calls: usize,
}
