use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Root configuration for the analytics core
///
/// Every section falls back to its defaults, so a TOML file only needs the
/// keys it wants to override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub talk_ratio: TalkRatioConfig,
    pub sentiment: SentimentConfig,
    pub embedding: EmbeddingConfig,
    pub ranking: RankingConfig,
    pub coaching: CoachingConfig,
}

/// Talk ratio configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TalkRatioConfig {
    /// Words that do not count towards either speaker
    pub filler_words: Vec<String>,
}

/// Lexicon and punctuation weights for the heuristic sentiment scorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SentimentConfig {
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub neutral_words: Vec<String>,
    /// Added to the positive tally per `!`
    pub exclamation_weight: f64,
    /// Added to the negative tally per `?`
    pub question_weight: f64,
}

/// Hashed embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Marker appended to a token to derive its secondary index
    pub suffix_marker: String,
    /// Weight lost between the first and the last token position
    pub position_decay: f64,
    pub secondary_weight: f64,
    pub tertiary_weight: f64,
}

/// Similar-call ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    pub top_k: usize,
}

/// Coaching rule thresholds and the default nudge pool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoachingConfig {
    /// Number of nudges returned per request
    pub nudge_count: usize,
    /// Sentiment strictly above this triggers positive reinforcement
    pub positive_sentiment_above: f64,
    /// Sentiment strictly below this triggers the empathy nudge
    pub negative_sentiment_below: f64,
    /// Talk ratio strictly above this triggers the listening nudge
    pub high_talk_ratio_above: f64,
    /// Talk ratio strictly below this triggers the questioning nudge
    pub low_talk_ratio_below: f64,
    pub default_nudges: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for TalkRatioConfig {
    fn default() -> Self {
        Self {
            filler_words: words(&[
                "um", "uh", "er", "ah", "like", "you know", "i mean", "well", "so",
            ]),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_words: words(&[
                "good",
                "great",
                "excellent",
                "thank",
                "thanks",
                "perfect",
                "satisfied",
                "happy",
                "wonderful",
                "amazing",
                "fantastic",
                "awesome",
                "love",
                "best",
                "brilliant",
                "outstanding",
                "superb",
                "pleased",
                "delighted",
                "impressed",
                "appreciate",
                "helpful",
                "resolved",
                "solution",
                "working",
                "fixed",
                "clear",
                "easy",
                "smooth",
                "efficient",
                "professional",
                "courteous",
                "patient",
                "understanding",
                "kind",
            ]),
            negative_words: words(&[
                "bad",
                "terrible",
                "awful",
                "hate",
                "angry",
                "frustrated",
                "problem",
                "issue",
                "horrible",
                "disgusting",
                "worst",
                "useless",
                "disappointed",
                "annoyed",
                "furious",
                "outraged",
                "unacceptable",
                "pathetic",
                "ridiculous",
                "stupid",
                "broken",
                "failed",
                "error",
                "wrong",
                "confusing",
                "difficult",
                "waste",
                "rude",
                "unhelpful",
                "slow",
                "incompetent",
                "disaster",
                "nightmare",
            ]),
            neutral_words: words(&[
                "okay", "fine", "alright", "normal", "average", "standard", "regular",
            ]),
            exclamation_weight: 0.2,
            question_weight: 0.1,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            suffix_marker: "_pos".to_string(),
            position_decay: 0.1,
            secondary_weight: 0.5,
            tertiary_weight: 0.3,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            nudge_count: 3,
            positive_sentiment_above: 0.5,
            negative_sentiment_below: 0.0,
            high_talk_ratio_above: 0.7,
            low_talk_ratio_below: 0.3,
            default_nudges: words(&[
                "Summarize key points to ensure customer understanding and agreement.",
                "Use positive language and avoid negative words like 'can't' or 'won't'.",
                "Ask open-ended questions to better understand customer needs.",
                "Confirm next steps and set clear expectations before ending calls.",
                "Practice patience - some customers need more time to process information.",
            ]),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing sections and keys keep their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse analytics config")
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
