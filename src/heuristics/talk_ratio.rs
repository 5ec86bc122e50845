use std::collections::HashSet;

use crate::config::TalkRatioConfig;
use crate::models::SpeakerText;

use super::tokenize;

/// Ratio reported when neither speaker said anything countable
pub const NEUTRAL_TALK_RATIO: f64 = 0.5;

/// Computes the agent's share of non-filler words
#[derive(Debug, Clone)]
pub struct TalkRatioCalculator {
    filler_words: HashSet<String>,
}

impl TalkRatioCalculator {
    pub fn new(config: &TalkRatioConfig) -> Self {
        Self {
            filler_words: config
                .filler_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Talk ratio for already split speaker text
    pub fn ratio(&self, speakers: &SpeakerText) -> f64 {
        let agent_words = self.count_words(&speakers.agent);
        let customer_words = self.count_words(&speakers.customer);
        let total = agent_words + customer_words;

        if total == 0 {
            return NEUTRAL_TALK_RATIO;
        }

        agent_words as f64 / total as f64
    }

    fn count_words(&self, text: &str) -> usize {
        tokenize(text)
            .iter()
            .filter(|word| !self.filler_words.contains(word.as_str()))
            .count()
    }
}

impl Default for TalkRatioCalculator {
    fn default() -> Self {
        Self::new(&TalkRatioConfig::default())
    }
}
