use std::collections::HashSet;

use crate::config::SentimentConfig;

use super::tokenize;

/// Lexicon and punctuation sentiment scorer
///
/// Scores are `(positive - negative) / (positive + negative + neutral)`,
/// where `!` adds to the positive tally and `?` to the negative one.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    positive: HashSet<String>,
    negative: HashSet<String>,
    neutral: HashSet<String>,
    exclamation_weight: f64,
    question_weight: f64,
}

impl LexiconScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        let to_set = |words: &[String]| -> HashSet<String> {
            words.iter().map(|w| w.to_lowercase()).collect()
        };

        Self {
            positive: to_set(&config.positive_words),
            negative: to_set(&config.negative_words),
            neutral: to_set(&config.neutral_words),
            exclamation_weight: config.exclamation_weight,
            question_weight: config.question_weight,
        }
    }

    /// Score `text` in [-1, 1]; blank or indicator-free text scores 0.0
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let mut positive = 0.0;
        let mut negative = 0.0;
        let mut neutral = 0.0;

        for word in tokenize(text) {
            if self.positive.contains(&word) {
                positive += 1.0;
            } else if self.negative.contains(&word) {
                negative += 1.0;
            } else if self.neutral.contains(&word) {
                neutral += 1.0;
            }
        }

        positive += text.matches('!').count() as f64 * self.exclamation_weight;
        negative += text.matches('?').count() as f64 * self.question_weight;

        let total = positive + negative + neutral;
        if total == 0.0 {
            return 0.0;
        }

        ((positive - negative) / total).clamp(-1.0, 1.0)
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(&SentimentConfig::default())
    }
}
