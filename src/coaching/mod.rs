use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::config::CoachingConfig;
use crate::models::SimilarCall;

pub const EMPATHY_NUDGE: &str =
    "Practice empathy - acknowledge customer frustration before offering solutions.";
pub const REINFORCEMENT_NUDGE: &str =
    "Great positive interaction! Maintain this energy in future calls.";
pub const ACTIVE_LISTENING_NUDGE: &str =
    "Try active listening - let customers express concerns fully before responding.";
pub const PROACTIVE_NUDGE: &str =
    "Take initiative - guide the conversation with proactive questions and solutions.";

/// Rule engine turning a call's signals into coaching nudges
///
/// Rule-triggered nudges come first. The remainder is drawn without
/// replacement from the default pool, skipping any text already chosen.
#[derive(Debug, Clone)]
pub struct CoachingAdvisor {
    config: CoachingConfig,
}

impl CoachingAdvisor {
    pub fn new(config: CoachingConfig) -> Self {
        Self { config }
    }

    /// Nudges for a call, padded using the thread-local RNG
    pub fn nudges(
        &self,
        sentiment: Option<f64>,
        talk_ratio: Option<f64>,
        similar: &[SimilarCall],
    ) -> Vec<String> {
        self.nudges_with_rng(sentiment, talk_ratio, similar, &mut rand::rng())
    }

    /// Nudges for a call, padded using `rng`
    ///
    /// Similar calls are accepted for future rules and do not affect the
    /// result yet.
    pub fn nudges_with_rng<R: Rng + ?Sized>(
        &self,
        sentiment: Option<f64>,
        talk_ratio: Option<f64>,
        _similar: &[SimilarCall],
        rng: &mut R,
    ) -> Vec<String> {
        let mut nudges = self.rule_nudges(sentiment, talk_ratio);
        let wanted = self.config.nudge_count;

        if nudges.len() < wanted {
            let mut pool: Vec<&String> = Vec::new();
            for nudge in &self.config.default_nudges {
                if !nudges.contains(nudge) && !pool.contains(&nudge) {
                    pool.push(nudge);
                }
            }

            let missing = wanted - nudges.len();
            nudges.extend(
                pool.choose_multiple(rng, missing.min(pool.len()))
                    .map(|nudge| nudge.to_string()),
            );
        }

        debug!(
            "Coaching: sentiment={:?} talk_ratio={:?} -> {} nudges",
            sentiment,
            talk_ratio,
            nudges.len()
        );

        nudges.truncate(wanted);
        nudges
    }

    /// Nudges triggered by the sentiment and talk ratio rules alone
    pub fn rule_nudges(&self, sentiment: Option<f64>, talk_ratio: Option<f64>) -> Vec<String> {
        let mut nudges = Vec::new();

        if let Some(sentiment) = sentiment {
            if sentiment < self.config.negative_sentiment_below {
                nudges.push(EMPATHY_NUDGE.to_string());
            } else if sentiment > self.config.positive_sentiment_above {
                nudges.push(REINFORCEMENT_NUDGE.to_string());
            }
        }

        if let Some(ratio) = talk_ratio {
            if ratio > self.config.high_talk_ratio_above {
                nudges.push(ACTIVE_LISTENING_NUDGE.to_string());
            } else if ratio < self.config.low_talk_ratio_below {
                nudges.push(PROACTIVE_NUDGE.to_string());
            }
        }

        nudges
    }
}

impl Default for CoachingAdvisor {
    fn default() -> Self {
        Self::new(CoachingConfig::default())
    }
}
