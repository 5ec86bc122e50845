use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::heuristics::LexiconScorer;
use crate::inference::{InferenceError, LabelScore, SentimentModel};

/// Produces a sentiment score in [-1, 1]
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> f64;

    /// Short strategy name for logs
    fn name(&self) -> &'static str;
}

/// Lexicon and punctuation strategy, always available
#[derive(Debug, Clone)]
pub struct HeuristicSentiment {
    lexicon: Arc<LexiconScorer>,
}

impl HeuristicSentiment {
    pub fn new(lexicon: Arc<LexiconScorer>) -> Self {
        Self { lexicon }
    }

    pub fn score_sync(&self, text: &str) -> f64 {
        self.lexicon.score(text)
    }
}

#[async_trait]
impl SentimentScorer for HeuristicSentiment {
    async fn score(&self, text: &str) -> f64 {
        self.score_sync(text)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Classifier-backed strategy
///
/// A failed classification falls back to the lexicon for that call only; the
/// next call tries the classifier again.
pub struct ModelSentiment {
    model: Arc<dyn SentimentModel>,
    fallback: HeuristicSentiment,
    timeout: Option<Duration>,
}

impl ModelSentiment {
    pub fn new(
        model: Arc<dyn SentimentModel>,
        fallback: HeuristicSentiment,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            model,
            fallback,
            timeout,
        }
    }

    async fn classify(&self, text: &str) -> Result<f64, InferenceError> {
        let scores = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.model.classify(text))
                .await
                .map_err(|_| InferenceError::Timeout(limit.as_millis() as u64))??,
            None => self.model.classify(text).await?,
        };
        weighted_score(&scores)
    }
}

#[async_trait]
impl SentimentScorer for ModelSentiment {
    async fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        match self.classify(text).await {
            Ok(score) => score,
            Err(e) => {
                warn!("Sentiment model failed, using lexicon fallback: {}", e);
                self.fallback.score_sync(text)
            }
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

/// Map a class label to its polarity
fn label_polarity(label: &str) -> Option<f64> {
    match label.to_ascii_lowercase().as_str() {
        "label_0" | "negative" | "neg" => Some(-1.0),
        "label_1" | "neutral" | "neu" => Some(0.0),
        "label_2" | "positive" | "pos" => Some(1.0),
        _ => None,
    }
}

/// Confidence-weighted polarity sum, clamped to [-1, 1]
///
/// Unknown labels are ignored; output with no known label is malformed.
pub fn weighted_score(scores: &[LabelScore]) -> Result<f64, InferenceError> {
    let mut total = 0.0;
    let mut recognized = 0;

    for class in scores {
        if !class.score.is_finite() {
            return Err(InferenceError::malformed(format!(
                "non-finite confidence for {}",
                class.label
            )));
        }
        if let Some(polarity) = label_polarity(&class.label) {
            total += polarity * class.score;
            recognized += 1;
        }
    }

    if recognized == 0 {
        return Err(InferenceError::malformed("no recognized sentiment labels"));
    }

    Ok(total.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn label(label: &str, score: f64) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    fn heuristic() -> HeuristicSentiment {
        HeuristicSentiment::new(Arc::new(LexiconScorer::default()))
    }

    /// Fails on every odd-numbered call
    struct FlakyClassifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SentimentModel for FlakyClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, InferenceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 0 {
                Err(InferenceError::Unavailable("model crashed".to_string()))
            } else {
                Ok(vec![label("LABEL_0", 0.1), label("LABEL_1", 0.2), label("LABEL_2", 0.7)])
            }
        }
    }

    struct SlowClassifier;

    #[async_trait]
    impl SentimentModel for SlowClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, InferenceError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![label("positive", 1.0)])
        }
    }

    struct FixedClassifier(Vec<LabelScore>);

    #[async_trait]
    impl SentimentModel for FixedClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, InferenceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_weighted_score() {
        let score = weighted_score(&[
            label("LABEL_0", 0.1),
            label("LABEL_1", 0.2),
            label("LABEL_2", 0.7),
        ])
        .unwrap();
        assert!((score - 0.6).abs() < 1e-12);

        let score = weighted_score(&[label("Negative", 0.9), label("other", 5.0)]).unwrap();
        assert!((score + 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_score_is_clamped() {
        let score = weighted_score(&[label("positive", 3.0)]).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_weighted_score_rejects_malformed_output() {
        assert!(weighted_score(&[]).is_err());
        assert!(weighted_score(&[label("joy", 0.9)]).is_err());
        assert!(weighted_score(&[label("positive", f64::NAN)]).is_err());
    }

    #[tokio::test]
    async fn test_fallback_is_per_call() {
        let scorer = ModelSentiment::new(
            Arc::new(FlakyClassifier {
                calls: AtomicUsize::new(0),
            }),
            heuristic(),
            None,
        );
        let text = "This is terrible awful service";

        // First call fails and falls back to the lexicon
        assert_eq!(scorer.score(text).await, heuristic().score_sync(text));
        // Second call reaches the model again
        assert!((scorer.score(text).await - 0.6).abs() < 1e-12);
        // And the failure after that falls back again
        assert_eq!(scorer.score(text).await, -1.0);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let scorer = ModelSentiment::new(
            Arc::new(SlowClassifier),
            heuristic(),
            Some(Duration::from_millis(20)),
        );

        assert_eq!(scorer.score("great service thanks").await, 1.0);
        assert_eq!(scorer.score("so so").await, 0.0);
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back() {
        let scorer = ModelSentiment::new(
            Arc::new(FixedClassifier(vec![label("surprise", 1.0)])),
            heuristic(),
            None,
        );
        assert_eq!(scorer.score("I hate this").await, -1.0);
    }

    #[tokio::test]
    async fn test_blank_text_skips_model() {
        let scorer = ModelSentiment::new(
            Arc::new(FixedClassifier(vec![label("positive", 1.0)])),
            heuristic(),
            None,
        );
        assert_eq!(scorer.score("   ").await, 0.0);
        assert_eq!(scorer.score("fine").await, 1.0);
        assert_eq!(scorer.name(), "model");
    }
}
