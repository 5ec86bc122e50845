use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::coaching::CoachingAdvisor;
use crate::config::AnalyticsConfig;
use crate::heuristics::{HashedEmbedder, LexiconScorer, TalkRatioCalculator};
use crate::inference::{
    EmbeddingModel, InferenceClient, InferenceConfig, InferenceError, SentimentModel,
};
use crate::models::{parse_transcript, CallRecord, CallSignals, Recommendations, SimilarCall};
use crate::ranking::{Candidate, SimilarityRanker};

use super::{
    EmbeddingSynthesizer, HeuristicEmbedding, HeuristicSentiment, ModelEmbedding, ModelSentiment,
    SentimentScorer,
};

/// The analytics core: signal derivation, similar-call ranking and coaching
///
/// Strategies are chosen once at construction. Everything held here is
/// read-only, so one analyzer can be shared across tasks behind an `Arc`.
pub struct Analyzer {
    talk_ratio: TalkRatioCalculator,
    sentiment: Arc<dyn SentimentScorer>,
    embedding: Arc<dyn EmbeddingSynthesizer>,
    ranker: SimilarityRanker,
    advisor: CoachingAdvisor,
}

impl Analyzer {
    /// Analyzer using only the lexicon and hashing strategies
    pub fn heuristic(config: &AnalyticsConfig) -> Self {
        let (sentiment, embedding) = heuristic_strategies(config);
        Self::assemble(config, Arc::new(sentiment), Arc::new(embedding))
    }

    /// Analyzer delegating to external models, with per-call heuristic fallback
    pub fn with_models(
        config: &AnalyticsConfig,
        sentiment_model: Arc<dyn SentimentModel>,
        embedding_model: Arc<dyn EmbeddingModel>,
        timeout: Option<Duration>,
    ) -> Self {
        let (sentiment, embedding) = heuristic_strategies(config);
        Self::assemble(
            config,
            Arc::new(ModelSentiment::new(sentiment_model, sentiment, timeout)),
            Arc::new(ModelEmbedding::new(embedding_model, embedding, timeout)),
        )
    }

    /// Analyzer backed by an inference server, if it is reachable
    ///
    /// The server is probed once here. When it cannot be reached the analyzer
    /// runs heuristically for its whole lifetime.
    pub async fn connect(config: &AnalyticsConfig, inference: InferenceConfig) -> Self {
        let timeout = inference.timeout();
        let base_url = inference.base_url.clone();

        let client = match InferenceClient::new(inference) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("Inference client unavailable, using heuristics: {:#}", e);
                return Self::heuristic(config);
            }
        };

        match client.probe().await {
            Ok(()) => {
                info!("Using inference server at {}", base_url);
                Self::with_models(config, client.clone(), client, Some(timeout))
            }
            Err(e) => {
                warn!(
                    "Inference server at {} failed health check, using heuristics: {}",
                    base_url, e
                );
                Self::heuristic(config)
            }
        }
    }

    /// Analyzer backed by the inference server named in the environment
    ///
    /// Without a usable `CALLSIGHT_INFERENCE_URL` the analyzer is heuristic.
    pub async fn from_env(config: &AnalyticsConfig) -> Self {
        Self::connect_configured(config, InferenceConfig::from_env()).await
    }

    async fn connect_configured(
        config: &AnalyticsConfig,
        inference: Result<InferenceConfig, InferenceError>,
    ) -> Self {
        match inference {
            Ok(inference) => Self::connect(config, inference).await,
            Err(e) => {
                warn!("No inference server configured, using heuristics: {}", e);
                Self::heuristic(config)
            }
        }
    }

    fn assemble(
        config: &AnalyticsConfig,
        sentiment: Arc<dyn SentimentScorer>,
        embedding: Arc<dyn EmbeddingSynthesizer>,
    ) -> Self {
        Self {
            talk_ratio: TalkRatioCalculator::new(&config.talk_ratio),
            sentiment,
            embedding,
            ranker: SimilarityRanker::new(&config.ranking),
            advisor: CoachingAdvisor::new(config.coaching.clone()),
        }
    }

    /// Names of the active sentiment and embedding strategies
    pub fn strategies(&self) -> (&'static str, &'static str) {
        (self.sentiment.name(), self.embedding.name())
    }

    /// Derive talk ratio, customer sentiment and embedding for one transcript
    pub async fn derive_signals(&self, transcript: &str) -> CallSignals {
        let speakers = parse_transcript(transcript);
        let talk_ratio = self.talk_ratio.ratio(&speakers);

        let (sentiment, embedding) = tokio::join!(
            self.sentiment.score(&speakers.customer),
            self.embedding.embed(transcript)
        );

        CallSignals {
            talk_ratio,
            sentiment: sentiment.clamp(-1.0, 1.0),
            embedding,
        }
    }

    /// Derive signals for many calls, at most `concurrency` at a time
    ///
    /// Results are returned in the order of `records`.
    pub async fn derive_batch(
        self: &Arc<Self>,
        records: &[CallRecord],
        concurrency: usize,
    ) -> Result<Vec<CallSignals>> {
        let permits = Arc::new(Semaphore::new(concurrency.clamp(1, Semaphore::MAX_PERMITS)));
        let mut tasks = JoinSet::new();

        for (index, record) in records.iter().enumerate() {
            let analyzer = Arc::clone(self);
            let permits = Arc::clone(&permits);
            let transcript = record.transcript.clone();

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await?;
                let signals = analyzer.derive_signals(&transcript).await;
                anyhow::Ok((index, signals))
            });
        }

        let mut results: Vec<Option<CallSignals>> = vec![None; records.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, signals) = joined??;
            debug!("Derived signals for call {}", records[index].call_id);
            results[index] = Some(signals);
        }

        Ok(results.into_iter().flatten().collect())
    }

    /// Rank candidates by similarity to `query`
    pub fn rank_similar(
        &self,
        query: Option<&[f32]>,
        candidates: &[Candidate<'_>],
    ) -> Vec<SimilarCall> {
        self.ranker.rank(query, candidates)
    }

    /// Coaching nudges for a call's stored signals
    pub fn coaching_nudges(
        &self,
        sentiment: Option<f64>,
        talk_ratio: Option<f64>,
        similar: &[SimilarCall],
    ) -> Vec<String> {
        self.advisor.nudges(sentiment, talk_ratio, similar)
    }

    /// Similar calls and coaching for `target`, compared against `others`
    ///
    /// Records sharing the target's `call_id` are never candidates.
    pub fn recommend(&self, target: &CallRecord, others: &[CallRecord]) -> Recommendations {
        self.recommend_with_rng(target, others, &mut rand::rng())
    }

    /// Like [`Analyzer::recommend`], padding nudges from `rng`
    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        target: &CallRecord,
        others: &[CallRecord],
        rng: &mut R,
    ) -> Recommendations {
        let candidates: Vec<Candidate> = others
            .iter()
            .filter(|record| record.call_id != target.call_id)
            .map(Candidate::from)
            .collect();

        let similar_calls = self.rank_similar(target.embedding.as_deref(), &candidates);
        let coaching_nudges = self.advisor.nudges_with_rng(
            target.customer_sentiment_score,
            target.agent_talk_ratio,
            &similar_calls,
            rng,
        );

        Recommendations {
            similar_calls,
            coaching_nudges,
        }
    }
}

fn heuristic_strategies(config: &AnalyticsConfig) -> (HeuristicSentiment, HeuristicEmbedding) {
    (
        HeuristicSentiment::new(Arc::new(LexiconScorer::new(&config.sentiment))),
        HeuristicEmbedding::new(Arc::new(HashedEmbedder::new(&config.embedding))),
    )
}
