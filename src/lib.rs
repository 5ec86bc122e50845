pub mod analysis;
pub mod coaching;
pub mod config;
pub mod heuristics;
pub mod inference;
pub mod io;
pub mod models;
pub mod ranking;

pub use analysis::{Analyzer, EmbeddingSynthesizer, SentimentScorer};
pub use coaching::CoachingAdvisor;
pub use config::AnalyticsConfig;
pub use heuristics::{HashedEmbedder, LexiconScorer, TalkRatioCalculator, EMBEDDING_DIM};
pub use inference::{InferenceClient, InferenceConfig, InferenceError};
pub use io::{load_calls, write_calls_json, RecommendationReport};
pub use models::{
    parse_transcript, AgentAnalytics, CallRecord, CallSignals, Recommendations, SimilarCall,
    SpeakerText,
};
pub use ranking::{agent_leaderboard, cosine_similarity, Candidate, SimilarityRanker};
