use crate::config::RankingConfig;
use crate::models::{CallRecord, SimilarCall};

/// Cosine similarity of two vectors
///
/// Returns 0.0 for empty inputs, mismatched lengths, zero magnitudes or a
/// non-finite result.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let magnitude = norm_a.sqrt() * norm_b.sqrt();
    if magnitude == 0.0 {
        return 0.0;
    }

    let similarity = dot / magnitude;
    if !similarity.is_finite() {
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0)
}

/// A stored call offered for ranking
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub call_id: &'a str,
    pub embedding: Option<&'a [f32]>,
    pub agent_id: &'a str,
    pub sentiment: Option<f64>,
}

impl<'a> From<&'a CallRecord> for Candidate<'a> {
    fn from(record: &'a CallRecord) -> Self {
        Self {
            call_id: &record.call_id,
            embedding: record.embedding.as_deref(),
            agent_id: &record.agent_id,
            sentiment: record.customer_sentiment_score,
        }
    }
}

/// Ranks candidates by cosine similarity to a query embedding
#[derive(Debug, Clone)]
pub struct SimilarityRanker {
    top_k: usize,
}

impl SimilarityRanker {
    pub fn new(config: &RankingConfig) -> Self {
        Self { top_k: config.top_k }
    }

    /// Top-K candidates, most similar first
    ///
    /// Candidates without an embedding are skipped; equal scores keep their
    /// input order. A missing query yields no results.
    pub fn rank(&self, query: Option<&[f32]>, candidates: &[Candidate<'_>]) -> Vec<SimilarCall> {
        let query = match query {
            Some(query) if !query.is_empty() => query,
            _ => return Vec::new(),
        };

        let mut scored: Vec<SimilarCall> = candidates
            .iter()
            .filter_map(|candidate| {
                let embedding = candidate.embedding.filter(|e| !e.is_empty())?;
                Some(SimilarCall {
                    call_id: candidate.call_id.to_string(),
                    similarity: cosine_similarity(query, embedding),
                    agent_id: candidate.agent_id.to_string(),
                    sentiment: candidate.sentiment,
                })
            })
            .collect();

        // sort_by is stable, so ties keep input order
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(self.top_k);
        scored
    }
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new(&RankingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::HashedEmbedder;

    fn candidate<'a>(call_id: &'a str, embedding: Option<&'a [f32]>) -> Candidate<'a> {
        Candidate {
            call_id,
            embedding,
            agent_id: "agent",
            sentiment: None,
        }
    }

    #[test]
    fn test_cosine_identity() {
        let v = [0.3f32, -1.2, 4.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 5.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let query = [1.0f32, 0.0];
        let vectors: Vec<[f32; 2]> = vec![
            [0.0, 1.0],
            [1.0, 0.1],
            [1.0, 1.0],
            [-1.0, 0.0],
            [1.0, 0.0],
            [1.0, 0.5],
            [0.5, 1.0],
        ];
        let ids: Vec<String> = (0..vectors.len()).map(|i| format!("c{i}")).collect();
        let candidates: Vec<Candidate> = ids
            .iter()
            .zip(&vectors)
            .map(|(id, v)| candidate(id, Some(v.as_slice())))
            .collect();

        let ranked = SimilarityRanker::default().rank(Some(&query), &candidates);

        assert_eq!(ranked.len(), 5);
        let order: Vec<&str> = ranked.iter().map(|r| r.call_id.as_str()).collect();
        assert_eq!(order, vec!["c4", "c1", "c5", "c2", "c6"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_rank_skips_missing_embeddings() {
        let query = [1.0f32, 0.0];
        let present = [0.0f32, 1.0];
        let empty: [f32; 0] = [];
        let candidates = vec![
            candidate("missing", None),
            candidate("empty", Some(&empty)),
            candidate("present", Some(&present)),
        ];

        let ranked = SimilarityRanker::default().rank(Some(&query), &candidates);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].call_id, "present");
        assert_eq!(ranked[0].similarity, 0.0);
    }

    #[test]
    fn test_rank_scores_length_mismatch_as_zero() {
        let query = [1.0f32, 0.0];
        let short = [1.0f32];
        let aligned = [1.0f32, 0.0];
        let candidates = vec![candidate("short", Some(&short)), candidate("aligned", Some(&aligned))];

        let ranked = SimilarityRanker::default().rank(Some(&query), &candidates);

        assert_eq!(ranked[0].call_id, "aligned");
        assert_eq!(ranked[1].call_id, "short");
        assert_eq!(ranked[1].similarity, 0.0);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let query = [1.0f32, 0.0];
        let same = [2.0f32, 0.0];
        let candidates = vec![
            candidate("first", Some(&same)),
            candidate("second", Some(&same)),
            candidate("third", Some(&same)),
        ];

        let ranked = SimilarityRanker::default().rank(Some(&query), &candidates);
        let order: Vec<&str> = ranked.iter().map(|r| r.call_id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_without_query() {
        let v = [1.0f32];
        let candidates = vec![candidate("c", Some(&v))];
        let ranker = SimilarityRanker::default();

        assert!(ranker.rank(None, &candidates).is_empty());
        assert!(ranker.rank(Some(&[]), &candidates).is_empty());
    }

    #[test]
    fn test_unrelated_texts_are_mostly_dissimilar() {
        let embedder = HashedEmbedder::default();
        let texts = [
            "my internet connection drops every evening",
            "please update the billing address on file",
            "the replacement blender arrived cracked",
            "how do i reset the password for the portal",
            "cancel the premium subscription immediately",
            "warranty claim for a broken washing machine",
        ];
        let embeddings: Vec<Vec<f32>> = texts.iter().map(|t| embedder.embed(t)).collect();

        let mut near_zero = 0;
        let mut near_one = 0;
        for i in 0..embeddings.len() {
            for j in (i + 1)..embeddings.len() {
                let similarity = cosine_similarity(&embeddings[i], &embeddings[j]);
                if similarity < 0.5 {
                    near_zero += 1;
                } else {
                    near_one += 1;
                }
            }
        }
        assert!(near_zero > near_one);
    }

    #[test]
    fn test_candidate_from_record() {
        let record: CallRecord = serde_json::from_value(serde_json::json!({
            "call_id": "c9",
            "agent_id": "a1",
            "customer_id": "u1",
            "start_time": "2024-05-01T09:00:00Z",
            "duration_seconds": 10,
            "transcript": "",
            "customer_sentiment_score": -0.5,
            "embedding": [1.0, 0.0]
        }))
        .unwrap();

        let candidate = Candidate::from(&record);
        assert_eq!(candidate.call_id, "c9");
        assert_eq!(candidate.embedding, Some([1.0f32, 0.0].as_slice()));
        assert_eq!(candidate.sentiment, Some(-0.5));
    }
}
