use std::collections::BTreeMap;

use crate::config::EmbeddingConfig;

use super::tokenize;

/// Length of every embedding produced or accepted by the crate
pub const EMBEDDING_DIM: usize = 384;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the UTF-8 bytes of `text`
///
/// Unseeded, so an index computed today matches one computed by any other
/// process or build.
pub fn stable_hash(text: &str) -> u64 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

fn bucket(text: &str) -> usize {
    (stable_hash(text) % EMBEDDING_DIM as u64) as usize
}

/// Feature-hashing embedder used when no encoder model is available
///
/// Each token lands in three buckets (the token itself, the token with a
/// suffix marker, the token with its length appended), weighted by position.
/// Primary buckets are then scaled by an inverse-frequency factor and the
/// result is L2-normalized.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    suffix_marker: String,
    position_decay: f64,
    secondary_weight: f64,
    tertiary_weight: f64,
}

impl HashedEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            suffix_marker: config.suffix_marker.clone(),
            position_decay: config.position_decay,
            secondary_weight: config.secondary_weight,
            tertiary_weight: config.tertiary_weight,
        }
    }

    /// Embed `text` into [`EMBEDDING_DIM`] floats
    ///
    /// Text without word tokens yields the zero vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; EMBEDDING_DIM];
        }

        let n = tokens.len() as f64;
        let mut accumulator = vec![0.0f64; EMBEDDING_DIM];
        // Ordered map keeps the scaling pass deterministic when buckets collide
        let mut frequencies: BTreeMap<&str, usize> = BTreeMap::new();

        for (i, token) in tokens.iter().enumerate() {
            *frequencies.entry(token.as_str()).or_insert(0) += 1;

            let weight = 1.0 - (i as f64 / n) * self.position_decay;
            let primary = bucket(token);
            let secondary = bucket(&format!("{}{}", token, self.suffix_marker));
            let tertiary = bucket(&format!("{}{}", token, token.chars().count()));

            accumulator[primary] += weight;
            accumulator[secondary] += weight * self.secondary_weight;
            accumulator[tertiary] += weight * self.tertiary_weight;
        }

        for (token, frequency) in &frequencies {
            accumulator[bucket(token)] *= (1.0 + n / *frequency as f64).ln();
        }

        normalize(&accumulator)
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(&EmbeddingConfig::default())
    }
}

/// L2-normalize into f32; a zero-magnitude input stays zero
pub fn normalize(values: &[f64]) -> Vec<f32> {
    let magnitude = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v / magnitude) as f32).collect()
}

/// Euclidean norm of an embedding
pub fn l2_norm(vector: &[f32]) -> f64 {
    vector
        .iter()
        .map(|&v| f64::from(v) * f64::from(v))
        .sum::<f64>()
        .sqrt()
}
