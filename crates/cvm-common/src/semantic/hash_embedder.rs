use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use super::{TermVector, TextEmbedderConfig, tokenizer};

/// 固定 seed（決定論的 hash のため）
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Feature-hashing bag-of-words embedder.
///
/// - No training, no model files
/// - O(n) in the number of tokens
/// - Vocabulary skills carry extra weight over plain terms
/// - SipHash13 with a fixed seed keeps vectors stable across Rust releases
pub struct HashTextEmbedder {
    pub config: TextEmbedderConfig,
}

impl HashTextEmbedder {
    pub fn new(config: TextEmbedderConfig) -> Self {
        let mut cfg = config;
        cfg.dimension = cfg.dimension.max(1);
        Self { config: cfg }
    }

    fn hash_token(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.config.dimension
    }

    /// Token → accumulated weight, with sublinear term frequency.
    pub fn term_weights(&self, text: &str) -> HashMap<String, f32> {
        let mut raw: HashMap<String, f32> = HashMap::new();
        for wt in tokenizer::tokenize_text(text, self.config.skill_token_weight) {
            *raw.entry(wt.token).or_insert(0.0) += wt.weight;
        }

        raw.into_iter()
            .map(|(token, weight)| (token, 1.0 + weight.ln().max(0.0)))
            .collect()
    }

    pub fn embed(&self, text: &str) -> TermVector {
        let mut raw = vec![0.0f32; self.config.dimension];
        for (token, weight) in self.term_weights(text) {
            raw[self.hash_token(&token)] += weight;
        }
        TermVector::from_raw(raw)
    }
}
