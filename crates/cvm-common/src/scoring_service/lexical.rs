use async_trait::async_trait;

use super::{ScoringService, ScoringUnavailable, ServiceScore};
use crate::semantic::{HashTextEmbedder, TextEmbedderConfig, text_similarity};

/// Offline stand-in for the LLM: scores by hashed bag-of-words overlap.
pub struct LexicalScoringService {
    embedder: HashTextEmbedder,
}

impl LexicalScoringService {
    pub const NAME: &'static str = "lexical";

    pub fn new(config: TextEmbedderConfig) -> Self {
        Self {
            embedder: HashTextEmbedder::new(config),
        }
    }
}

impl Default for LexicalScoringService {
    fn default() -> Self {
        Self::new(TextEmbedderConfig::from_env())
    }
}

#[async_trait]
impl ScoringService for LexicalScoringService {
    async fn score(
        &self,
        candidate_text: &str,
        job_text: &str,
    ) -> Result<ServiceScore, ScoringUnavailable> {
        let similarity = text_similarity(&self.embedder, candidate_text, job_text);
        Ok(ServiceScore {
            score: similarity.score.round().clamp(0.0, 100.0) as u8,
            reasoning: similarity.reasoning,
        })
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
