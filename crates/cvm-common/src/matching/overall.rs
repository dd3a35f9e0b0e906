use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::weights::OVERALL_WEIGHTS;
use crate::scoring_service::{ScoringService, ScoringUnavailable};
use crate::semantic::{HashTextEmbedder, TextEmbedderConfig, text_similarity};

/// Holistic fit of a CV to a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallMatch {
    /// 0.0〜100.0
    pub score: f64,
    pub ai_score: f64,
    pub ai_reasoning: String,
    pub natural_language_score: f64,
    pub natural_language_reasoning: String,
}

impl OverallMatch {
    /// A shortlisted entry whose AI judgment failed under the demote policy.
    pub fn unavailable(err: &ScoringUnavailable) -> Self {
        Self {
            score: 0.0,
            ai_score: 0.0,
            ai_reasoning: format!("Overall fit could not be assessed: {err}."),
            natural_language_score: 0.0,
            natural_language_reasoning: String::new(),
        }
    }
}

/// One scoring-service call per pair, blended with local text similarity.
pub struct OverallMatchScorer {
    service: Arc<dyn ScoringService>,
    embedder: HashTextEmbedder,
    timeout: Duration,
}

impl OverallMatchScorer {
    pub fn new(service: Arc<dyn ScoringService>, timeout: Duration) -> Self {
        Self::with_embedder(service, timeout, TextEmbedderConfig::from_env())
    }

    pub fn with_embedder(
        service: Arc<dyn ScoringService>,
        timeout: Duration,
        embedder_config: TextEmbedderConfig,
    ) -> Self {
        Self {
            service,
            embedder: HashTextEmbedder::new(embedder_config),
            timeout,
        }
    }

    /// Score one (CV, job) pair. Failures affect this pair only.
    pub async fn analyze_match(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<OverallMatch, ScoringUnavailable> {
        let ai = tokio::time::timeout(
            self.timeout,
            self.service.score(candidate_text, job_description),
        )
        .await
        .map_err(|_| ScoringUnavailable::Timeout(self.timeout))
        .and_then(|result| result)
        .inspect_err(|err| {
            warn!(service = self.service.name(), error = %err, "overall scoring unavailable");
        })?;

        let natural_language = text_similarity(&self.embedder, candidate_text, job_description);
        let ai_score = f64::from(ai.score);
        let score = OVERALL_WEIGHTS
            .combine(ai_score, natural_language.score)
            .clamp(0.0, 100.0);

        debug!(
            ai_score,
            natural_language_score = natural_language.score,
            score,
            "overall match scored"
        );

        Ok(OverallMatch {
            score,
            ai_score,
            ai_reasoning: ai.reasoning,
            natural_language_score: natural_language.score,
            natural_language_reasoning: natural_language.reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring_service::ScriptedScoringService;

    fn scorer(service: ScriptedScoringService, timeout: Duration) -> OverallMatchScorer {
        OverallMatchScorer::with_embedder(Arc::new(service), timeout, TextEmbedderConfig::default())
    }

    #[tokio::test]
    async fn blends_ai_and_text_similarity() {
        let text = "Python engineer building data pipelines";
        let scorer = scorer(ScriptedScoringService::new(80), Duration::from_secs(1));

        let result = scorer.analyze_match(text, text).await.unwrap();

        assert_eq!(result.ai_score, 80.0);
        assert!((result.natural_language_score - 100.0).abs() < 1e-3);
        assert!((result.score - (0.85 * 80.0 + 0.15 * 100.0)).abs() < 1e-2);
        assert_eq!(result.ai_reasoning, "Scripted score 80.");
    }

    #[tokio::test]
    async fn service_failure_is_unavailable() {
        let scorer = scorer(
            ScriptedScoringService::new(80).fail_when_contains("broken"),
            Duration::from_secs(1),
        );

        let err = scorer.analyze_match("broken cv", "job").await.unwrap_err();

        assert_eq!(err, ScoringUnavailable::Status(503));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_service_times_out() {
        let scorer = scorer(
            ScriptedScoringService::new(80).delay_when_contains(
                "slow",
                Duration::from_secs(60),
                90,
            ),
            Duration::from_secs(5),
        );

        let err = scorer.analyze_match("slow cv", "job").await.unwrap_err();

        assert_eq!(err, ScoringUnavailable::Timeout(Duration::from_secs(5)));
    }
}
