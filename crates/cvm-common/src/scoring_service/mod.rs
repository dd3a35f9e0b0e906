//! External compatibility scoring (CV text × job text → 0–100 + rationale).
//!
//! Production calls an OpenAI-compatible chat completion endpoint; with the
//! LLM disabled a local lexical scorer stands in so the pipeline still runs
//! offline.

pub mod config;
pub mod http;
pub mod lexical;
pub mod scripted;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub use config::ScoringServiceConfig;
pub use http::HttpScoringService;
pub use lexical::LexicalScoringService;
pub use scripted::ScriptedScoringService;

/// Judgment returned by a scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceScore {
    /// 0〜100
    pub score: u8,
    pub reasoning: String,
}

/// The scoring service could not produce a score for one pair of texts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringUnavailable {
    #[error("scoring service timed out after {0:?}")]
    Timeout(Duration),
    #[error("scoring service request failed: {0}")]
    Transport(String),
    #[error("scoring service returned status {0}")]
    Status(u16),
    #[error("scoring service response could not be parsed: {0}")]
    Malformed(String),
    #[error("scoring task failed: {0}")]
    TaskFailed(String),
}

#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn score(
        &self,
        candidate_text: &str,
        job_text: &str,
    ) -> Result<ServiceScore, ScoringUnavailable>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct RawScore {
    score: serde_json::Value,
    #[serde(default)]
    reasoning: String,
}

/// Pull `{ "score": .., "reasoning": .. }` out of a model reply.
///
/// Models wrap JSON in prose or code fences, so only the span from the first
/// `{` to the last `}` is parsed. Scores are rounded and clamped to 0–100;
/// numeric strings ("85") are accepted.
pub fn parse_score_reply(content: &str) -> Result<ServiceScore, ScoringUnavailable> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => {
            return Err(ScoringUnavailable::Malformed(
                "no JSON object in reply".into(),
            ));
        }
    };

    let raw: RawScore =
        serde_json::from_str(json).map_err(|e| ScoringUnavailable::Malformed(e.to_string()))?;

    let value = match &raw.score {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| ScoringUnavailable::Malformed(format!("score is not a number: {}", raw.score)))?;

    Ok(ServiceScore {
        score: value.round().clamp(0.0, 100.0) as u8,
        reasoning: raw.reasoning.trim().to_string(),
    })
}

/// Pick the scoring service for this process.
pub fn build_scoring_service(
    config: &ScoringServiceConfig,
) -> Result<Arc<dyn ScoringService>, reqwest::Error> {
    if !config.enabled {
        info!("LLM scoring disabled, using lexical scoring service");
        return Ok(Arc::new(LexicalScoringService::default()));
    }

    if config.api_key.is_empty() && !config.is_local_endpoint() {
        warn!(
            provider = %config.provider,
            endpoint = %config.endpoint,
            "LLM scoring enabled without an API key"
        );
    }

    info!(
        provider = %config.provider,
        model = %config.model,
        "using HTTP scoring service"
    );
    Ok(Arc::new(HttpScoringService::new(config.clone())?))
}
