use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    ScoringService, ScoringServiceConfig, ScoringUnavailable, ServiceScore, parse_score_reply,
};

const SYSTEM_PROMPT: &str = "You are an experienced technical recruiter. Compare the candidate CV \
with the job description and rate their overall compatibility from 0 (no fit) to 100 (ideal fit), \
considering responsibilities, seniority, domain and skills. Reply with a single JSON object and \
nothing else: {\"score\": <integer 0-100>, \"reasoning\": \"<two or three sentences>\"}";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completion client.
pub struct HttpScoringService {
    client: reqwest::Client,
    config: ScoringServiceConfig,
}

impl HttpScoringService {
    pub fn new(config: ScoringServiceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { client, config })
    }

    fn is_retryable(err: &ScoringUnavailable) -> bool {
        match err {
            ScoringUnavailable::Transport(_) => true,
            ScoringUnavailable::Status(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            _ => false,
        }
    }

    async fn request_once(&self, user_prompt: &str) -> Result<ServiceScore, ScoringUnavailable> {
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ScoringUnavailable::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScoringUnavailable::Status(status.as_u16()));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ScoringUnavailable::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScoringUnavailable::Malformed("reply has no content".into()))?;

        parse_score_reply(&content)
    }
}

pub(crate) fn user_prompt(candidate_text: &str, job_text: &str) -> String {
    format!("## Candidate CV\n{candidate_text}\n\n## Job description\n{job_text}")
}

#[async_trait]
impl ScoringService for HttpScoringService {
    async fn score(
        &self,
        candidate_text: &str,
        job_text: &str,
    ) -> Result<ServiceScore, ScoringUnavailable> {
        let prompt = user_prompt(candidate_text, job_text);
        let mut attempt: u32 = 0;

        loop {
            match self.request_once(&prompt).await {
                Ok(score) => {
                    debug!(score = score.score, attempt, "scoring service replied");
                    return Ok(score);
                }
                Err(err) if attempt < self.config.max_retries && Self::is_retryable(&err) => {
                    attempt += 1;
                    let backoff =
                        Duration::from_millis(self.config.retry_backoff_ms * u64::from(attempt));
                    warn!(error = %err, attempt, ?backoff, "scoring request failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name(&self) -> &str {
        &self.config.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_as_chat_completion() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            temperature: 0.0,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "cv",
                },
            ],
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "cv");
    }

    #[test]
    fn reply_content_is_extracted() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{\"score\": 71, \"reasoning\": \"fine\"}"}}]}"#;

        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = parsed.choices[0].message.content.clone().unwrap();

        assert_eq!(parse_score_reply(&content).unwrap().score, 71);
    }

    #[test]
    fn only_transient_failures_are_retried() {
        assert!(HttpScoringService::is_retryable(&ScoringUnavailable::Status(503)));
        assert!(HttpScoringService::is_retryable(&ScoringUnavailable::Status(429)));
        assert!(!HttpScoringService::is_retryable(&ScoringUnavailable::Status(401)));
        assert!(!HttpScoringService::is_retryable(&ScoringUnavailable::Malformed(
            "x".into()
        )));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let service = HttpScoringService::new(ScoringServiceConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".into(),
            timeout_secs: 1,
            ..ScoringServiceConfig::default()
        })
        .unwrap();

        let err = service.score("cv", "job").await.unwrap_err();

        assert!(matches!(err, ScoringUnavailable::Transport(_)), "{err:?}");
    }

    #[test]
    fn prompt_carries_both_documents() {
        let prompt = user_prompt("Rust developer", "Backend role");

        assert!(prompt.contains("Rust developer"));
        assert!(prompt.contains("Backend role"));
    }
}
