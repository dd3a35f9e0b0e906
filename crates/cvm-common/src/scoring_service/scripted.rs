use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{ScoringService, ScoringUnavailable, ServiceScore};

#[derive(Debug, Clone)]
enum Behavior {
    Score(u8),
    Fail,
    Panic,
    Delay(Duration, u8),
}

/// Deterministic scoring service for tests and demos.
///
/// Rules are matched in insertion order against both texts; the first rule
/// whose needle occurs in either wins, otherwise the default score is used.
pub struct ScriptedScoringService {
    default_score: u8,
    rules: Mutex<Vec<(String, Behavior)>>,
    calls: AtomicUsize,
}

impl ScriptedScoringService {
    pub fn new(default_score: u8) -> Self {
        Self {
            default_score: default_score.min(100),
            rules: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn push(self, needle: &str, behavior: Behavior) -> Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push((needle.to_string(), behavior));
        }
        self
    }

    pub fn score_when_contains(self, needle: &str, score: u8) -> Self {
        self.push(needle, Behavior::Score(score.min(100)))
    }

    pub fn fail_when_contains(self, needle: &str) -> Self {
        self.push(needle, Behavior::Fail)
    }

    pub fn panic_when_contains(self, needle: &str) -> Self {
        self.push(needle, Behavior::Panic)
    }

    pub fn delay_when_contains(self, needle: &str, delay: Duration, score: u8) -> Self {
        self.push(needle, Behavior::Delay(delay, score.min(100)))
    }

    /// Number of `score` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn behavior_for(&self, candidate_text: &str, job_text: &str) -> Behavior {
        self.rules
            .lock()
            .ok()
            .and_then(|rules| {
                rules
                    .iter()
                    .find(|(needle, _)| {
                        candidate_text.contains(needle.as_str())
                            || job_text.contains(needle.as_str())
                    })
                    .map(|(_, behavior)| behavior.clone())
            })
            .unwrap_or(Behavior::Score(self.default_score))
    }
}

#[async_trait]
impl ScoringService for ScriptedScoringService {
    async fn score(
        &self,
        candidate_text: &str,
        job_text: &str,
    ) -> Result<ServiceScore, ScoringUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let score = match self.behavior_for(candidate_text, job_text) {
            Behavior::Score(score) => score,
            Behavior::Fail => {
                return Err(ScoringUnavailable::Status(503));
            }
            Behavior::Panic => panic!("scripted scoring panic"),
            Behavior::Delay(delay, score) => {
                tokio::time::sleep(delay).await;
                score
            }
        };

        Ok(ServiceScore {
            score,
            reasoning: format!("Scripted score {score}."),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_matching_rule_wins() {
        let service = ScriptedScoringService::new(50)
            .score_when_contains("alice", 90)
            .fail_when_contains("bob");

        assert_eq!(service.score("cv of alice", "job").await.unwrap().score, 90);
        assert!(service.score("cv of bob", "job").await.is_err());
        assert_eq!(service.score("cv of carol", "job").await.unwrap().score, 50);
        assert_eq!(service.calls(), 3);
    }
}
