use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::industry::IndustryRelevance;
use super::overall::OverallMatch;
use super::prefilter::PreFilterConfig;
use super::skills::TechnicalScore;
use super::weights::{
    DEFAULT_CANDIDATE_RESULTS, DEFAULT_JOB_RESULTS, DEFAULT_SHORTLIST_SIZE, FINAL_WEIGHTS,
    MAX_CANDIDATE_RESULTS, MAX_SHORTLIST_SIZE, SHORTLIST_TECHNICAL_MULTIPLIER,
};
use crate::scoring_service::ScoringUnavailable;
use crate::skill_normalizer::SkillMergePolicy;
use crate::{CandidateProfile, StoredJobRequirement};

/// What happens to a shortlisted entry whose overall scoring failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFailurePolicy {
    /// Leave it out of the results.
    #[default]
    Exclude,
    /// Keep it with an overall score of 0, flagged as degraded.
    Demote,
}

impl ScoringFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exclude" => Some(ScoringFailurePolicy::Exclude),
            "demote" => Some(ScoringFailurePolicy::Demote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Entries sent to the overall scorer (K)
    pub shortlist_size: usize,
    /// Candidates returned per job
    pub candidate_results: usize,
    /// Jobs returned per candidate
    pub job_results: usize,
    /// Budget for one scoring-service call
    pub ai_timeout: Duration,
    pub failure_policy: ScoringFailurePolicy,
    pub merge_policy: SkillMergePolicy,
    pub prefilter: PreFilterConfig,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            candidate_results: DEFAULT_CANDIDATE_RESULTS,
            job_results: DEFAULT_JOB_RESULTS,
            ai_timeout: Duration::from_millis(20_000),
            failure_policy: ScoringFailurePolicy::default(),
            merge_policy: SkillMergePolicy::default(),
            prefilter: PreFilterConfig::default(),
        }
    }
}

fn env_positive_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => value,
            _ => {
                warn!(key, value = %raw, default, "ignoring invalid matching setting");
                default
            }
        },
        Err(_) => default,
    }
}

fn capped(key: &str, value: usize, max: usize) -> usize {
    if value > max {
        warn!(key, value, max, "matching setting above its bound, capping");
        max
    } else {
        value
    }
}

impl MatchingConfig {
    /// Shortlist and candidate-result sizes capped at
    /// [`MAX_SHORTLIST_SIZE`] and [`MAX_CANDIDATE_RESULTS`].
    pub fn bounded(mut self) -> Self {
        self.shortlist_size = capped("shortlist_size", self.shortlist_size, MAX_SHORTLIST_SIZE);
        self.candidate_results = capped(
            "candidate_results",
            self.candidate_results,
            MAX_CANDIDATE_RESULTS,
        );
        self
    }

    /// `CVM_*` overrides on top of the defaults; invalid values are logged
    /// and ignored, sizes above their bounds are capped.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let ai_timeout_ms = env_positive_usize(
            "CVM_AI_TIMEOUT_MS",
            defaults.ai_timeout.as_millis() as usize,
        );

        let failure_policy = match std::env::var("CVM_SCORING_FAILURE_POLICY") {
            Ok(raw) => ScoringFailurePolicy::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown CVM_SCORING_FAILURE_POLICY, using exclude");
                defaults.failure_policy
            }),
            Err(_) => defaults.failure_policy,
        };

        let merge_policy = match std::env::var("CVM_SKILL_MERGE_POLICY") {
            Ok(raw) => SkillMergePolicy::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown CVM_SKILL_MERGE_POLICY, using max");
                defaults.merge_policy
            }),
            Err(_) => defaults.merge_policy,
        };

        Self {
            shortlist_size: env_positive_usize("CVM_SHORTLIST_SIZE", defaults.shortlist_size),
            candidate_results: env_positive_usize(
                "CVM_CANDIDATE_RESULTS",
                defaults.candidate_results,
            ),
            job_results: env_positive_usize("CVM_JOB_RESULTS", defaults.job_results),
            ai_timeout: Duration::from_millis(ai_timeout_ms as u64),
            failure_policy,
            merge_policy,
            prefilter: PreFilterConfig {
                max_candidates: env_positive_usize(
                    "CVM_PREFILTER_LIMIT",
                    defaults.prefilter.max_candidates,
                ),
            },
        }
        .bounded()
    }
}

/// One subject (a candidate, or a job) scored against the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch<T> {
    pub subject: T,
    pub industry_score: f64,
    pub industry_reasoning: String,
    pub technical_score: f64,
    pub technical_reasoning: String,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub per_skill_scoring: BTreeMap<String, f64>,
    /// Set once the entry survives the shortlist and is rescored
    pub overall: Option<OverallMatch>,
    /// Overall scoring failed and the entry was kept with a zero score
    pub degraded: bool,
    pub final_score: Option<f64>,
}

pub type ScoredCandidate = ScoredMatch<CandidateProfile>;
pub type ScoredJob = ScoredMatch<StoredJobRequirement>;

impl<T> ScoredMatch<T> {
    /// Result of the cheap stage: industry and technical scores only.
    pub fn from_cheap_scores(
        subject: T,
        industry: IndustryRelevance,
        technical: TechnicalScore,
    ) -> Self {
        Self {
            subject,
            industry_score: industry.score,
            industry_reasoning: industry.reasoning,
            technical_score: technical.score,
            technical_reasoning: technical.reasoning,
            matched_skills: technical.matched_skills,
            missing_skills: technical.missing_skills,
            per_skill_scoring: technical.per_skill_scoring,
            overall: None,
            degraded: false,
            final_score: None,
        }
    }

    /// Ranking key for the shortlist: technical × 3 + industry.
    pub fn shortlist_priority(&self) -> f64 {
        self.technical_score * SHORTLIST_TECHNICAL_MULTIPLIER + self.industry_score
    }

    pub fn with_overall(mut self, overall: OverallMatch) -> Self {
        self.overall = Some(overall);
        self.degraded = false;
        self.finalize();
        self
    }

    pub fn demoted(mut self, err: &ScoringUnavailable) -> Self {
        self.overall = Some(OverallMatch::unavailable(err));
        self.degraded = true;
        self.finalize();
        self
    }

    fn finalize(&mut self) {
        let overall = self.overall.as_ref().map_or(0.0, |o| o.score);
        self.final_score = Some(FINAL_WEIGHTS.combine(
            self.industry_score,
            self.technical_score,
            overall,
        ));
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Stable sort by shortlist priority, keeping the best `k`.
pub fn rank_and_truncate<T>(entries: &mut Vec<ScoredMatch<T>>, k: usize) {
    entries.sort_by(|a, b| descending(a.shortlist_priority(), b.shortlist_priority()));
    entries.truncate(k);
}

/// Stable sort by final score, keeping the best `n`.
pub fn sort_by_final_score<T>(entries: &mut Vec<ScoredMatch<T>>, n: usize) {
    entries.sort_by(|a, b| {
        descending(
            a.final_score.unwrap_or_default(),
            b.final_score.unwrap_or_default(),
        )
    });
    entries.truncate(n);
}
