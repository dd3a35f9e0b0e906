use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::{MatchOutcome, ScoredCandidate, ScoredJob, ScoredMatch};
use crate::{ExperienceLevel, SkillWeightMap};

/// Per-criterion scores and explanations shared by both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScores {
    pub industry_score: f64,
    pub industry_reasoning: String,
    pub technical_score: f64,
    pub technical_reasoning: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub per_skill_scoring: BTreeMap<String, f64>,
    pub overall_score: Option<f64>,
    pub ai_score: Option<f64>,
    pub ai_reasoning: Option<String>,
    pub natural_language_score: Option<f64>,
    pub natural_language_reasoning: Option<String>,
    pub final_score: Option<f64>,
    /// Overall scoring failed; `overallScore` is a placeholder 0
    pub degraded: bool,
}

impl<T> From<&ScoredMatch<T>> for MatchScores {
    fn from(scored: &ScoredMatch<T>) -> Self {
        let overall = scored.overall.as_ref();
        Self {
            industry_score: scored.industry_score,
            industry_reasoning: scored.industry_reasoning.clone(),
            technical_score: scored.technical_score,
            technical_reasoning: scored.technical_reasoning.clone(),
            matched_skills: scored.matched_skills.iter().cloned().collect(),
            missing_skills: scored.missing_skills.iter().cloned().collect(),
            per_skill_scoring: scored.per_skill_scoring.clone(),
            overall_score: overall.map(|o| o.score),
            ai_score: overall.map(|o| o.ai_score),
            ai_reasoning: overall.map(|o| o.ai_reasoning.clone()),
            natural_language_score: overall.map(|o| o.natural_language_score),
            natural_language_reasoning: overall.map(|o| o.natural_language_reasoning.clone()),
            final_score: scored.final_score,
            degraded: scored.degraded,
        }
    }
}

/// 候補者1件分のマッチ結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatch {
    pub candidate_id: Uuid,
    pub full_content: String,
    pub industries: Vec<String>,
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub scores: MatchScores,
}

impl From<&ScoredCandidate> for CandidateMatch {
    fn from(scored: &ScoredCandidate) -> Self {
        Self {
            candidate_id: scored.subject.id,
            full_content: scored.subject.full_content.clone(),
            industries: scored.subject.industries.iter().cloned().collect(),
            skills: scored.subject.skills.iter().cloned().collect(),
            scores: MatchScores::from(scored),
        }
    }
}

/// 求人1件分のマッチ結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub job_id: Uuid,
    pub job_title: String,
    pub industry: String,
    pub detailed_description: String,
    pub experience_level: ExperienceLevel,
    pub skills: SkillWeightMap,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub scores: MatchScores,
}

impl From<&ScoredJob> for JobMatch {
    fn from(scored: &ScoredJob) -> Self {
        let job = &scored.subject;
        Self {
            job_id: job.id,
            job_title: job.requirement.title.clone(),
            industry: job.requirement.industry.clone(),
            detailed_description: job.requirement.description.clone(),
            experience_level: job.experience_level,
            skills: job.requirement.skills.clone(),
            created_at: job.created_at,
            scores: MatchScores::from(scored),
        }
    }
}

/// Success envelope. `noResults` distinguishes "nothing matched" from a
/// failure, which uses the error envelope instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResponse<T> {
    pub success: bool,
    pub no_results: bool,
    pub data: T,
}

impl MatchingResponse<Vec<CandidateMatch>> {
    pub fn from_candidates(outcome: &MatchOutcome<ScoredCandidate>) -> Self {
        let data: Vec<CandidateMatch> = match outcome {
            MatchOutcome::Matches(results) => results.iter().map(CandidateMatch::from).collect(),
            MatchOutcome::NoMatches => Vec::new(),
        };
        Self {
            success: true,
            no_results: data.is_empty(),
            data,
        }
    }
}

impl MatchingResponse<Option<JobMatch>> {
    pub fn from_jobs(outcome: &MatchOutcome<ScoredJob>) -> Self {
        let data = match outcome {
            MatchOutcome::Matches(results) => results.first().map(JobMatch::from),
            MatchOutcome::NoMatches => None,
        };
        Self {
            success: true,
            no_results: data.is_none(),
            data,
        }
    }
}
