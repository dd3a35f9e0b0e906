pub mod api;
pub mod db;
pub mod extraction;
pub mod logging;
pub mod matching;
pub mod scoring_service;
pub mod semantic;
pub mod skill_normalizer;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical skill name → importance weight (0–100).
pub type SkillWeightMap = BTreeMap<String, u32>;

// Commonly used data models for matching functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub title: String,
    pub industry: String,
    pub description: String,
    pub skills: SkillWeightMap,
}

impl JobRequirement {
    pub fn total_weight(&self) -> u64 {
        self.skills.values().map(|w| u64::from(*w)).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Junior,
    #[default]
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "junior" => Some(ExperienceLevel::Junior),
            "mid" => Some(ExperienceLevel::Mid),
            "senior" => Some(ExperienceLevel::Senior),
            _ => None,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job requirement as persisted by the profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredJobRequirement {
    pub id: Uuid,
    #[serde(flatten)]
    pub requirement: JobRequirement,
    pub experience_level: ExperienceLevel,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub full_content: String,
    pub industries: BTreeSet<String>,
    pub skills: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl CandidateProfile {
    pub fn new(
        full_content: impl Into<String>,
        industries: BTreeSet<String>,
        skills: BTreeSet<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_content: full_content.into(),
            industries,
            skills,
            created_at: Utc::now(),
        }
    }
}
