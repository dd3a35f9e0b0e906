//! Persistence of job requirements and candidate profiles.

pub mod memory;
pub mod postgres;

use std::collections::BTreeSet;

use async_trait::async_trait;
use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;

use crate::skill_normalizer::normalize_skill;
use crate::{CandidateProfile, ExperienceLevel, JobRequirement, StoredJobRequirement};

pub use memory::InMemoryProfileStore;
pub use postgres::PgProfileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map stored row: {0}")]
    Mapping(String),
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Skill-overlap queries compare [`skill_key`]s, so stored aliases and
/// casing variants match their canonical names. The matching pipeline
/// re-checks overlap on normalized skills. Results come back oldest first.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn insert_job_requirement(
        &self,
        requirement: &JobRequirement,
        experience_level: ExperienceLevel,
    ) -> Result<StoredJobRequirement, StoreError>;

    async fn insert_candidate_profile(&self, profile: &CandidateProfile) -> Result<(), StoreError>;

    /// Candidates holding at least one of `skills`, at most `limit`.
    async fn query_candidates_by_skill_overlap(
        &self,
        skills: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<CandidateProfile>, StoreError>;

    /// Jobs requiring at least one of `skills`, at most `limit`.
    async fn query_jobs_by_skill_overlap(
        &self,
        skills: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<StoredJobRequirement>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}

/// Lookup key of one skill: canonical name when known, lowercased, so
/// `js`, `JS` and `JavaScript` share a key.
pub(crate) fn skill_key(skill: &str) -> String {
    normalize_skill(skill.trim()).to_lowercase()
}

/// Deduplicated lookup keys for the overlap queries.
pub(crate) fn overlap_keys<'a>(skills: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| skill_key(s))
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
