use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{ProfileStore, StoreError};
use crate::db::{PgPool, profiles};
use crate::{CandidateProfile, ExperienceLevel, JobRequirement, StoredJobRequirement};

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn insert_job_requirement(
        &self,
        requirement: &JobRequirement,
        experience_level: ExperienceLevel,
    ) -> Result<StoredJobRequirement, StoreError> {
        profiles::insert_job_requirement(&self.pool, requirement, experience_level).await
    }

    async fn insert_candidate_profile(&self, profile: &CandidateProfile) -> Result<(), StoreError> {
        profiles::insert_candidate_profile(&self.pool, profile).await
    }

    async fn query_candidates_by_skill_overlap(
        &self,
        skills: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<CandidateProfile>, StoreError> {
        profiles::query_candidates_by_skill_overlap(&self.pool, skills, limit).await
    }

    async fn query_jobs_by_skill_overlap(
        &self,
        skills: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<StoredJobRequirement>, StoreError> {
        profiles::query_jobs_by_skill_overlap(&self.pool, skills, limit).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
