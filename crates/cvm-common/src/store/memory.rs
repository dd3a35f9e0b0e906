use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use super::{ProfileStore, StoreError, overlap_keys, skill_key};
use crate::{CandidateProfile, ExperienceLevel, JobRequirement, StoredJobRequirement};

/// Process-local store used without `DATABASE_URL` and in tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    jobs: RwLock<Vec<StoredJobRequirement>>,
    candidates: RwLock<Vec<CandidateProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given candidates, in order.
    pub fn with_candidates(candidates: impl IntoIterator<Item = CandidateProfile>) -> Self {
        Self {
            jobs: RwLock::default(),
            candidates: RwLock::new(candidates.into_iter().collect()),
        }
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn candidate_count(&self) -> usize {
        self.candidates.read().await.len()
    }
}

fn overlaps<'a>(stored: impl IntoIterator<Item = &'a String>, keys: &[String]) -> bool {
    stored
        .into_iter()
        .any(|skill| keys.contains(&skill_key(skill)))
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    #[instrument(skip(self, requirement), fields(title = %requirement.title))]
    async fn insert_job_requirement(
        &self,
        requirement: &JobRequirement,
        experience_level: ExperienceLevel,
    ) -> Result<StoredJobRequirement, StoreError> {
        let stored = StoredJobRequirement {
            id: Uuid::new_v4(),
            requirement: requirement.clone(),
            experience_level,
            created_at: Utc::now(),
        };
        self.jobs.write().await.push(stored.clone());
        Ok(stored)
    }

    #[instrument(skip(self, profile), fields(id = %profile.id))]
    async fn insert_candidate_profile(&self, profile: &CandidateProfile) -> Result<(), StoreError> {
        self.candidates.write().await.push(profile.clone());
        Ok(())
    }

    async fn query_candidates_by_skill_overlap(
        &self,
        skills: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<CandidateProfile>, StoreError> {
        let keys = overlap_keys(skills);
        Ok(self
            .candidates
            .read()
            .await
            .iter()
            .filter(|c| overlaps(&c.skills, &keys))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn query_jobs_by_skill_overlap(
        &self,
        skills: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<StoredJobRequirement>, StoreError> {
        let keys = overlap_keys(skills);
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|j| overlaps(j.requirement.skills.keys(), &keys))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
