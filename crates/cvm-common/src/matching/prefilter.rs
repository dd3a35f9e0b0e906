use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::skill_normalizer::{normalize_skill_set, normalize_skill_weights, SkillMergePolicy};
use crate::{CandidateProfile, SkillWeightMap, StoredJobRequirement};

#[derive(Debug, Clone)]
pub struct PreFilterConfig {
    /// Maximum rows read from the store per request
    pub max_candidates: usize,
}

impl Default for PreFilterConfig {
    fn default() -> Self {
        Self {
            max_candidates: 500,
        }
    }
}

/// Re-checks the store's coarse skill-overlap results.
///
/// Entries come back with normalized skills, in store order, without
/// duplicate ids, and only if at least one normalized skill is shared.
pub struct SkillOverlapPreFilter {
    config: PreFilterConfig,
}

impl SkillOverlapPreFilter {
    pub fn new(config: PreFilterConfig) -> Self {
        Self { config }
    }

    pub fn max_candidates(&self) -> usize {
        self.config.max_candidates
    }

    pub fn filter_candidates(
        &self,
        required: &SkillWeightMap,
        candidates: Vec<CandidateProfile>,
    ) -> Vec<CandidateProfile> {
        let fetched = candidates.len();
        let mut seen = HashSet::new();

        let accepted: Vec<_> = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.id))
            .map(|mut candidate| {
                candidate.skills = normalize_skill_set(&candidate.skills);
                candidate
            })
            .filter(|candidate| candidate.skills.iter().any(|s| required.contains_key(s)))
            .take(self.config.max_candidates)
            .collect();

        debug!(fetched, accepted = accepted.len(), "candidate prefilter");
        accepted
    }

    pub fn filter_jobs(
        &self,
        candidate_skills: &BTreeSet<String>,
        jobs: Vec<StoredJobRequirement>,
        merge_policy: SkillMergePolicy,
    ) -> Vec<StoredJobRequirement> {
        let fetched = jobs.len();
        let mut seen = HashSet::new();

        let accepted: Vec<_> = jobs
            .into_iter()
            .filter(|job| seen.insert(job.id))
            .map(|mut job| {
                job.requirement.skills = normalize_skill_weights(
                    std::mem::take(&mut job.requirement.skills),
                    merge_policy,
                );
                job
            })
            .filter(|job| {
                job.requirement
                    .skills
                    .keys()
                    .any(|s| candidate_skills.contains(s))
            })
            .take(self.config.max_candidates)
            .collect();

        debug!(fetched, accepted = accepted.len(), "job prefilter");
        accepted
    }
}
