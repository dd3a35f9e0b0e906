use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use super::industry::analyze_industry_relevance;
use super::overall::{OverallMatch, OverallMatchScorer};
use super::prefilter::SkillOverlapPreFilter;
use super::scoring::{
    MatchingConfig, ScoredCandidate, ScoredJob, ScoredMatch, ScoringFailurePolicy,
    rank_and_truncate, sort_by_final_score,
};
use super::skills::score_technical_skills;
use crate::extraction::{infer_experience_level, infer_profile};
use crate::scoring_service::{ScoringService, ScoringUnavailable};
use crate::skill_normalizer::normalize_skill_weights;
use crate::store::{ProfileStore, StoreError};
use crate::{CandidateProfile, JobRequirement};

/// Request-level failures. Per-entry scoring failures surface here only when
/// no shortlisted entry could be scored at all.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("profile store failure: {0}")]
    Persistence(#[from] StoreError),
    /// Every shortlisted entry failed overall scoring. Distinct from
    /// [`MatchOutcome::NoMatches`].
    #[error("scoring service failed for all {shortlisted} shortlisted entries: {last}")]
    ScoringUnavailable {
        shortlisted: usize,
        last: ScoringUnavailable,
    },
}

/// A successful run: ranked results, or an explicit "nothing matched".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchOutcome<T> {
    Matches(Vec<T>),
    NoMatches,
}

impl<T> MatchOutcome<T> {
    fn from_results(results: Vec<T>) -> Self {
        if results.is_empty() {
            MatchOutcome::NoMatches
        } else {
            MatchOutcome::Matches(results)
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            MatchOutcome::Matches(results) => results,
            MatchOutcome::NoMatches => Vec::new(),
        }
    }

    pub fn is_no_matches(&self) -> bool {
        matches!(self, MatchOutcome::NoMatches)
    }
}

/// Text handed to the overall scorer for a job.
pub fn job_document(requirement: &JobRequirement) -> String {
    format!(
        "{}\nIndustry: {}\n\n{}",
        requirement.title.trim(),
        requirement.industry.trim(),
        requirement.description.trim()
    )
}

fn validate_job(requirement: &JobRequirement) -> Result<(), MatchError> {
    let blank = [
        ("job_title", &requirement.title),
        ("industry", &requirement.industry),
        ("detailed_description", &requirement.description),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect::<Vec<_>>();

    if !blank.is_empty() {
        return Err(MatchError::InvalidInput(format!(
            "required fields are blank: {}",
            blank.join(", ")
        )));
    }
    if requirement.skills.is_empty() {
        return Err(MatchError::InvalidInput(
            "at least one skill is required".into(),
        ));
    }
    Ok(())
}

/// Two-phase matcher: cheap local scoring for every prefiltered entry, then
/// the scoring service for the shortlist only.
pub struct MatchingEngine {
    store: Arc<dyn ProfileStore>,
    overall: Arc<OverallMatchScorer>,
    prefilter: SkillOverlapPreFilter,
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        scoring_service: Arc<dyn ScoringService>,
        config: MatchingConfig,
    ) -> Self {
        let overall = OverallMatchScorer::new(scoring_service, config.ai_timeout);
        Self::with_overall_scorer(store, overall, config)
    }

    pub fn with_overall_scorer(
        store: Arc<dyn ProfileStore>,
        overall: OverallMatchScorer,
        config: MatchingConfig,
    ) -> Self {
        let config = config.bounded();
        Self {
            store,
            overall: Arc::new(overall),
            prefilter: SkillOverlapPreFilter::new(config.prefilter.clone()),
            config,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    /// Job → candidates. Persists the job, then returns at most
    /// `candidate_results` candidates ordered by final score.
    #[instrument(skip_all, fields(title = %requirement.title))]
    pub async fn match_candidates_for_job(
        &self,
        requirement: JobRequirement,
    ) -> Result<MatchOutcome<ScoredCandidate>, MatchError> {
        validate_job(&requirement)?;

        let mut requirement = requirement;
        requirement.skills = normalize_skill_weights(
            std::mem::take(&mut requirement.skills),
            self.config.merge_policy,
        );
        if requirement.skills.is_empty() {
            return Err(MatchError::InvalidInput("skill names are blank".into()));
        }
        let total_weight = requirement.total_weight();
        if total_weight != 100 {
            warn!(
                total_weight,
                "skill weights do not sum to 100; technical scores are not clamped"
            );
        }

        let level = infer_experience_level(&requirement.title, &requirement.description);
        let stored = self.store.insert_job_requirement(&requirement, level).await?;
        info!(job_id = %stored.id, experience_level = %level, "stored job requirement");

        let required: BTreeSet<String> = requirement.skills.keys().cloned().collect();
        let fetched = self
            .store
            .query_candidates_by_skill_overlap(&required, self.prefilter.max_candidates())
            .await?;
        let candidates = self.prefilter.filter_candidates(&requirement.skills, fetched);
        if candidates.is_empty() {
            info!("no candidates share a required skill");
            return Ok(MatchOutcome::NoMatches);
        }

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let industry = analyze_industry_relevance(&candidate, &requirement.industry);
                let technical = score_technical_skills(&candidate.skills, &requirement.skills);
                ScoredMatch::from_cheap_scores(candidate, industry, technical)
            })
            .collect();
        let prefiltered = scored.len();
        rank_and_truncate(&mut scored, self.config.shortlist_size);

        let job_text = job_document(&requirement);
        let mut results = self
            .rerank(scored, |entry| {
                (entry.subject.full_content.clone(), job_text.clone())
            })
            .await?;
        sort_by_final_score(&mut results, self.config.candidate_results);

        info!(prefiltered, returned = results.len(), "candidate matching finished");
        Ok(MatchOutcome::from_results(results))
    }

    /// Candidate → job. Infers and persists the profile, then returns the
    /// best `job_results` jobs.
    #[instrument(skip_all, fields(cv_len = full_content.len()))]
    pub async fn match_job_for_candidate(
        &self,
        full_content: &str,
    ) -> Result<MatchOutcome<ScoredJob>, MatchError> {
        if full_content.trim().is_empty() {
            return Err(MatchError::InvalidInput("full_content is blank".into()));
        }

        let inferred = infer_profile(full_content);
        let profile = CandidateProfile::new(full_content, inferred.industries, inferred.skills);
        self.store.insert_candidate_profile(&profile).await?;
        info!(
            candidate_id = %profile.id,
            skills = profile.skills.len(),
            industries = profile.industries.len(),
            "stored candidate profile"
        );

        if profile.skills.is_empty() {
            info!("no known skills found in CV");
            return Ok(MatchOutcome::NoMatches);
        }

        let fetched = self
            .store
            .query_jobs_by_skill_overlap(&profile.skills, self.prefilter.max_candidates())
            .await?;
        let jobs = self
            .prefilter
            .filter_jobs(&profile.skills, fetched, self.config.merge_policy);
        if jobs.is_empty() {
            info!("no jobs share a candidate skill");
            return Ok(MatchOutcome::NoMatches);
        }

        let mut scored: Vec<ScoredJob> = jobs
            .into_iter()
            .map(|job| {
                let industry = analyze_industry_relevance(&profile, &job.requirement.industry);
                let technical = score_technical_skills(&profile.skills, &job.requirement.skills);
                ScoredMatch::from_cheap_scores(job, industry, technical)
            })
            .collect();
        let prefiltered = scored.len();
        rank_and_truncate(&mut scored, self.config.shortlist_size);

        let mut results = self
            .rerank(scored, |entry| {
                (profile.full_content.clone(), job_document(&entry.subject.requirement))
            })
            .await?;
        sort_by_final_score(&mut results, self.config.job_results);

        info!(prefiltered, returned = results.len(), "job matching finished");
        Ok(MatchOutcome::from_results(results))
    }

    /// Score every shortlisted entry concurrently and apply the failure policy.
    /// Fails when the shortlist was non-empty and no entry could be scored.
    ///
    /// Each task carries its shortlist index, so outcomes land in the right
    /// slot whatever order they finish in. A slot left empty means the task
    /// panicked and counts as a failure.
    async fn rerank<T, F>(
        &self,
        shortlist: Vec<ScoredMatch<T>>,
        texts: F,
    ) -> Result<Vec<ScoredMatch<T>>, MatchError>
    where
        F: Fn(&ScoredMatch<T>) -> (String, String),
    {
        let shortlisted = shortlist.len();
        let mut tasks = JoinSet::new();

        for (idx, entry) in shortlist.iter().enumerate() {
            let (candidate_text, job_text) = texts(entry);
            let scorer = Arc::clone(&self.overall);
            tasks.spawn(async move {
                (idx, scorer.analyze_match(&candidate_text, &job_text).await)
            });
        }

        let mut outcomes: Vec<Option<Result<OverallMatch, ScoringUnavailable>>> =
            (0..shortlisted).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, outcome)) => outcomes[idx] = Some(outcome),
                Err(err) => warn!(error = %err, "overall scoring task did not complete"),
            }
        }

        let mut failures = 0usize;
        let mut last_error = None;
        let mut results = Vec::with_capacity(shortlisted);
        for (entry, outcome) in shortlist.into_iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| {
                Err(ScoringUnavailable::TaskFailed(
                    "scoring task panicked or was cancelled".into(),
                ))
            });
            match outcome {
                Ok(overall) => results.push(entry.with_overall(overall)),
                Err(err) => {
                    failures += 1;
                    if self.config.failure_policy == ScoringFailurePolicy::Demote {
                        results.push(entry.demoted(&err));
                    }
                    last_error = Some(err);
                }
            }
        }

        if failures > 0 {
            warn!(
                shortlisted,
                failures,
                policy = ?self.config.failure_policy,
                "overall scoring failed for part of the shortlist"
            );
        }
        match last_error {
            Some(last) if failures == shortlisted => Err(MatchError::ScoringUnavailable {
                shortlisted,
                last,
            }),
            _ => Ok(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::scoring_service::ScriptedScoringService;
    use crate::semantic::TextEmbedderConfig;
    use crate::store::InMemoryProfileStore;
    use crate::{ExperienceLevel, SkillWeightMap, StoredJobRequirement};

    fn job(skills: &[(&str, u32)]) -> JobRequirement {
        JobRequirement {
            title: "Data Engineer".into(),
            industry: "Finance".into(),
            description: "Build batch pipelines in Python and SQL for risk reporting.".into(),
            skills: skills.iter().map(|(s, w)| (s.to_string(), *w)).collect(),
        }
    }

    fn candidate(tag: &str, skills: &[&str], industries: &[&str]) -> CandidateProfile {
        CandidateProfile::new(
            format!("{tag}: engineer with {}", skills.join(", ")),
            industries.iter().map(|s| s.to_string()).collect(),
            skills.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn engine(
        store: Arc<dyn ProfileStore>,
        scorer: Arc<ScriptedScoringService>,
        config: MatchingConfig,
    ) -> MatchingEngine {
        let overall = OverallMatchScorer::with_embedder(
            scorer,
            config.ai_timeout,
            TextEmbedderConfig::default(),
        );
        MatchingEngine::with_overall_scorer(store, overall, config)
    }

    fn twelve_candidates() -> Vec<CandidateProfile> {
        (0..12)
            .map(|i| {
                let skills: &[&str] = if i % 2 == 0 { &["Python", "SQL"] } else { &["python"] };
                candidate(&format!("cand-{i:02}"), skills, &["Finance"])
            })
            .collect()
    }

    #[tokio::test]
    async fn returns_at_most_five_sorted_and_bounds_ai_calls() {
        let store = Arc::new(InMemoryProfileStore::with_candidates(twelve_candidates()));
        let scorer = Arc::new(ScriptedScoringService::new(60));
        let engine = engine(store, scorer.clone(), MatchingConfig::default());

        let results = engine
            .match_candidates_for_job(job(&[("Python", 60), ("SQL", 40)]))
            .await
            .unwrap()
            .into_vec();

        assert_eq!(results.len(), 5);
        assert!(scorer.calls() <= 10, "{} calls", scorer.calls());
        for pair in results.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
        assert!(results.iter().all(|r| r.technical_score == 100.0));
    }

    #[tokio::test]
    async fn one_success_out_of_ten_yields_one_result() {
        let candidates: Vec<_> = (0..10)
            .map(|i| candidate(&format!("cand-{i:02}"), &["Python"], &[]))
            .collect();
        let store = Arc::new(InMemoryProfileStore::with_candidates(candidates));
        let scorer = Arc::new(
            ScriptedScoringService::new(0)
                .score_when_contains("cand-07", 90)
                .fail_when_contains("cand-"),
        );
        let engine = engine(store, scorer.clone(), MatchingConfig::default());

        let results = engine
            .match_candidates_for_job(job(&[("Python", 100)]))
            .await
            .unwrap()
            .into_vec();

        assert_eq!(results.len(), 1);
        assert!(results[0].subject.full_content.starts_with("cand-07"));
        assert_eq!(scorer.calls(), 10);
    }

    #[tokio::test]
    async fn one_failure_out_of_ten_still_fills_the_response() {
        let candidates: Vec<_> = (0..10)
            .map(|i| candidate(&format!("cand-{i:02}"), &["Python"], &[]))
            .collect();
        let store = Arc::new(InMemoryProfileStore::with_candidates(candidates));
        let scorer = Arc::new(
            ScriptedScoringService::new(60)
                .score_when_contains("cand-04", 100)
                .fail_when_contains("cand-05"),
        );
        let config = MatchingConfig {
            candidate_results: 10,
            ..MatchingConfig::default()
        };
        let engine = engine(store, scorer.clone(), config);

        let results = engine
            .match_candidates_for_job(job(&[("Python", 100)]))
            .await
            .unwrap()
            .into_vec();

        assert_eq!(engine.config().candidate_results, 5);
        assert_eq!(scorer.calls(), 10);
        assert_eq!(results.len(), 5);
        assert!(results[0].subject.full_content.starts_with("cand-04"));
        assert!(
            results
                .iter()
                .all(|r| !r.subject.full_content.starts_with("cand-05"))
        );
    }

    #[tokio::test]
    async fn total_scoring_outage_is_an_error_not_an_empty_result() {
        let candidates: Vec<_> = (0..3)
            .map(|i| candidate(&format!("cand-{i:02}"), &["Python"], &[]))
            .collect();
        let store = Arc::new(InMemoryProfileStore::with_candidates(candidates));
        let scorer = Arc::new(ScriptedScoringService::new(70).fail_when_contains("cand-"));

        for failure_policy in [ScoringFailurePolicy::Exclude, ScoringFailurePolicy::Demote] {
            let config = MatchingConfig {
                failure_policy,
                ..MatchingConfig::default()
            };
            let engine = engine(store.clone(), scorer.clone(), config);

            let err = engine
                .match_candidates_for_job(job(&[("Python", 100)]))
                .await
                .unwrap_err();

            assert!(
                matches!(
                    err,
                    MatchError::ScoringUnavailable {
                        shortlisted: 3,
                        last: ScoringUnavailable::Status(503)
                    }
                ),
                "{err:?}"
            );
        }
        assert_eq!(scorer.calls(), 6);
    }

    #[tokio::test]
    async fn alias_skills_in_stored_candidates_still_match() {
        let store = Arc::new(InMemoryProfileStore::with_candidates([candidate(
            "cand-00",
            &["js"],
            &[],
        )]));
        let scorer = Arc::new(ScriptedScoringService::new(70));
        let engine = engine(store, scorer.clone(), MatchingConfig::default());

        let results = engine
            .match_candidates_for_job(job(&[("JavaScript", 100)]))
            .await
            .unwrap()
            .into_vec();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].technical_score, 100.0);
        assert_eq!(scorer.calls(), 1);
    }

    #[tokio::test]
    async fn demote_policy_keeps_failed_entries_flagged() {
        let candidates: Vec<_> = (0..3)
            .map(|i| candidate(&format!("cand-{i:02}"), &["Python"], &[]))
            .collect();
        let store = Arc::new(InMemoryProfileStore::with_candidates(candidates));
        let scorer = Arc::new(
            ScriptedScoringService::new(0)
                .score_when_contains("cand-02", 80)
                .fail_when_contains("cand-"),
        );
        let config = MatchingConfig {
            failure_policy: ScoringFailurePolicy::Demote,
            ..MatchingConfig::default()
        };
        let engine = engine(store, scorer, config);

        let results = engine
            .match_candidates_for_job(job(&[("Python", 100)]))
            .await
            .unwrap()
            .into_vec();

        assert_eq!(results.len(), 3);
        assert!(!results[0].degraded);
        assert!(results[1..].iter().all(|r| r.degraded));
        assert!(results[1..]
            .iter()
            .all(|r| r.overall.as_ref().is_some_and(|o| o.score == 0.0)));
    }

    #[tokio::test]
    async fn panicking_scorer_counts_as_failure() {
        let store = Arc::new(InMemoryProfileStore::with_candidates([
            candidate("cand-00", &["Python"], &[]),
            candidate("cand-01", &["Python"], &[]),
        ]));
        let scorer = Arc::new(ScriptedScoringService::new(70).panic_when_contains("cand-00"));
        let engine = engine(store, scorer, MatchingConfig::default());

        let results = engine
            .match_candidates_for_job(job(&[("Python", 100)]))
            .await
            .unwrap()
            .into_vec();

        assert_eq!(results.len(), 1);
        assert!(results[0].subject.full_content.starts_with("cand-01"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_scorer_is_cut_off_by_timeout() {
        let store = Arc::new(InMemoryProfileStore::with_candidates([
            candidate("cand-00", &["Python"], &[]),
            candidate("cand-01", &["Python"], &[]),
        ]));
        let scorer = Arc::new(ScriptedScoringService::new(70).delay_when_contains(
            "cand-00",
            Duration::from_secs(120),
            99,
        ));
        let config = MatchingConfig {
            ai_timeout: Duration::from_secs(2),
            ..MatchingConfig::default()
        };
        let engine = engine(store, scorer, config);

        let results = engine
            .match_candidates_for_job(job(&[("Python", 100)]))
            .await
            .unwrap()
            .into_vec();

        assert_eq!(results.len(), 1);
        assert!(results[0].subject.full_content.starts_with("cand-01"));
    }

    #[tokio::test]
    async fn no_overlap_is_no_matches_without_ai_calls() {
        let store = Arc::new(InMemoryProfileStore::with_candidates([candidate(
            "cand-00",
            &["Excel"],
            &["Retail"],
        )]));
        let scorer = Arc::new(ScriptedScoringService::new(90));
        let engine = engine(store.clone(), scorer.clone(), MatchingConfig::default());

        let outcome = engine
            .match_candidates_for_job(job(&[("Python", 60), ("SQL", 40)]))
            .await
            .unwrap();

        assert!(outcome.is_no_matches());
        assert_eq!(scorer.calls(), 0);
        assert_eq!(store.job_count().await, 1);
    }

    #[tokio::test]
    async fn repeated_requests_rank_identically() {
        let store = Arc::new(InMemoryProfileStore::with_candidates(twelve_candidates()));
        let scorer = Arc::new(ScriptedScoringService::new(55).score_when_contains("cand-04", 95));
        let engine = engine(store, scorer, MatchingConfig::default());
        let request = job(&[("Python", 60), ("SQL", 40)]);

        let first = engine.match_candidates_for_job(request.clone()).await.unwrap().into_vec();
        let second = engine.match_candidates_for_job(request).await.unwrap().into_vec();

        let ids = |r: &[ScoredCandidate]| r.iter().map(|c| c.subject.id).collect::<Vec<_>>();
        let scores = |r: &[ScoredCandidate]| r.iter().map(|c| c.final_score).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(scores(&first), scores(&second));
        assert!(first[0].subject.full_content.starts_with("cand-04"));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_persisting() {
        let store = Arc::new(InMemoryProfileStore::new());
        let engine = engine(
            store.clone(),
            Arc::new(ScriptedScoringService::new(50)),
            MatchingConfig::default(),
        );
        let mut request = job(&[("Python", 100)]);
        request.title = "   ".into();

        let err = engine.match_candidates_for_job(request).await.unwrap_err();
        let empty_skills = engine
            .match_candidates_for_job(job(&[]))
            .await
            .unwrap_err();

        assert!(matches!(err, MatchError::InvalidInput(ref msg) if msg.contains("job_title")));
        assert!(matches!(empty_skills, MatchError::InvalidInput(_)));
        assert_eq!(store.job_count().await, 0);
    }

    struct FailingStore;

    #[async_trait]
    impl ProfileStore for FailingStore {
        async fn insert_job_requirement(
            &self,
            _requirement: &JobRequirement,
            _experience_level: ExperienceLevel,
        ) -> Result<StoredJobRequirement, StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }

        async fn insert_candidate_profile(
            &self,
            _profile: &CandidateProfile,
        ) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }

        async fn query_candidates_by_skill_overlap(
            &self,
            _skills: &BTreeSet<String>,
            _limit: usize,
        ) -> Result<Vec<CandidateProfile>, StoreError> {
            Ok(vec![])
        }

        async fn query_jobs_by_skill_overlap(
            &self,
            _skills: &BTreeSet<String>,
            _limit: usize,
        ) -> Result<Vec<StoredJobRequirement>, StoreError> {
            Ok(vec![])
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn persistence_failure_aborts_request() {
        let scorer = Arc::new(ScriptedScoringService::new(50));
        let engine = engine(Arc::new(FailingStore), scorer.clone(), MatchingConfig::default());

        let job_err = engine
            .match_candidates_for_job(job(&[("Python", 100)]))
            .await
            .unwrap_err();
        let cv_err = engine
            .match_job_for_candidate("Python developer")
            .await
            .unwrap_err();

        assert!(matches!(job_err, MatchError::Persistence(_)));
        assert!(matches!(cv_err, MatchError::Persistence(_)));
        assert_eq!(scorer.calls(), 0);
    }

    #[tokio::test]
    async fn candidate_gets_single_best_job() {
        let store = Arc::new(InMemoryProfileStore::new());
        let finance = job(&[("Python", 60), ("SQL", 40)]);
        let frontend = JobRequirement {
            title: "Frontend Developer".into(),
            industry: "Retail".into(),
            description: "React storefront work.".into(),
            skills: SkillWeightMap::from([("React".to_string(), 70), ("Python".to_string(), 30)]),
        };
        let stored_finance = store
            .insert_job_requirement(&finance, ExperienceLevel::Mid)
            .await
            .unwrap();
        store
            .insert_job_requirement(&frontend, ExperienceLevel::Mid)
            .await
            .unwrap();
        let engine = engine(
            store.clone(),
            Arc::new(ScriptedScoringService::new(70)),
            MatchingConfig::default(),
        );

        let results = engine
            .match_job_for_candidate(
                "Six years as a data engineer at an investment bank. Python, SQL, Airflow.",
            )
            .await
            .unwrap()
            .into_vec();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subject.id, stored_finance.id);
        assert_eq!(results[0].technical_score, 100.0);
        assert_eq!(store.candidate_count().await, 1);
    }

    #[tokio::test]
    async fn cv_without_known_skills_is_no_matches() {
        let store = Arc::new(InMemoryProfileStore::new());
        store
            .insert_job_requirement(&job(&[("Python", 100)]), ExperienceLevel::Mid)
            .await
            .unwrap();
        let scorer = Arc::new(ScriptedScoringService::new(70));
        let engine = engine(store.clone(), scorer.clone(), MatchingConfig::default());

        let outcome = engine
            .match_job_for_candidate("Pastry chef with ten years in French kitchens.")
            .await
            .unwrap();

        assert!(outcome.is_no_matches());
        assert_eq!(scorer.calls(), 0);
        assert_eq!(store.candidate_count().await, 1);
    }

    #[test]
    fn job_document_carries_title_and_description() {
        let doc = job_document(&job(&[("Python", 100)]));

        assert!(doc.starts_with("Data Engineer"));
        assert!(doc.contains("Industry: Finance"));
        assert!(doc.contains("risk reporting"));
    }
}
