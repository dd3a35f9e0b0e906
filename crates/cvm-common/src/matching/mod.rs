pub mod industry;
pub mod overall;
pub mod pipeline;
pub mod prefilter;
pub mod scoring;
pub mod skills;
pub mod weights;

pub use industry::{IndustryRelevance, analyze_industry_relevance};
pub use overall::{OverallMatch, OverallMatchScorer};
pub use pipeline::{MatchError, MatchOutcome, MatchingEngine, job_document};
pub use prefilter::{PreFilterConfig, SkillOverlapPreFilter};
pub use scoring::{
    MatchingConfig, ScoredCandidate, ScoredJob, ScoredMatch, ScoringFailurePolicy,
};
pub use skills::{TechnicalScore, score_technical_skills};
