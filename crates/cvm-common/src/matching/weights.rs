/// Final ranking blend (all component scores are on a 0–100 scale).
///
/// Overall fit dominates because it is the only criterion that reads the
/// full CV against the full job description; technical match is the strongest
/// structured signal; industry history is a tie-breaker.
pub const FINAL_WEIGHTS: FinalWeights = FinalWeights {
    industry: 0.10,
    technical: 0.30,
    overall: 0.60,
};

/// Shortlist priority = technical × 3 + industry.
///
/// Mirrors the 30 / 10 ratio of the final blend so the cheap ranking orders
/// candidates the same way the final score would if overall fit were equal.
pub const SHORTLIST_TECHNICAL_MULTIPLIER: f64 = 3.0;

/// Overall fit = 85% external AI judgment + 15% local text similarity.
///
/// The local score only smooths out AI variance; it cannot overrule it.
pub const OVERALL_WEIGHTS: OverallWeights = OverallWeights {
    ai: 0.85,
    natural_language: 0.15,
};

/// Candidates passed to the expensive stage (K).
pub const DEFAULT_SHORTLIST_SIZE: usize = 10;
/// Candidates returned for a job (N).
pub const DEFAULT_CANDIDATE_RESULTS: usize = 5;
/// Upper bound on K; configuration may only lower it.
pub const MAX_SHORTLIST_SIZE: usize = DEFAULT_SHORTLIST_SIZE;
/// Upper bound on N; configuration may only lower it.
pub const MAX_CANDIDATE_RESULTS: usize = DEFAULT_CANDIDATE_RESULTS;
/// Jobs returned for a candidate.
pub const DEFAULT_JOB_RESULTS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalWeights {
    pub industry: f64,
    pub technical: f64,
    pub overall: f64,
}

impl FinalWeights {
    pub fn sum(&self) -> f64 {
        self.industry + self.technical + self.overall
    }

    pub fn combine(&self, industry: f64, technical: f64, overall: f64) -> f64 {
        industry * self.industry + technical * self.technical + overall * self.overall
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallWeights {
    pub ai: f64,
    pub natural_language: f64,
}

impl OverallWeights {
    pub fn sum(&self) -> f64 {
        self.ai + self.natural_language
    }

    pub fn combine(&self, ai: f64, natural_language: f64) -> f64 {
        ai * self.ai + natural_language * self.natural_language
    }
}
