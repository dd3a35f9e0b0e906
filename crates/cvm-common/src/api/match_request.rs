use serde::Deserialize;

use crate::{JobRequirement, SkillWeightMap};

/// `POST /api/job-matching` の入力
///
/// Keys are camelCase like every response body; the snake_case forms are
/// accepted as well. Every field defaults to empty so a missing field is
/// rejected by the engine like a blank one, rather than failing
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchingRequest {
    #[serde(default, alias = "job_title")]
    pub job_title: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default, alias = "detailed_description")]
    pub detailed_description: String,
    #[serde(default)]
    pub skills: SkillWeightMap,
}

impl JobMatchingRequest {
    pub fn into_requirement(self) -> JobRequirement {
        JobRequirement {
            title: self.job_title.trim().to_string(),
            industry: self.industry.trim().to_string(),
            description: self.detailed_description,
            skills: self.skills,
        }
    }
}

/// `POST /api/cv-matching` の入力
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvMatchingRequest {
    #[serde(default, alias = "full_content")]
    pub full_content: String,
}
