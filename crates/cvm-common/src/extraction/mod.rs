use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ExperienceLevel;
use crate::skill_normalizer::extract_skills;

/// Industry display name → phrases that indicate it in free text.
const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Finance",
        &["finance", "financial services", "investment bank", "asset management", "trading desk"],
    ),
    ("Banking", &["banking", "retail bank", "commercial bank"]),
    ("Insurance", &["insurance", "insurer", "underwriting", "reinsurance"]),
    ("FinTech", &["fintech", "payments", "neobank"]),
    ("Accounting", &["accounting", "audit firm", "bookkeeping"]),
    (
        "Technology",
        &["technology company", "tech company", "information technology", "tech startup"],
    ),
    ("Software", &["software company", "software house", "software vendor"]),
    ("SaaS", &["saas", "software as a service"]),
    ("IT Services", &["it services", "managed services", "outsourcing"]),
    ("Telecommunications", &["telecommunications", "telecom", "telco", "mobile operator"]),
    ("Healthcare", &["healthcare", "health care", "hospital", "clinic", "nhs"]),
    ("Pharmaceuticals", &["pharmaceutical", "pharma", "drug discovery"]),
    ("Biotechnology", &["biotech", "biotechnology", "life sciences"]),
    ("Medical Devices", &["medical device", "medtech"]),
    ("Retail", &["retail", "retailer", "supermarket", "store chain"]),
    ("E-commerce", &["e-commerce", "ecommerce", "online marketplace", "online retail"]),
    ("Consumer Goods", &["consumer goods", "fmcg", "cpg"]),
    ("Hospitality", &["hospitality", "hotel", "restaurant"]),
    ("Manufacturing", &["manufacturing", "factory", "production plant"]),
    ("Automotive", &["automotive", "car manufacturer", "vehicle"]),
    ("Aerospace", &["aerospace", "aviation", "airline"]),
    ("Energy", &["energy", "renewables", "power plant"]),
    ("Oil and Gas", &["oil and gas", "oil & gas", "petroleum"]),
    ("Utilities", &["utilities", "utility company", "water company"]),
    ("Logistics", &["logistics", "supply chain", "warehouse", "freight"]),
    ("Transportation", &["transportation", "transport", "rail", "shipping"]),
    ("Education", &["education", "university", "school", "teaching"]),
    ("Education Technology", &["edtech", "e-learning", "online learning"]),
    ("Media", &["media", "broadcasting", "newspaper"]),
    ("Entertainment", &["entertainment", "film studio", "streaming service"]),
    ("Advertising", &["advertising", "ad tech", "adtech"]),
    ("Marketing", &["marketing agency", "digital marketing"]),
    ("Publishing", &["publishing", "publisher"]),
    ("Gaming", &["gaming", "game studio", "video game"]),
    ("Government", &["government", "public sector", "ministry", "municipal"]),
    ("Defense", &["defense", "defence", "military"]),
    ("Non-profit", &["non-profit", "nonprofit", "charity", "ngo"]),
    ("Consulting", &["consulting", "consultancy"]),
    ("Real Estate", &["real estate", "property management", "proptech"]),
    ("Construction", &["construction", "civil engineering"]),
    ("Agriculture", &["agriculture", "agritech", "farming"]),
];

lazy_static! {
    // 業界キーワード（語境界つき、大小無視）
    static ref INDUSTRY_PATTERNS: Vec<(&'static str, Regex)> = INDUSTRY_KEYWORDS
        .iter()
        .map(|(industry, keywords)| {
            let alternatives = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)(?:^|[^\w-])(?:{alternatives})(?:$|[^\w-])");
            (*industry, Regex::new(&pattern).unwrap())
        })
        .collect();

    // "5+ years", "3 yrs", "10 years of experience"
    static ref YEARS_RE: Regex = Regex::new(r"(?i)(\d{1,2})\s*\+?\s*(?:years?|yrs?)").unwrap();
    static ref SENIOR_RE: Regex =
        Regex::new(r"(?i)\b(senior|sr\.?|lead|principal|staff|head of|architect)\b").unwrap();
    static ref JUNIOR_RE: Regex =
        Regex::new(r"(?i)\b(junior|jr\.?|entry[- ]level|graduate|intern(ship)?|trainee)\b").unwrap();
}

/// Years of experience at or above which a role is senior.
pub const SENIOR_MIN_YEARS: u32 = 5;
/// Years of experience at or below which a role is junior.
pub const JUNIOR_MAX_YEARS: u32 = 2;

/// Skills and industries read from a raw CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferredProfile {
    pub skills: BTreeSet<String>,
    pub industries: BTreeSet<String>,
}

/// Industries mentioned in free text, by display name.
pub fn extract_industries(text: &str) -> BTreeSet<String> {
    INDUSTRY_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(industry, _)| industry.to_string())
        .collect()
}

pub fn infer_profile(full_content: &str) -> InferredProfile {
    let profile = InferredProfile {
        skills: extract_skills(full_content),
        industries: extract_industries(full_content),
    };
    debug!(
        skills = profile.skills.len(),
        industries = profile.industries.len(),
        "inferred candidate profile"
    );
    profile
}

/// Seniority of a job from its title and description.
///
/// An explicit title keyword wins; otherwise the largest "N years" figure in
/// either text decides; otherwise description keywords; otherwise mid.
pub fn infer_experience_level(title: &str, description: &str) -> ExperienceLevel {
    if SENIOR_RE.is_match(title) {
        return ExperienceLevel::Senior;
    }
    if JUNIOR_RE.is_match(title) {
        return ExperienceLevel::Junior;
    }

    let max_years = YEARS_RE
        .captures_iter(title)
        .chain(YEARS_RE.captures_iter(description))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max();

    if let Some(years) = max_years {
        return if years >= SENIOR_MIN_YEARS {
            ExperienceLevel::Senior
        } else if years <= JUNIOR_MAX_YEARS {
            ExperienceLevel::Junior
        } else {
            ExperienceLevel::Mid
        };
    }

    if SENIOR_RE.is_match(description) {
        ExperienceLevel::Senior
    } else if JUNIOR_RE.is_match(description) {
        ExperienceLevel::Junior
    } else {
        ExperienceLevel::Mid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industries_are_found_by_keyword() {
        let found = extract_industries(
            "Five years at a retail bank, then a payments startup. Previously worked in a hospital.",
        );

        assert!(found.contains("Banking"));
        assert!(found.contains("FinTech"));
        assert!(found.contains("Healthcare"));
    }

    #[test]
    fn industry_keywords_respect_word_boundaries() {
        let found = extract_industries("Refinanced the mortgage; transported boxes.");

        assert!(!found.contains("Finance"));
        assert!(!found.contains("Transportation"));
    }

    #[test]
    fn profile_combines_skills_and_industries() {
        let profile = infer_profile("Backend developer in insurance. Python, PostgreSQL, k8s.");

        assert!(profile.skills.contains("Python"));
        assert!(profile.skills.contains("Kubernetes"));
        assert!(profile.industries.contains("Insurance"));
    }

    #[test]
    fn title_keywords_decide_first() {
        assert_eq!(
            infer_experience_level("Senior Data Engineer", "1 year of experience is fine"),
            ExperienceLevel::Senior
        );
        assert_eq!(
            infer_experience_level("Junior Developer", "8+ years preferred"),
            ExperienceLevel::Junior
        );
    }

    #[test]
    fn years_of_experience_decide_next() {
        assert_eq!(
            infer_experience_level("Data Engineer", "You have 5+ years of Python"),
            ExperienceLevel::Senior
        );
        assert_eq!(
            infer_experience_level("Data Engineer", "1-2 yrs with SQL"),
            ExperienceLevel::Junior
        );
        assert_eq!(
            infer_experience_level("Data Engineer", "3 years in analytics"),
            ExperienceLevel::Mid
        );
    }

    #[test]
    fn defaults_to_mid() {
        assert_eq!(
            infer_experience_level("Data Engineer", "Build pipelines."),
            ExperienceLevel::Mid
        );
        assert_eq!(
            infer_experience_level("Analyst", "Graduate scheme for new analysts"),
            ExperienceLevel::Junior
        );
    }
}
