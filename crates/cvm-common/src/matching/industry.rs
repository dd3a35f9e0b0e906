use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use unicode_normalization::UnicodeNormalization;

use crate::CandidateProfile;

/// Exact industry match, before per-overlap bonus.
pub const EXACT_MATCH_BASE: f64 = 90.0;
/// Related-industry match, before per-overlap bonus.
pub const RELATED_MATCH_BASE: f64 = 60.0;
/// Bonus per additional structurally matching industry.
pub const OVERLAP_BONUS: f64 = 5.0;
pub const EXACT_MATCH_CAP: f64 = 100.0;
pub const RELATED_MATCH_CAP: f64 = 75.0;
/// Ceiling of the semantic fallback; always below a related-industry match.
pub const SEMANTIC_FALLBACK_CAP: f64 = 40.0;

/// Alternative spellings → canonical industry key.
const INDUSTRY_ALIASES: &[(&str, &str)] = &[
    ("financial services", "finance"),
    ("banking and finance", "finance"),
    ("information technology", "technology"),
    ("it", "technology"),
    ("tech", "technology"),
    ("software development", "software"),
    ("health care", "healthcare"),
    ("ecommerce", "e-commerce"),
    ("online retail", "e-commerce"),
    ("pharma", "pharmaceuticals"),
    ("oil & gas", "oil and gas"),
    ("telecom", "telecommunications"),
    ("public sector", "government"),
    ("edtech", "education technology"),
    ("fin tech", "fintech"),
    ("video games", "gaming"),
];

/// Symmetric adjacency between industries whose experience transfers.
const RELATED_INDUSTRIES: &[(&str, &[&str])] = &[
    (
        "finance",
        &["banking", "insurance", "fintech", "accounting", "investment management"],
    ),
    ("banking", &["fintech", "insurance", "investment management"]),
    (
        "technology",
        &[
            "software",
            "saas",
            "it services",
            "telecommunications",
            "fintech",
            "e-commerce",
            "gaming",
        ],
    ),
    ("software", &["saas", "it services", "consulting"]),
    (
        "healthcare",
        &["pharmaceuticals", "biotechnology", "medical devices", "health tech", "insurance"],
    ),
    ("pharmaceuticals", &["biotechnology", "medical devices"]),
    ("retail", &["e-commerce", "consumer goods", "wholesale", "hospitality"]),
    ("e-commerce", &["logistics", "consumer goods"]),
    ("manufacturing", &["automotive", "aerospace", "industrial", "energy"]),
    ("automotive", &["transportation", "aerospace"]),
    ("logistics", &["transportation", "supply chain"]),
    ("energy", &["utilities", "oil and gas"]),
    ("education", &["education technology", "research"]),
    ("media", &["entertainment", "advertising", "marketing", "publishing"]),
    ("marketing", &["advertising"]),
    ("government", &["defense", "non-profit"]),
    ("consulting", &["professional services"]),
    ("real estate", &["construction"]),
    ("gaming", &["entertainment"]),
];

static ALIASES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| INDUSTRY_ALIASES.iter().copied().collect());

static ADJACENCY: LazyLock<HashSet<(String, String)>> = LazyLock::new(|| {
    let mut pairs = HashSet::new();
    for (industry, related) in RELATED_INDUSTRIES {
        for other in *related {
            pairs.insert((industry.to_string(), other.to_string()));
            pairs.insert((other.to_string(), industry.to_string()));
        }
    }
    pairs
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryRelevance {
    /// 0.0〜100.0
    pub score: f64,
    pub reasoning: String,
    pub exact_matches: Vec<String>,
    pub related_matches: Vec<String>,
}

/// Canonical comparison key: NFKC, lowercase, "&" spelled out, single spaces.
pub fn normalize_industry(industry: &str) -> String {
    let lowered = industry.nfkc().collect::<String>().to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(canonical) = ALIASES.get(collapsed.as_str()) {
        return canonical.to_string();
    }
    if !collapsed.contains('&') {
        return collapsed;
    }

    let spelled = collapsed
        .replace('&', " and ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    ALIASES
        .get(spelled.as_str())
        .map(|c| c.to_string())
        .unwrap_or(spelled)
}

/// Topical closeness of two industry names without any taxonomy (0.0〜1.0).
fn semantic_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let tokens_b: BTreeSet<&str> = b
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let union = tokens_a.union(&tokens_b).count();
    let jaccard = if union == 0 {
        0.0
    } else {
        tokens_a.intersection(&tokens_b).count() as f64 / union as f64
    };

    (0.5 * jaccard + 0.5 * jaro_winkler(a, b)).clamp(0.0, 1.0)
}

/// How well a candidate's industry history fits the target industry.
///
/// Exact matches beat related-industry matches, which beat the semantic
/// fallback; every additional structural match adds a bonus up to the tier
/// cap. Entirely local: no scoring-service calls.
pub fn analyze_industry_relevance(candidate: &CandidateProfile, target: &str) -> IndustryRelevance {
    let target_key = normalize_industry(target);

    if target_key.is_empty() {
        return IndustryRelevance {
            score: 0.0,
            reasoning: "No target industry was given.".into(),
            exact_matches: vec![],
            related_matches: vec![],
        };
    }

    if candidate.industries.is_empty() {
        return IndustryRelevance {
            score: 0.0,
            reasoning: format!("The candidate lists no industry history to compare with {target}."),
            exact_matches: vec![],
            related_matches: vec![],
        };
    }

    // candidate keys already seen, so "Finance" and "finance" count once
    let mut seen = HashSet::new();
    let mut exact_matches = Vec::new();
    let mut related_matches = Vec::new();
    let mut best_semantic: Option<(&str, f64)> = None;

    for industry in &candidate.industries {
        let key = normalize_industry(industry);
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }

        if key == target_key {
            exact_matches.push(industry.clone());
        } else if ADJACENCY.contains(&(key.clone(), target_key.clone())) {
            related_matches.push(industry.clone());
        } else {
            let similarity = semantic_similarity(&key, &target_key);
            if best_semantic.is_none_or(|(_, best)| similarity > best) {
                best_semantic = Some((industry.as_str(), similarity));
            }
        }
    }

    let related_count = related_matches.len() as f64;

    let (score, reasoning) = if !exact_matches.is_empty() {
        let score = (EXACT_MATCH_BASE + OVERLAP_BONUS * related_count).min(EXACT_MATCH_CAP);
        let reasoning = if related_matches.is_empty() {
            format!("Direct experience in {target}.")
        } else {
            format!(
                "Direct experience in {target}, plus related industries: {}.",
                related_matches.join(", ")
            )
        };
        (score, reasoning)
    } else if !related_matches.is_empty() {
        let score =
            (RELATED_MATCH_BASE + OVERLAP_BONUS * (related_count - 1.0)).min(RELATED_MATCH_CAP);
        (
            score,
            format!(
                "No direct {target} experience, but related industries: {}.",
                related_matches.join(", ")
            ),
        )
    } else {
        match best_semantic {
            Some((closest, similarity)) => {
                let score = SEMANTIC_FALLBACK_CAP * similarity;
                (
                    score,
                    format!(
                        "No direct or related {target} experience; closest industry is {closest} \
                         (similarity {:.0}%).",
                        similarity * 100.0
                    ),
                )
            }
            None => (0.0, format!("No industry history comparable with {target}.")),
        }
    };

    IndustryRelevance {
        score,
        reasoning,
        exact_matches,
        related_matches,
    }
}
