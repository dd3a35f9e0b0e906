use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::SkillWeightMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalScore {
    /// Sum of earned weights. Not clamped: weights that do not add up to 100
    /// show through here.
    pub score: f64,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    /// Required skill → points earned (its weight, or 0)
    pub per_skill_scoring: BTreeMap<String, f64>,
    pub reasoning: String,
}

/// Weighted overlap of the required skills with a candidate's skills.
///
/// Both sides must already be normalized; presence is an exact,
/// case-sensitive membership test and earns the full weight or nothing.
pub fn score_technical_skills(
    candidate_skills: &BTreeSet<String>,
    required: &SkillWeightMap,
) -> TechnicalScore {
    let mut score = 0.0;
    let mut matched_skills = BTreeSet::new();
    let mut missing_skills = BTreeSet::new();
    let mut per_skill_scoring = BTreeMap::new();

    for (skill, weight) in required {
        let earned = if candidate_skills.contains(skill) {
            matched_skills.insert(skill.clone());
            f64::from(*weight)
        } else {
            missing_skills.insert(skill.clone());
            0.0
        };
        score += earned;
        per_skill_scoring.insert(skill.clone(), earned);
    }

    let reasoning = build_reasoning(required, &matched_skills, &missing_skills, score);

    TechnicalScore {
        score,
        matched_skills,
        missing_skills,
        per_skill_scoring,
        reasoning,
    }
}

fn build_reasoning(
    required: &SkillWeightMap,
    matched: &BTreeSet<String>,
    missing: &BTreeSet<String>,
    score: f64,
) -> String {
    if required.is_empty() {
        return "No technical skills were required.".to_string();
    }

    let describe = |skills: &BTreeSet<String>| {
        if skills.is_empty() {
            "none".to_string()
        } else {
            skills
                .iter()
                .map(|s| format!("{s} ({})", required.get(s).copied().unwrap_or_default()))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    format!(
        "Matched {} of {} required skills for {score:.0} points (matched: {} / missing: {}).",
        matched.len(),
        required.len(),
        describe(matched),
        describe(missing),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn skills(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn required(items: &[(&str, u32)]) -> SkillWeightMap {
        items.iter().map(|(s, w)| (s.to_string(), *w)).collect()
    }

    #[test]
    fn full_overlap_scores_hundred() {
        let result = score_technical_skills(
            &skills(&["Python", "SQL", "Docker"]),
            &required(&[("Python", 60), ("SQL", 40)]),
        );

        assert_eq!(result.score, 100.0);
        assert_eq!(result.matched_skills, skills(&["Python", "SQL"]));
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn partial_overlap_earns_matched_weights() {
        let result = score_technical_skills(
            &skills(&["Python"]),
            &required(&[("Python", 60), ("SQL", 40)]),
        );

        assert_eq!(result.score, 60.0);
        assert_eq!(result.missing_skills, skills(&["SQL"]));
        assert_eq!(result.per_skill_scoring["Python"], 60.0);
        assert_eq!(result.per_skill_scoring["SQL"], 0.0);
        assert!(result.reasoning.contains("missing: SQL (40)"));
    }

    #[test]
    fn zero_overlap_scores_zero() {
        let result = score_technical_skills(
            &skills(&["Excel"]),
            &required(&[("Python", 60), ("SQL", 40)]),
        );

        assert_eq!(result.score, 0.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.reasoning.contains("matched: none"));
    }

    #[test]
    fn presence_is_case_sensitive() {
        let result = score_technical_skills(&skills(&["python"]), &required(&[("Python", 100)]));

        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn malformed_weights_are_not_clamped() {
        let result = score_technical_skills(
            &skills(&["Python", "SQL"]),
            &required(&[("Python", 90), ("SQL", 90)]),
        );

        assert_eq!(result.score, 180.0);
    }

    #[test]
    fn empty_requirements_score_zero() {
        let result = score_technical_skills(&skills(&["Python"]), &SkillWeightMap::new());

        assert_eq!(result.score, 0.0);
        assert_eq!(result.reasoning, "No technical skills were required.");
    }

    proptest! {
        #[test]
        fn adding_a_skill_never_lowers_the_score(
            weights in proptest::collection::btree_map("[a-e]", 0u32..=100, 1..5),
            owned in proptest::collection::btree_set("[a-e]", 0..5),
            extra in "[a-e]",
        ) {
            let before = score_technical_skills(&owned, &weights);
            let mut more = owned.clone();
            more.insert(extra);
            let after = score_technical_skills(&more, &weights);

            prop_assert!(after.score >= before.score);
        }

        #[test]
        fn holding_every_skill_earns_total_weight(
            weights in proptest::collection::btree_map("[a-z]{1,6}", 0u32..=100, 1..6),
        ) {
            let owned: BTreeSet<String> = weights.keys().cloned().collect();
            let total: u32 = weights.values().sum();

            let result = score_technical_skills(&owned, &weights);

            prop_assert_eq!(result.score, f64::from(total));
            prop_assert!(result.missing_skills.is_empty());
        }
    }
}
