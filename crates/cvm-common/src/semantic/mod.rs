pub mod config;
pub mod hash_embedder;
pub mod tokenizer;
pub mod vector;

pub use config::TextEmbedderConfig;
pub use hash_embedder::HashTextEmbedder;
pub use vector::TermVector;

/// Local, model-free similarity of a CV and a job description.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSimilarity {
    /// 0.0〜100.0
    pub score: f64,
    /// Most heavily weighted terms present in both texts
    pub shared_terms: Vec<String>,
    pub reasoning: String,
}

/// Score two documents with the hashed bag-of-words embedder.
pub fn text_similarity(
    embedder: &HashTextEmbedder,
    candidate_text: &str,
    job_text: &str,
) -> TextSimilarity {
    let cosine = embedder.embed(candidate_text).cosine(&embedder.embed(job_text));
    let score = (f64::from(cosine) * 100.0).clamp(0.0, 100.0);

    let candidate_terms = embedder.term_weights(candidate_text);
    let job_terms = embedder.term_weights(job_text);

    let mut shared: Vec<(String, f32)> = job_terms
        .iter()
        .filter_map(|(token, job_weight)| {
            candidate_terms
                .get(token)
                .map(|cand_weight| (token.clone(), job_weight * cand_weight))
        })
        .collect();
    shared.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut shared_terms: Vec<String> = Vec::new();
    for (token, _) in shared {
        let display = token
            .strip_prefix("skill:")
            .or_else(|| token.strip_prefix("term:"))
            .unwrap_or(&token)
            .to_string();
        if !shared_terms.iter().any(|t| t.eq_ignore_ascii_case(&display)) {
            shared_terms.push(display);
        }
        if shared_terms.len() >= embedder.config.max_explained_terms {
            break;
        }
    }

    let reasoning = if shared_terms.is_empty() {
        format!(
            "Text similarity {score:.0}/100: the CV and the job description share no significant terms."
        )
    } else {
        format!(
            "Text similarity {score:.0}/100 based on shared vocabulary: {}.",
            shared_terms.join(", ")
        )
    };

    TextSimilarity {
        score,
        shared_terms,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_score_full_marks() {
        let embedder = HashTextEmbedder::new(TextEmbedderConfig::default());
        let text = "Data engineer with Spark and Kafka pipelines";

        let sim = text_similarity(&embedder, text, text);

        assert!((sim.score - 100.0).abs() < 1e-3, "{}", sim.score);
        assert!(sim.shared_terms.iter().any(|t| t == "Spark"));
    }

    #[test]
    fn unrelated_texts_explain_missing_overlap() {
        let embedder = HashTextEmbedder::new(TextEmbedderConfig::default());

        let sim = text_similarity(&embedder, "gardening tulips", "quantum chromodynamics");

        assert!(sim.shared_terms.is_empty());
        assert!(sim.reasoning.contains("share no significant terms"));
    }

    #[test]
    fn explanation_is_bounded() {
        let embedder = HashTextEmbedder::new(TextEmbedderConfig {
            max_explained_terms: 2,
            ..TextEmbedderConfig::default()
        });
        let text = "alpha beta gamma delta epsilon";

        let sim = text_similarity(&embedder, text, text);

        assert_eq!(sim.shared_terms.len(), 2);
    }
}
