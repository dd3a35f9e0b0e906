use unicode_normalization::UnicodeNormalization;

use crate::skill_normalizer::extract_skills;

/// 重み付きトークン
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedToken {
    pub token: String,
    pub weight: f32,
}

impl WeightedToken {
    pub fn new(token: impl Into<String>, weight: f32) -> Self {
        Self {
            token: token.into(),
            weight,
        }
    }
}

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "been", "being", "both", "but", "by", "can", "could", "did", "do", "does", "doing",
    "during", "each", "etc", "few", "for", "from", "had", "has", "have", "having", "he", "her",
    "here", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me", "more",
    "most", "my", "no", "nor", "not", "of", "on", "once", "only", "or", "other", "our", "ours",
    "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
];

/// Token forms:
/// - term:<word>      (lowercased word, stopwords removed)
/// - skill:<canonical> (vocabulary skill found in the text)
pub fn tokenize_text(text: &str, skill_weight: f32) -> Vec<WeightedToken> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();

    let mut tokens: Vec<WeightedToken> = normalized
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#')))
        .filter(|word| word.chars().count() >= 2)
        .filter(|word| !STOPWORDS.contains(word))
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .map(|word| WeightedToken::new(format!("term:{word}"), 1.0))
        .collect();

    for skill in extract_skills(text) {
        tokens.push(WeightedToken::new(format!("skill:{skill}"), skill_weight));
    }

    tokens
}
