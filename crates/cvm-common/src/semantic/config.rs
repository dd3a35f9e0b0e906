#[derive(Debug, Clone)]
pub struct TextEmbedderConfig {
    /// Hashed vector width (powers of two recommended: 1024, 4096)
    pub dimension: usize,
    /// Weight of vocabulary skills found in the text, relative to plain terms
    pub skill_token_weight: f32,
    /// Number of shared terms quoted in the similarity explanation
    pub max_explained_terms: usize,
}

impl Default for TextEmbedderConfig {
    fn default() -> Self {
        Self {
            dimension: 4096,
            skill_token_weight: 2.0,
            max_explained_terms: 8,
        }
    }
}

impl TextEmbedderConfig {
    /// Reads `CVM_TEXT_EMBEDDING_DIMENSION`; anything unparsable keeps the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dimension: std::env::var("CVM_TEXT_EMBEDDING_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|d: &usize| *d > 0)
                .unwrap_or(defaults.dimension),
            ..defaults
        }
    }
}
