use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringServiceConfig {
    pub enabled: bool,
    pub provider: String,
    pub model: String,
    /// Full chat-completions URL
    pub endpoint: String,
    pub api_key: String,
    /// Per-request HTTP timeout; the pipeline applies its own budget on top.
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Linear backoff step between retries
    pub retry_backoff_ms: u64,
    pub temperature: f32,
}

impl Default for ScoringServiceConfig {
    fn default() -> Self {
        let (model, endpoint) = provider_defaults("openai");
        Self {
            enabled: true,
            provider: "openai".into(),
            model,
            endpoint,
            api_key: String::new(),
            timeout_secs: 30,
            max_retries: 0,
            retry_backoff_ms: 500,
            temperature: 0.0,
        }
    }
}

/// Model and endpoint for each OpenAI-compatible provider.
fn provider_defaults(provider: &str) -> (String, String) {
    match provider.to_ascii_lowercase().as_str() {
        "openai" => (
            "gpt-4o-mini".into(),
            "https://api.openai.com/v1/chat/completions".into(),
        ),
        "mistral" => (
            "mistral-large-latest".into(),
            "https://api.mistral.ai/v1/chat/completions".into(),
        ),
        "xai" => (
            "grok-2-latest".into(),
            "https://api.x.ai/v1/chat/completions".into(),
        ),
        "deepseek" => (
            "deepseek-chat".into(),
            "https://api.deepseek.com/chat/completions".into(),
        ),
        "groq" => (
            "llama-3.1-70b-versatile".into(),
            "https://api.groq.com/openai/v1/chat/completions".into(),
        ),
        _ => (
            "llama3.1".into(),
            "http://localhost:11434/v1/chat/completions".into(),
        ),
    }
}

fn provider_api_key(provider: &str) -> Option<String> {
    match provider.to_ascii_lowercase().as_str() {
        "openai" => env::var("OPENAI_API_KEY").ok(),
        "mistral" => env::var("MISTRAL_API_KEY").ok(),
        "xai" => env::var("XAI_API_KEY").ok(),
        "deepseek" => env::var("DEEPSEEK_API_KEY").ok(),
        "groq" => env::var("GROQ_API_KEY").ok(),
        _ => None,
    }
}

fn parse_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(val) => matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn parse_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(default)
}

impl ScoringServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let provider = env::var("LLM_PROVIDER").unwrap_or_else(|_| defaults.provider.clone());
        let (default_model, default_endpoint) = provider_defaults(&provider);

        let api_key = env::var("LLM_API_KEY")
            .ok()
            .or_else(|| provider_api_key(&provider))
            .unwrap_or_default();

        Self {
            enabled: parse_bool("LLM_ENABLED", defaults.enabled),
            model: env::var("LLM_MODEL").unwrap_or(default_model),
            endpoint: env::var("LLM_ENDPOINT").unwrap_or(default_endpoint),
            provider,
            api_key,
            timeout_secs: parse_u64("LLM_TIMEOUT_SECONDS", defaults.timeout_secs),
            max_retries: parse_u32("LLM_MAX_RETRIES", defaults.max_retries),
            retry_backoff_ms: parse_u64("LLM_RETRY_BACKOFF_MS", defaults.retry_backoff_ms),
            temperature: env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|raw| raw.parse::<f32>().ok())
                .filter(|t| t.is_finite())
                .unwrap_or(defaults.temperature),
        }
    }

    /// Local endpoints (Ollama, vLLM) usually run without a key.
    pub fn is_local_endpoint(&self) -> bool {
        self.endpoint.starts_with("http://localhost")
            || self.endpoint.starts_with("http://127.0.0.1")
    }
}
