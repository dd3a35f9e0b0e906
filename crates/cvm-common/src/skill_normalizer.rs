use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::SkillWeightMap;

/// Controlled vocabulary: canonical spelling → accepted aliases.
///
/// The canonical entry itself always matches case-insensitively; aliases only
/// need to list the spellings that differ from it.
const VOCABULARY: &[(&str, &[&str])] = &[
    // Languages
    ("JavaScript", &["js", "java script", "ecmascript", "es6"]),
    ("TypeScript", &["ts", "type script"]),
    ("Python", &["python3", "python 3", "py"]),
    ("Java", &["java8", "java11", "java17", "openjdk"]),
    ("C#", &["csharp", "c sharp"]),
    ("C++", &["cpp", "c plus plus"]),
    ("C", &[]),
    ("Go", &["golang", "go lang"]),
    ("Rust", &["rust lang", "rustlang"]),
    ("PHP", &["php7", "php8"]),
    ("Ruby", &[]),
    ("Swift", &[]),
    ("Kotlin", &[]),
    ("Scala", &[]),
    ("R", &[]),
    ("SQL", &["structured query language"]),
    ("HTML", &["html5"]),
    ("CSS", &["css3"]),
    ("Bash", &["shell scripting", "shell"]),
    // Frontend
    ("React", &["reactjs", "react.js", "react js"]),
    ("Vue.js", &["vue", "vuejs", "vue js"]),
    ("Angular", &["angularjs", "angular.js"]),
    ("Svelte", &["sveltejs"]),
    ("Next.js", &["nextjs", "next js"]),
    ("Sass", &["scss"]),
    ("Tailwind CSS", &["tailwind", "tailwindcss"]),
    ("Redux", &[]),
    // Backend
    ("Node.js", &["node", "nodejs", "node js"]),
    ("Express", &["express.js", "expressjs"]),
    ("Django", &["django rest framework", "drf"]),
    ("Flask", &[]),
    ("FastAPI", &["fast api"]),
    ("Spring Boot", &["springboot", "spring"]),
    ("Laravel", &[]),
    ("Ruby on Rails", &["rails", "ror"]),
    (".NET", &["dotnet", "asp.net", ".net core"]),
    ("GraphQL", &[]),
    ("REST", &["rest api", "restful", "restful api"]),
    // Data stores
    ("PostgreSQL", &["postgres", "postgre sql"]),
    ("MySQL", &["my sql", "mariadb"]),
    ("MongoDB", &["mongo", "mongo db"]),
    ("Redis", &[]),
    ("Elasticsearch", &["elastic search"]),
    ("SQLite", &["sqlite3"]),
    // Cloud and DevOps
    ("AWS", &["amazon web services"]),
    ("GCP", &["google cloud platform", "google cloud"]),
    ("Azure", &["microsoft azure"]),
    ("Docker", &["docker container"]),
    ("Kubernetes", &["k8s", "kube"]),
    ("Terraform", &[]),
    ("Ansible", &[]),
    ("Jenkins", &[]),
    ("Git", &["github", "gitlab"]),
    ("CI/CD", &["ci cd", "continuous integration"]),
    ("Linux", &["unix"]),
    // Data and ML
    ("Kafka", &["apache kafka"]),
    ("Spark", &["apache spark", "pyspark"]),
    ("Hadoop", &["apache hadoop"]),
    ("Pandas", &[]),
    ("NumPy", &[]),
    ("TensorFlow", &["tensor flow"]),
    ("PyTorch", &["torch"]),
    ("Scikit-learn", &["sklearn", "scikit learn"]),
    ("Machine Learning", &["ml"]),
    ("Deep Learning", &["neural networks"]),
    ("NLP", &["natural language processing"]),
    ("Data Analysis", &["data analytics"]),
    ("Excel", &["microsoft excel", "ms excel"]),
    ("Power BI", &["powerbi"]),
    ("Tableau", &[]),
    // Testing
    ("Jest", &[]),
    ("Cypress", &[]),
    ("Selenium", &["selenium webdriver"]),
    ("Pytest", &[]),
    // Mobile
    ("React Native", &["react-native", "reactnative"]),
    ("Flutter", &[]),
    // Process and design
    ("Agile", &[]),
    ("Scrum", &[]),
    ("Figma", &[]),
];

/// Aliases that are ordinary English words; only honoured as whole skill keys,
/// never when scanning free text.
const TEXT_SCAN_EXCLUDED: &[&str] = &[
    "c", "r", "go", "node", "shell", "spring", "swift", "express", "rest", "ml", "py", "ts",
    "kube", "torch", "unix", "rails",
];

static ALIAS_TO_CANONICAL: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (canonical, aliases) in VOCABULARY {
        map.entry(nfkc_lower_trim(canonical)).or_insert(*canonical);
        for alias in *aliases {
            map.entry(nfkc_lower_trim(alias)).or_insert(*canonical);
        }
    }
    map
});

/// Separator-insensitive keys ("Node JS" / "node-js" / "nodejs").
static COMPACT_ALIAS_TO_CANONICAL: LazyLock<HashMap<String, &'static str>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();
        for (alias, canonical) in ALIAS_TO_CANONICAL.iter() {
            let compact = compact_key(alias);
            // single letters would collide with too much once separators are gone
            if compact.chars().count() > 1 {
                map.entry(compact).or_insert(*canonical);
            }
        }
        map
    });

/// Longest alias in words; bounds the n-gram window of the text scanner.
static MAX_ALIAS_WORDS: LazyLock<usize> = LazyLock::new(|| {
    ALIAS_TO_CANONICAL
        .keys()
        .map(|alias| alias.split_whitespace().count())
        .max()
        .unwrap_or(1)
});

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/'))
        .collect()
}

fn lookup_canonical(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        return None;
    }

    if let Some(canonical) = ALIAS_TO_CANONICAL.get(key) {
        return Some(canonical);
    }

    COMPACT_ALIAS_TO_CANONICAL.get(&compact_key(key)).copied()
}

/// How to combine weights when two raw skill names normalize to the same
/// canonical name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMergePolicy {
    /// Keep the larger weight. Independent of input order.
    #[default]
    Max,
    /// Add the weights together.
    Sum,
    /// The entry seen last in iteration order replaces earlier ones.
    LastWriteWins,
}

impl SkillMergePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "max" => Some(SkillMergePolicy::Max),
            "sum" => Some(SkillMergePolicy::Sum),
            "last_write_wins" | "last" => Some(SkillMergePolicy::LastWriteWins),
            _ => None,
        }
    }

    fn merge(self, existing: u32, incoming: u32) -> u32 {
        match self {
            SkillMergePolicy::Max => existing.max(incoming),
            SkillMergePolicy::Sum => existing.saturating_add(incoming),
            SkillMergePolicy::LastWriteWins => incoming,
        }
    }
}

/// Canonicalize one skill name.
///
/// Known skills come back in vocabulary casing; anything else is returned
/// exactly as given.
pub fn normalize_skill(skill: &str) -> String {
    match lookup_canonical(&nfkc_lower_trim(skill)) {
        Some(canonical) => canonical.to_string(),
        None => skill.to_string(),
    }
}

/// Build a fresh weight map keyed by canonical names. Blank keys are dropped.
pub fn normalize_skill_weights<I, K>(skills: I, policy: SkillMergePolicy) -> SkillWeightMap
where
    I: IntoIterator<Item = (K, u32)>,
    K: AsRef<str>,
{
    let mut normalized = SkillWeightMap::new();

    for (raw, weight) in skills {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            continue;
        }

        let canonical = normalize_skill(raw);
        match normalized.get_mut(&canonical) {
            Some(existing) => {
                let merged = policy.merge(*existing, weight);
                tracing::debug!(
                    skill = %canonical,
                    raw,
                    existing = *existing,
                    incoming = weight,
                    merged,
                    ?policy,
                    "skill name collision after normalization"
                );
                *existing = merged;
            }
            None => {
                normalized.insert(canonical, weight);
            }
        }
    }

    normalized
}

/// Normalize an unweighted skill set, dropping blanks.
pub fn normalize_skill_set<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .filter(|s| !s.as_ref().trim().is_empty())
        .map(|s| normalize_skill(s.as_ref()))
        .collect()
}

fn split_words(text: &str) -> Vec<String> {
    text.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| {
            c.is_whitespace()
                || matches!(
                    c,
                    ',' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '"' | '\'' | '!'
                        | '?' | '*' | '•' | '·'
                )
        })
        .map(|word| word.trim_end_matches('.').trim_start_matches('-'))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scan free text (a CV, a job description) for vocabulary skills.
///
/// Longer phrases win over their prefixes: "react native" yields
/// `React Native`, not `React`.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let words = split_words(text);
    let max_window = *MAX_ALIAS_WORDS;
    let mut found = BTreeSet::new();
    let mut idx = 0;

    while idx < words.len() {
        let mut consumed = 1;
        for window in (1..=max_window.min(words.len() - idx)).rev() {
            let phrase = words[idx..idx + window].join(" ");
            if window == 1 && TEXT_SCAN_EXCLUDED.contains(&phrase.as_str()) {
                continue;
            }
            if let Some(canonical) = ALIAS_TO_CANONICAL.get(&phrase) {
                found.insert(canonical.to_string());
                consumed = window;
                break;
            }
        }

        // slash-joined stacks such as "python/django"
        if consumed == 1
            && words[idx].contains('/')
            && !ALIAS_TO_CANONICAL.contains_key(&words[idx])
        {
            for segment in words[idx].split('/') {
                if TEXT_SCAN_EXCLUDED.contains(&segment) {
                    continue;
                }
                if let Some(canonical) = ALIAS_TO_CANONICAL.get(segment) {
                    found.insert(canonical.to_string());
                }
            }
        }

        idx += consumed;
    }

    found
}
