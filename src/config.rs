use config::{Config, Environment, File};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::interview::CandidateField;

pub const APP_TITLE: &str = "TalentScout Hiring Assistant";

/// Stem of the optional config file looked up in the working directory
/// (`talentscout.toml`, `talentscout.json`, ...).
const CONFIG_FILE_STEM: &str = "talentscout";
const ENV_PREFIX: &str = "TALENTSCOUT";

const DEFAULT_MODEL: &str = "llama2";
const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_HEALTH_URL: &str = "http://localhost:11434/api/tags";

pub const DEFAULT_EXIT_KEYWORDS: &[&str] = &["goodbye", "exit", "quit", "end", "stop", "bye", "finish"];

pub const DEFAULT_FALLBACK_QUESTIONS: &[&str] = &[
    "Can you explain the difference between synchronous and asynchronous programming?",
    "What is your experience with version control systems like Git?",
    "How do you handle debugging and troubleshooting in your preferred programming language?",
    "Can you describe a challenging project you've worked on and how you overcame obstacles?",
    "What's your approach to writing clean, maintainable code?",
    "How do you stay updated with the latest technologies and best practices?",
    "Can you explain the concept of RESTful APIs and when you would use them?",
    "What's your experience with testing methodologies (unit testing, integration testing)?",
];

pub const DEFAULT_TECH_KEYWORDS: &[&str] = &[
    // Programming languages
    "python", "javascript", "java", "c++", "c#", "php", "ruby", "go", "rust", "swift", "kotlin", "scala",
    // Frontend frameworks
    "react", "angular", "vue", "svelte", "next.js", "nuxt.js",
    // Backend frameworks
    "django", "flask", "spring", "node.js", "express", "fastapi", "laravel", "rails",
    // Databases
    "mysql", "postgresql", "mongodb", "redis", "sqlite", "oracle", "sql server",
    // Cloud platforms
    "aws", "azure", "gcp", "heroku", "digitalocean",
    // DevOps & tools
    "docker", "kubernetes", "jenkins", "git", "github", "gitlab", "jira", "confluence",
    // Methodologies
    "agile", "scrum", "kanban", "waterfall",
    // Other
    "html", "css", "sass", "less", "typescript", "webpack", "babel",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Text-generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BackendConfig {
    #[validate(length(min = 1, message = "model must not be empty"))]
    pub model: String,
    /// OpenAI-compatible base; chat completions live at `<base_url>/chat/completions`.
    #[validate(url)]
    pub base_url: String,
    /// Model listing endpoint probed once at startup.
    #[validate(url)]
    pub health_url: String,
    #[validate(range(min = 1, max = 60))]
    pub health_timeout_secs: u64,
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens: u32,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f64,
    #[validate(range(min = 1, max = 8192))]
    pub question_max_tokens: u32,
    #[validate(range(min = 0.0, max = 2.0))]
    pub question_temperature: f64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: option_env!("TALENTSCOUT_MODEL").unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: option_env!("TALENTSCOUT_BASE_URL").unwrap_or(DEFAULT_BASE_URL).to_string(),
            health_url: option_env!("TALENTSCOUT_HEALTH_URL").unwrap_or(DEFAULT_HEALTH_URL).to_string(),
            health_timeout_secs: 5,
            max_tokens: 500,
            temperature: 0.7,
            question_max_tokens: 500,
            question_temperature: 0.7,
        }
    }
}

/// Screening policy: which fields are mandatory, which words end the
/// conversation, what to ask when generation fails, and which technologies
/// are recognised.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScreeningConfig {
    #[validate(length(min = 1))]
    pub required_fields: Vec<CandidateField>,
    #[validate(length(min = 1))]
    pub exit_keywords: Vec<String>,
    #[validate(length(min = 1, message = "fallback question list must not be empty"))]
    pub fallback_questions: Vec<String>,
    #[validate(length(min = 1))]
    pub tech_keywords: Vec<String>,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            required_fields: CandidateField::ALL.to_vec(),
            exit_keywords: to_owned_list(DEFAULT_EXIT_KEYWORDS),
            fallback_questions: to_owned_list(DEFAULT_FALLBACK_QUESTIONS),
            tech_keywords: to_owned_list(DEFAULT_TECH_KEYWORDS),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub screening: ScreeningConfig,
}

impl AppConfig {
    /// Loads defaults, then `talentscout.*` from the working directory, then
    /// `TALENTSCOUT__SECTION__KEY` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        // Don't fail if .env doesn't exist
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE_STEM).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.ensure_valid()?;

        info!("Loaded configuration: model={} base_url={}", config.backend.model, config.backend.base_url);
        debug!("Screening config: {} required fields, {} tech keywords",
            config.screening.required_fields.len(), config.screening.tech_keywords.len());

        Ok(config)
    }

    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.screening.validate()?;
        Ok(())
    }

    pub fn info(&self) -> ConfigInfo {
        ConfigInfo {
            model: self.backend.model.clone(),
            base_url: self.backend.base_url.clone(),
            max_tokens: self.backend.max_tokens,
            temperature: self.backend.temperature,
            tech_keywords_count: self.screening.tech_keywords.len(),
            required_fields: self.screening.required_fields.clone(),
            fallback_questions_count: self.screening.fallback_questions.len(),
        }
    }
}

/// Display summary of the active configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub tech_keywords_count: usize,
    pub required_fields: Vec<CandidateField>,
    pub fallback_questions_count: usize,
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
