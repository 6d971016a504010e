// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "ARXIV_WATCH";
/// One century; anything larger is a typo rather than a recency window.
pub const MAX_DAYS_BACK: u32 = 36_500;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub verbose: bool,
    pub search: SearchConfig,
    pub source: SourceConfig,
    pub llm: LlmConfig,
    pub cache: CacheConfig,
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub topics: Vec<String>,
    pub max_results: usize,
    pub days_back: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub request_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    pub path: PathBuf,
}

/// Every field is optional so a partially configured mail section
/// disables notification instead of failing the load.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub recipient: Option<String>,
    pub starttls: Option<bool>,
}

/// Complete SMTP settings, only obtainable from a fully populated [`EmailConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub recipient: String,
    pub starttls: bool,
}

impl EmailConfig {
    pub fn settings(&self) -> Option<SmtpSettings> {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let host = non_empty(&self.smtp_host)?;
        let username = non_empty(&self.username)?;
        let password = non_empty(&self.password)?;
        let recipient = non_empty(&self.recipient)?;
        let from = non_empty(&self.from).unwrap_or_else(|| username.clone());
        let starttls = self.starttls.unwrap_or(false);
        let port = self
            .smtp_port
            .unwrap_or(if starttls { 587 } else { 465 });

        Some(SmtpSettings {
            host,
            port,
            username,
            password,
            from,
            recipient,
            starttls,
        })
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default_config();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        let builder = config::Config::builder()
            .set_default("verbose", defaults.verbose)
            .and_then(|b| b.set_default("search.topics", defaults.search.topics.clone()))
            .and_then(|b| b.set_default("search.max_results", defaults.search.max_results as i64))
            .and_then(|b| b.set_default("search.days_back", defaults.search.days_back as i64))
            .and_then(|b| b.set_default("source.endpoint", defaults.source.endpoint.clone()))
            .and_then(|b| b.set_default("source.timeout_secs", defaults.source.timeout_secs as i64))
            .and_then(|b| {
                b.set_default(
                    "source.request_delay_secs",
                    defaults.source.request_delay_secs as i64,
                )
            })
            .and_then(|b| b.set_default("llm.endpoint", defaults.llm.endpoint.clone()))
            .and_then(|b| b.set_default("llm.model", defaults.llm.model.clone()))
            .and_then(|b| b.set_default("llm.temperature", f64::from(defaults.llm.temperature)))
            .and_then(|b| b.set_default("llm.timeout_secs", defaults.llm.timeout_secs as i64))
            .and_then(|b| {
                b.set_default("cache.path", defaults.cache.path.display().to_string())
            })
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let settings = builder
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("search.topics")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            verbose: false,
            search: SearchConfig {
                topics: vec![
                    "unstructured data analysis".to_string(),
                    "querying unstructured data".to_string(),
                    "semi structured data".to_string(),
                    "text to table".to_string(),
                    "text to relational schema".to_string(),
                ],
                max_results: 10,
                days_back: 7,
            },
            source: SourceConfig {
                endpoint: "http://export.arxiv.org/api/query".to_string(),
                timeout_secs: 15,
                request_delay_secs: 3,
            },
            llm: LlmConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: "gemma2:2b".to_string(),
                temperature: 0.0,
                timeout_secs: 120,
            },
            cache: CacheConfig {
                path: PathBuf::from("seen_papers.txt"),
            },
            email: None,
        }
    }

    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        self.email.as_ref().and_then(EmailConfig::settings)
    }

    /// Effective configuration as pretty JSON with the SMTP password masked.
    pub fn to_redacted_json(&self) -> Result<String> {
        let mut redacted = self.clone();
        if let Some(email) = redacted.email.as_mut()
            && email.password.is_some()
        {
            email.password = Some("********".to_string());
        }

        serde_json::to_string_pretty(&redacted)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_topics(&self.search.topics)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.search.max_results == 0 {
            return Err(PipelineError::Config(
                "max_results must be greater than 0".to_string(),
            ));
        }

        if self.search.days_back == 0 {
            return Err(PipelineError::Config(
                "days_back must be greater than 0".to_string(),
            ));
        }

        if self.search.days_back > MAX_DAYS_BACK {
            return Err(PipelineError::Config(format!(
                "days_back must be at most {} (got {})",
                MAX_DAYS_BACK, self.search.days_back
            )));
        }

        Validator::validate_url(&self.source.endpoint)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Validator::validate_url(&self.llm.endpoint)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.llm.model.trim().is_empty() {
            return Err(PipelineError::Config("llm.model must be set".to_string()));
        }

        Ok(())
    }
}
