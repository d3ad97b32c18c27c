use crate::config::{validate_settings, DEFAULT_TOP_DOMAINS};
use crate::core::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_READ_TIMEOUT};
use crate::core::extractor::DEFAULT_DOMAIN_PATTERN;
use crate::core::orchestrator::DEFAULT_WORKERS;
use crate::core::params::{DEFAULT_MAX_PASSAGES, DEFAULT_REGION, DEFAULT_SORT_BY};
use crate::core::retry::{DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS};
use crate::core::ConfigProvider;
use crate::utils::error::{RankError, Result};
use crate::utils::validation::{validate_delimiter, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub search: Option<SearchConfig>,
    pub runtime: Option<RuntimeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub key: String,
    pub folder_id: String,
    pub endpoint: Option<String>,
    pub connect_timeout_seconds: Option<u64>,
    pub read_timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub domains: String,
    pub queries: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub region: Option<u32>,
    pub top_domains: Option<usize>,
    pub mode: Option<String>,
    pub groups_on_page: Option<u32>,
    pub docs_in_group: Option<u32>,
    pub sort_by: Option<String>,
    pub max_passages: Option<u32>,
    pub domain_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub workers: Option<usize>,
    pub log_format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RankError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RankError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_settings(self, "")?;

        if self.api.key.contains("${") {
            return Err(RankError::MissingConfigError {
                field: format!("api.key (environment variable in '{}' is not set)", self.api.key),
            });
        }

        if let Some(delimiter) = &self.output.delimiter {
            let mut chars = delimiter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    validate_delimiter("output.delimiter", c)?;
                }
                _ => {
                    return Err(RankError::InvalidConfigValueError {
                        field: "output.delimiter".to_string(),
                        value: delimiter.clone(),
                        reason: "Delimiter must be exactly one character".to_string(),
                    })
                }
            }
        }

        if let Some(format) = self.log_format() {
            if format != "compact" && format != "json" {
                return Err(RankError::InvalidConfigValueError {
                    field: "runtime.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn log_format(&self) -> Option<&str> {
        self.runtime.as_ref().and_then(|r| r.log_format.as_deref())
    }

    fn search(&self) -> Option<&SearchConfig> {
        self.search.as_ref()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_key(&self) -> &str {
        &self.api.key
    }

    fn folder_id(&self) -> &str {
        &self.api.folder_id
    }

    fn endpoint(&self) -> &str {
        self.api.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn domains_path(&self) -> &str {
        &self.input.domains
    }

    fn queries_path(&self) -> &str {
        &self.input.queries
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn region(&self) -> u32 {
        self.search().and_then(|s| s.region).unwrap_or(DEFAULT_REGION)
    }

    fn top_domains(&self) -> usize {
        self.search()
            .and_then(|s| s.top_domains)
            .unwrap_or(DEFAULT_TOP_DOMAINS)
    }

    fn workers(&self) -> usize {
        self.runtime
            .as_ref()
            .and_then(|r| r.workers)
            .unwrap_or(DEFAULT_WORKERS)
    }

    fn grouping_mode(&self) -> &str {
        self.search()
            .and_then(|s| s.mode.as_deref())
            .unwrap_or("deep")
    }

    fn groups_on_page(&self) -> Option<u32> {
        self.search().and_then(|s| s.groups_on_page)
    }

    fn docs_in_group(&self) -> Option<u32> {
        self.search().and_then(|s| s.docs_in_group)
    }

    fn sort_by(&self) -> &str {
        self.search()
            .and_then(|s| s.sort_by.as_deref())
            .unwrap_or(DEFAULT_SORT_BY)
    }

    fn max_passages(&self) -> u32 {
        self.search()
            .and_then(|s| s.max_passages)
            .unwrap_or(DEFAULT_MAX_PASSAGES)
    }

    fn connect_timeout(&self) -> Duration {
        self.api
            .connect_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    fn read_timeout(&self) -> Duration {
        self.api
            .read_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_READ_TIMEOUT)
    }

    fn retry_attempts(&self) -> u32 {
        self.api.retry_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    fn retry_delay(&self) -> Duration {
        self.api
            .retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DELAY)
    }

    fn domain_pattern(&self) -> &str {
        self.search()
            .and_then(|s| s.domain_pattern.as_deref())
            .unwrap_or(DEFAULT_DOMAIN_PATTERN)
    }

    fn delimiter(&self) -> u8 {
        self.output
            .delimiter
            .as_deref()
            .and_then(|d| d.chars().next())
            .filter(char::is_ascii)
            .map(|c| c as u8)
            .unwrap_or(b',')
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
