use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Transient transport error: {message}")]
    TransientTransport { message: String },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("HTTP status {status} returned by {url}")]
    HttpStatus { status: u16, url: String },

    #[error(
        "No domains on page {page} for query '{query}' ({collected} of {requested} collected)"
    )]
    PrematureExhaustion {
        query: String,
        page: u32,
        collected: usize,
        requested: usize,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Worker task failed: {message}")]
    TaskFailed { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid extraction pattern: {0}")]
    PatternError(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RankError {
    /// Only transport-level failures are worth another attempt. A status
    /// response means the server answered, so repeating the call will not help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientTransport { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration { .. }
            | Self::InvalidRequest { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::PatternError(_) => ErrorCategory::Configuration,
            Self::TransientTransport { .. } => ErrorCategory::Network,
            Self::RequestFailed { .. }
            | Self::HttpStatus { .. }
            | Self::PrematureExhaustion { .. } => ErrorCategory::Upstream,
            Self::IoError(_) | Self::CsvError(_) => ErrorCategory::Io,
            Self::TaskFailed { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Upstream | ErrorCategory::Io => {
                ErrorSeverity::High
            }
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidConfiguration { .. } => {
                "Use 'deep' or 'flat' as the grouping mode".to_string()
            }
            Self::InvalidRequest { .. } => "Request at least one top domain".to_string(),
            Self::TransientTransport { .. } => {
                "Check network connectivity and try again later".to_string()
            }
            Self::RequestFailed { .. } => {
                "Check the endpoint URL and that it does not redirect in a loop".to_string()
            }
            Self::HttpStatus { status: 401 | 403, .. } => {
                "Check the API key and folder id".to_string()
            }
            Self::HttpStatus { status: 429, .. } => {
                "The search API is rate limiting requests, lower --workers".to_string()
            }
            Self::HttpStatus { .. } => "Check the search endpoint and its parameters".to_string(),
            Self::PrematureExhaustion { .. } => {
                "Lower --top-domains or use a broader query".to_string()
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration and rerun".to_string(),
            Self::PatternError(_) => "Fix the domain extraction regex".to_string(),
            Self::IoError(_) | Self::CsvError(_) => {
                "Check that input files exist and the output location is writable".to_string()
            }
            Self::TaskFailed { .. } => "This is a bug, please report it".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Upstream => format!("Search API problem: {}", self),
            ErrorCategory::Io => format!("File problem: {}", self),
            ErrorCategory::Internal => format!("Internal error: {}", self),
        }
    }
}

// Request URLs carry the API key in their query string, so only the
// origin and path are kept.
impl From<reqwest::Error> for RankError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| format!("{}{}", u.origin().ascii_serialization(), u.path()))
            .unwrap_or_default();
        let err = err.without_url();
        if let Some(status) = err.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
                url,
            };
        }
        // Builder, redirect and decode failures repeat identically on retry.
        if err.is_connect() || err.is_timeout() || err.is_body() || err.is_request() {
            Self::TransientTransport {
                message: err.to_string(),
            }
        } else {
            Self::RequestFailed {
                message: err.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
