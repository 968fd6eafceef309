use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkshopError {
    #[error("Resource not found: {url} ({status})")]
    NotFound { status: StatusCode, url: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WorkshopError {
    /// 取得 HTTP 狀態碼（僅限遠端回應錯誤）
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WorkshopError::NotFound { status, .. } | WorkshopError::HttpStatus { status, .. } => {
                Some(*status)
            }
            WorkshopError::ApiError(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkshopError::NotFound { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            WorkshopError::NotFound { .. } => ErrorCategory::NotFound,
            WorkshopError::HttpStatus { .. } | WorkshopError::ApiError(_) => {
                ErrorCategory::Network
            }
            WorkshopError::SerializationError(_) => ErrorCategory::Data,
            WorkshopError::ConfigError { .. }
            | WorkshopError::ConfigValidationError { .. }
            | WorkshopError::InvalidConfigValueError { .. }
            | WorkshopError::MissingConfigError { .. } => ErrorCategory::Configuration,
            WorkshopError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::NotFound => "Check the requested identifier exists on the remote API",
            ErrorCategory::Network => "Check network connectivity and the configured base URL",
            ErrorCategory::Data => "The remote payload did not match the expected shape",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WorkshopError::NotFound { url, .. } => format!("Nothing found at {}", url),
            WorkshopError::HttpStatus { status, .. } => {
                format!("The remote API answered with {}", status)
            }
            WorkshopError::ApiError(e) if e.is_timeout() => "The request timed out".to_string(),
            WorkshopError::ApiError(_) => "Could not reach the remote API".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkshopError>;
