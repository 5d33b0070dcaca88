use thiserror::Error;

pub const TIMEOUT_MESSAGE: &str = "Request timeout - please check your connection";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response. Never retried.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Failed to decode response body: {message}")]
    Decode { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Http,
    Transport,
    Data,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport-level failures share one retry budget. Everything the
    /// server or the caller produced is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Network { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Http { .. } => ErrorCategory::Http,
            ApiError::Timeout | ApiError::Network { .. } | ApiError::Io(_) => {
                ErrorCategory::Transport
            }
            ApiError::Decode { .. } | ApiError::Serialization(_) => ErrorCategory::Data,
            ApiError::ConfigValidation { .. } | ApiError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            ApiError::InvalidRequest { .. } | ApiError::Validation { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ApiError::Validation { .. } => ErrorSeverity::Low,
            ApiError::Timeout | ApiError::Network { .. } => ErrorSeverity::Medium,
            ApiError::Http { .. }
            | ApiError::Decode { .. }
            | ApiError::InvalidRequest { .. }
            | ApiError::Serialization(_) => ErrorSeverity::High,
            ApiError::Io(_)
            | ApiError::ConfigValidation { .. }
            | ApiError::InvalidConfigValue { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ApiError::Http { status: 401, .. } | ApiError::Http { status: 403, .. } => {
                format!("You are not allowed to do that ({})", self)
            }
            ApiError::Http { status: 404, .. } => format!("Not found: {}", self),
            ApiError::Http { status, message } if *status >= 500 => {
                format!("The server failed to handle the request: {}", message)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Http => match self.status() {
                Some(401) | Some(403) => "Sign in again or ask a teacher for access to this course",
                Some(404) => "Check that the id exists; it may have been deleted",
                Some(s) if s >= 500 => "Check the backend logs; the request may succeed later",
                _ => "Check the request payload against what the backend expects",
            },
            ErrorCategory::Transport => {
                "Make sure the backend is running and reachable at the configured base URL"
            }
            ErrorCategory::Data => "The backend answered with an unexpected payload shape",
            ErrorCategory::Configuration => {
                "Fix the configuration value (CLI flag, environment variable or config file)"
            }
            ErrorCategory::Input => "Correct the highlighted input and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
