use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlocklistError {
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Session error: {message}")]
    SessionError { message: String },

    #[cfg(feature = "browser")]
    #[error("Headless browser error: {message}")]
    BrowserError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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
    Network,
    Parse,
    Io,
    Config,
}

/// 嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,   // 下次排程即為重試
            ErrorSeverity::High => 1,     // 需要人工調整
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl BlocklistError {
    pub fn parse(message: impl Into<String>) -> Self {
        BlocklistError::ParseError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        BlocklistError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BlocklistError::NetworkError(_)
            | BlocklistError::HttpStatusError { .. }
            | BlocklistError::SessionError { .. } => ErrorCategory::Network,
            #[cfg(feature = "browser")]
            BlocklistError::BrowserError { .. } => ErrorCategory::Network,
            BlocklistError::ParseError { .. } | BlocklistError::SerializationError(_) => {
                ErrorCategory::Parse
            }
            BlocklistError::IoError(_) => ErrorCategory::Io,
            BlocklistError::ConfigError { .. }
            | BlocklistError::ConfigValidationError { .. }
            | BlocklistError::InvalidConfigValueError { .. }
            | BlocklistError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parse | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BlocklistError::HttpStatusError { status, .. } if *status == 401 || *status == 403 => {
                "The session token was rejected; drop --session-token or refresh it"
            }
            BlocklistError::SessionError { .. } => {
                "Pass --session-token explicitly or build with the `browser` feature"
            }
            _ => match self.category() {
                ErrorCategory::Network => {
                    "Check network connectivity; the next scheduled run will retry"
                }
                ErrorCategory::Parse => {
                    "The source website layout may have changed; inspect the page and update the extractor"
                }
                ErrorCategory::Io => "Check that the output directory exists and is writable",
                ErrorCategory::Config => "Review the command line flags or the TOML configuration",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the scam listing: {}", self),
            ErrorCategory::Parse => format!("Could not read the scam listing: {}", self),
            ErrorCategory::Io => format!("Could not write the blocklists: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlocklistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_exit_code() {
        let err = BlocklistError::parse("empty page");
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert_eq!(err.severity().exit_code(), 1);

        let err = BlocklistError::HttpStatusError {
            url: "https://example.com".to_string(),
            status: 500,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity().exit_code(), 2);

        let err = BlocklistError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_user_friendly_message_mentions_cause() {
        let err = BlocklistError::parse("no items array");
        assert!(err.user_friendly_message().contains("no items array"));
    }
}
