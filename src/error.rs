use thiserror::Error;

#[derive(Debug, Error)]
pub enum YgoError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error ({status}): {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown additional info kind: {0}")]
    UnknownKind(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout: operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimit,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl YgoError {
    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Network(_) | Self::Timeout(_) => Some(
                "Check your internet connection, or run with --offline to use the local database."
                    .to_string(),
            ),
            Self::RateLimit => Some("The wiki is throttling requests. Please wait a moment.".to_string()),
            Self::NotFound(_) => Some("Card names are case sensitive. Run 'ygodb list' to see known cards.".to_string()),
            Self::Database(_) => Some(
                "Check the database path with: ygodb config get database.path".to_string(),
            ),
            _ => None,
        }
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::ServerError(_) | Self::RateLimit
        )
    }
}

pub type Result<T> = std::result::Result<T, YgoError>;
