//! Error types for the indexer admin dashboard

/// Errors that can occur while talking to the indexer or serving the dashboard
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request to {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for indexer admin operations
pub type Result<T> = std::result::Result<T, AdminError>;
