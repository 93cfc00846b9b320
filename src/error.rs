use serde_json::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Search API returned status {0}")]
    Status(u16),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),

    #[error("No API key configured; set PEXELS_API_KEY or api_key in config/local")]
    MissingApiKey,
}

// surf::Error does not implement std::error::Error, so #[from] can't be used.
impl From<surf::Error> for AppError {
    fn from(err: surf::Error) -> Self {
        AppError::Http(err.to_string())
    }
}
