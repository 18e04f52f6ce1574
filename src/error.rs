use thiserror::Error;

use crate::config::Region;

/// Custom error types for better error handling
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to open URL: {url} (status {status})")]
    Status { url: String, status: u16 },
    #[error("No version label for the {0} server found on {1}")]
    VersionNotFound(Region, String),
    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
    #[error("Invalid label pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write report: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
