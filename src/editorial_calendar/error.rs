use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error("Source responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed reading response body: {0}")]
    Body(#[from] reqwest::Error),

    #[error("Failed reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected payload shape: {0}")]
    Shape(String),
}

impl CalendarError {
    /// Coarse failure class, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            CalendarError::Request { .. }
            | CalendarError::Status(_)
            | CalendarError::Body(_)
            | CalendarError::Io { .. }
            | CalendarError::Timeout(_) => "fetch",
            CalendarError::Parse(_) => "parse",
            CalendarError::Shape(_) => "shape",
        }
    }
}
