use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Endpoint '{endpoint}' answered HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("Malformed payload from '{endpoint}': {reason}")]
    Malformed { endpoint: &'static str, reason: String },

    #[error("Invalid date bounds: min {min} is after max {max}")]
    InvalidDateBounds { min: String, max: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashError {
    pub fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed { endpoint, reason: reason.into() }
    }
}

pub type DashResult<T> = Result<T, DashError>;
