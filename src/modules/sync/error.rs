use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Relay unavailable: {0}")]
    RelayUnavailable(String),

    #[error("Malformed remote document: {0}")]
    MalformedRemoteDocument(String),

    #[error("Invalid sync key: {0}")]
    InvalidKey(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::RelayUnavailable(err.to_string())
    }
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        SyncError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
