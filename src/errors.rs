//! Error types for the backup run
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    /// the configuration is missing, malformed or was never edited
    #[error("configuration error: {0}")]
    Config(String),

    /// the export-start endpoint answered with something other than 200
    #[error("backup request to {url} was rejected ({status}): {body}")]
    StartRejected {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// a response was missing a field we rely on
    #[error("unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    /// an http transport error
    #[error("http error {0}")]
    Http(#[from] reqwest::Error),

    /// a json decoding error
    #[error("json error {0}")]
    Json(#[from] serde_json::Error),

    /// a filesystem error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),

    /// an object storage error
    #[error("object storage error: {0}")]
    ObjectStore(String),
}

pub type Result<T> = std::result::Result<T, BackupError>;
