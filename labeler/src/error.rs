//! Labeler-specific error types

use thiserror::Error;
use shared::SharedError;

#[derive(Error, Debug)]
pub enum LabelerError {
    #[error("Dataset '{name}' is not available in the remote store or locally")]
    SourceUnavailable { name: String },

    #[error("The column '{column}' was not found in '{dataset}'")]
    SchemaInvalid {
        dataset: String,
        column: String,
        columns: Vec<String>,
    },

    #[error("Dataset '{name}' could not be parsed: {message}")]
    DatasetMalformed { name: String, message: String },

    #[error("{backend} authentication error: {message}")]
    BackendAuthFailure { backend: String, message: String },

    #[error("{backend} request failed: {message}")]
    BackendTransportFailure { backend: String, message: String },

    #[error("Blob already exists: {name}")]
    BackendConflict { name: String },

    #[error("Invalid blob name: {name}")]
    InvalidBlobName { name: String },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl LabelerError {
    pub fn auth(backend: &str, message: impl Into<String>) -> Self {
        Self::BackendAuthFailure {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    pub fn transport(backend: &str, message: impl Into<String>) -> Self {
        Self::BackendTransportFailure {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::SchemaInvalid { .. } => "schema_invalid",
            Self::DatasetMalformed { .. } => "dataset_malformed",
            Self::BackendAuthFailure { .. } => "backend_auth_failure",
            Self::BackendTransportFailure { .. } => "backend_transport_failure",
            Self::BackendConflict { .. } => "backend_conflict",
            Self::InvalidBlobName { .. } => "invalid_blob_name",
            Self::SessionNotFound { .. } => "session_not_found",
            Self::Configuration { .. } => "configuration",
            Self::Shared(SharedError::UnknownReviewer { .. }) => "unknown_reviewer",
            Self::Shared(SharedError::UnknownDataset { .. }) => "unknown_dataset",
            Self::Shared(SharedError::InvalidDecision { .. }) => "invalid_decision",
            Self::Shared(_) => "invalid_input",
            Self::IoError(_) => "io",
            Self::JsonError(_) => "json",
            Self::CsvError(_) => "csv",
        }
    }
}

pub type LabelerResult<T> = Result<T, LabelerError>;
