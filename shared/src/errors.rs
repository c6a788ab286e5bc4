//! Shared error types for the review labeler

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid reviewer name: '{name}'")]
    InvalidReviewer { name: String },

    #[error("Unknown reviewer: {name}")]
    UnknownReviewer { name: String },

    #[error("Unknown dataset: {name}")]
    UnknownDataset { name: String },

    #[error("Invalid decision '{value}', expected Keep or Pass")]
    InvalidDecision { value: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
