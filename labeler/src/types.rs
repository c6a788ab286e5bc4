//! Type definitions for the labeler
//!
//! Identifiers, store options and the JSON shapes exchanged with the browser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LabelerError;

/// Identifier of one reviewing session (one browser tab)
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = LabelerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| LabelerError::SessionNotFound {
                session_id: s.to_string(),
            })
    }
}

/// How an upload treats an existing blob of the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Overwrite,
    CreateNew,
}

/// Lifecycle of a review session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Active,
    Exhausted,
}

/// Storage backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    Local,
    Memory,
    Dropbox,
    Gdrive,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Dropbox => write!(f, "dropbox"),
            BackendKind::Gdrive => write!(f, "gdrive"),
        }
    }
}

/// One displayed cell of the current row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub column: String,
    pub value: String,
}

/// A failure shown to the reviewer without aborting the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: String,
    pub message: String,
}

impl From<&LabelerError> for Notice {
    fn from(err: &LabelerError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Everything the page needs to render one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub dataset: Option<String>,
    pub reviewer: Option<String>,
    pub phase: SessionPhase,
    pub cursor: usize,
    pub total_rows: usize,
    pub row: Option<Vec<CellView>>,
    pub responses: usize,
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

/// Body of `POST /api/sessions`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    pub dataset: Option<String>,
    pub reviewer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectDatasetRequest {
    pub dataset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectReviewerRequest {
    pub reviewer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub decision: String,
}

/// Selectable values offered by the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsView {
    pub reviewers: Vec<String>,
    pub datasets: Vec<String>,
    pub decisions: Vec<String>,
}
