//! Per-reviewer artifacts
//!
//! Each reviewer owns two blobs in the remote store:
//! - `{reviewer}_responses.csv`: every judgment as `Id,Response,User`
//! - `{reviewer}_state.json`: `{"row_index": n, "responses": [[id, decision, reviewer], ...]}`
//!
//! Both are rewritten in full on every save.

use serde::Serialize;
use std::sync::Arc;

use shared::{Judgment, ResumeState, ReviewerId};
use crate::error::{LabelerError, LabelerResult};
use crate::traits::RemoteStore;
use crate::types::WriteMode;

const RESPONSES_HEADER: [&str; 3] = ["Id", "Response", "User"];

/// Borrowed mirror of [`ResumeState`] so saving never clones the judgments
#[derive(Serialize)]
struct StateRef<'a> {
    row_index: usize,
    responses: &'a [Judgment],
}

pub fn responses_blob(reviewer: &ReviewerId) -> String {
    format!("{}_responses.csv", reviewer)
}

pub fn state_blob(reviewer: &ReviewerId) -> String {
    format!("{}_state.json", reviewer)
}

/// Render judgments as the responses table
pub fn responses_csv(judgments: &[Judgment]) -> LabelerResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(RESPONSES_HEADER)?;
    for judgment in judgments {
        writer.write_record([
            judgment.row_id.as_str(),
            judgment.decision.as_str(),
            judgment.reviewer.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| LabelerError::IoError(e.into_error()))
}

/// Render the resume state document
pub fn state_json(cursor: usize, judgments: &[Judgment]) -> LabelerResult<Vec<u8>> {
    let state = StateRef {
        row_index: cursor,
        responses: judgments,
    };
    Ok(serde_json::to_vec(&state)?)
}

/// Reads and writes reviewer artifacts through the remote store
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn RemoteStore>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn save_responses(&self, reviewer: &ReviewerId, judgments: &[Judgment]) -> LabelerResult<()> {
        let name = responses_blob(reviewer);
        let bytes = responses_csv(judgments)?;
        self.store.upload(&name, bytes, WriteMode::Overwrite).await?;
        tracing::debug!("💾 Saved {} ({} responses)", name, judgments.len());
        Ok(())
    }

    pub async fn save_state(&self, reviewer: &ReviewerId, cursor: usize, judgments: &[Judgment]) -> LabelerResult<()> {
        let name = state_blob(reviewer);
        let bytes = state_json(cursor, judgments)?;
        self.store.upload(&name, bytes, WriteMode::Overwrite).await?;
        tracing::debug!("💾 Saved {} (row_index {})", name, cursor);
        Ok(())
    }

    /// Load a reviewer's progress; a reviewer with no saved state, or an
    /// empty state blob left by an interrupted upload, starts at zero
    pub async fn load_state(&self, reviewer: &ReviewerId) -> LabelerResult<ResumeState> {
        let name = state_blob(reviewer);
        match self.store.download(&name).await? {
            Some(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                tracing::warn!("⚠️ {} is empty, starting from the first row", name);
                Ok(ResumeState::default())
            }
            Some(bytes) => {
                let state: ResumeState = serde_json::from_slice(&bytes)?;
                tracing::debug!("📂 Loaded {} (row_index {})", name, state.row_index);
                Ok(state)
            }
            None => {
                tracing::debug!("📂 No saved state for {}", reviewer);
                Ok(ResumeState::default())
            }
        }
    }
}
