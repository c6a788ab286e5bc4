//! Review service
//!
//! Operations behind every user action. Each one takes the session it acts
//! on explicitly and returns typed errors so the caller decides how to show
//! them.

use std::path::PathBuf;
use std::sync::Arc;

use shared::{session_debug, session_info, session_warn, Decision, Roster};
use crate::core::dataset::DatasetLoader;
use crate::core::persistence::{self, PersistenceAdapter};
use crate::core::session::{DecisionOutcome, ReviewSession};
use crate::error::{LabelerError, LabelerResult};
use crate::traits::RemoteStore;
use crate::types::SessionId;

/// What happened when a decision was recorded
#[derive(Debug)]
pub struct RecordReport {
    pub outcome: DecisionOutcome,
    /// Save failures, in the order the saves were attempted
    pub failures: Vec<LabelerError>,
}

impl RecordReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone)]
pub struct ReviewService {
    roster: Roster,
    loader: DatasetLoader,
    persistence: PersistenceAdapter,
}

impl ReviewService {
    pub fn new(store: Arc<dyn RemoteStore>, roster: Roster, local_dir: Option<PathBuf>) -> Self {
        Self {
            roster,
            loader: DatasetLoader::new(store.clone(), local_dir),
            persistence: PersistenceAdapter::new(store),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn backend_name(&self) -> &'static str {
        self.persistence.backend_name()
    }

    /// Start a session on `dataset` (the roster's first dataset when absent),
    /// optionally selecting a reviewer straight away.
    pub async fn open_session(&self, dataset: Option<&str>, reviewer: Option<&str>) -> LabelerResult<ReviewSession> {
        let mut session = ReviewSession::new(SessionId::new());
        let dataset = dataset.unwrap_or_else(|| self.roster.default_dataset());
        self.select_dataset(&mut session, dataset).await?;
        if let Some(reviewer) = reviewer {
            self.select_reviewer(&mut session, reviewer).await?;
        }
        session_info!(session.id(), "📋 Session opened on {}", dataset);
        Ok(session)
    }

    /// Load `name` into the session. On failure the session keeps the
    /// selection but has no rows until a dataset loads.
    pub async fn select_dataset(&self, session: &mut ReviewSession, name: &str) -> LabelerResult<()> {
        let name = self.roster.dataset(name)?.to_string();
        match self.loader.load(&name).await {
            Ok(dataset) => {
                session_debug!(session.id(), "📄 Dataset {} has {} rows", name, dataset.len());
                session.set_dataset(name, Some(Arc::new(dataset)));
                Ok(())
            }
            Err(e) => {
                session_warn!(session.id(), "⚠️ Dataset {} unavailable: {}", name, e);
                session.set_dataset(name, None);
                Err(e)
            }
        }
    }

    /// Switch to `name`, resuming from their saved state.
    ///
    /// Reselecting the active reviewer changes nothing. Any other switch
    /// drops the in-memory progress first; if the saved state cannot be
    /// read the session is left without a reviewer.
    pub async fn select_reviewer(&self, session: &mut ReviewSession, name: &str) -> LabelerResult<()> {
        let reviewer = self.roster.reviewer(name)?;
        if session.reviewer() == Some(&reviewer) {
            return Ok(());
        }

        session.clear_reviewer();
        let state = self.persistence.load_state(&reviewer).await.map_err(|e| {
            session_warn!(session.id(), "⚠️ Could not load state for {}: {}", reviewer, e);
            e
        })?;

        session_info!(
            session.id(),
            "👤 Reviewer {} resumes at row {} ({} responses)",
            reviewer,
            state.row_index,
            state.responses.len()
        );
        session.begin_review(reviewer, state);
        Ok(())
    }

    /// Apply `decision` and persist both artifacts.
    ///
    /// The responses table is saved before the resume state. A failed save
    /// does not stop the next one and never rolls back the judgment.
    pub async fn record(&self, session: &mut ReviewSession, decision: Decision) -> RecordReport {
        let outcome = session.apply_decision(decision);
        let mut failures = Vec::new();

        let DecisionOutcome::Recorded(judgment) = outcome.clone() else {
            session_debug!(session.id(), "Decision {} ignored: {:?}", decision, outcome);
            return RecordReport { outcome, failures };
        };
        session_debug!(session.id(), "✏️ {} -> {}", judgment.row_id, judgment.decision);

        let reviewer = judgment.reviewer.clone();
        if let Err(e) = self.persistence.save_responses(&reviewer, session.judgments()).await {
            session_warn!(session.id(), "⚠️ Saving responses failed: {}", e);
            failures.push(e);
        }
        if let Err(e) = self
            .persistence
            .save_state(&reviewer, session.cursor(), session.judgments())
            .await
        {
            session_warn!(session.id(), "⚠️ Saving state failed: {}", e);
            failures.push(e);
        }

        RecordReport { outcome, failures }
    }

    /// Responses table for download as `(file name, bytes)`, or `None`
    /// before the first judgment.
    pub fn download_responses(&self, session: &ReviewSession) -> LabelerResult<Option<(String, Vec<u8>)>> {
        let Some(reviewer) = session.reviewer() else {
            return Ok(None);
        };
        if session.judgments().is_empty() {
            return Ok(None);
        }
        let bytes = persistence::responses_csv(session.judgments())?;
        Ok(Some((persistence::responses_blob(reviewer), bytes)))
    }
}
