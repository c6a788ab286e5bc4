//! Review session state machine
//!
//! A session is the explicit replacement for per-browser ambient state: it
//! owns the selected dataset, the active reviewer and that reviewer's
//! in-memory [`ResumeState`]. Every operation takes the session as an
//! argument; nothing here performs I/O.
//!
//! ```text
//! Uninitialized --(reviewer + dataset)--> Active --(cursor == len)--> Exhausted
//!       ^                                   |                            |
//!       +-------- reviewer switch ----------+----------------------------+
//! ```

use std::sync::Arc;

use shared::{Decision, Judgment, ResumeState, ReviewerId};
use crate::core::dataset::{Dataset, Row};
use crate::types::{CellView, Notice, SessionId, SessionPhase, SessionView};

/// Shown instead of a row once every row has been judged
pub const COMPLETED_MESSAGE: &str = "All rows have been processed and responses have been saved.";

/// Result of applying a decision to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The judgment was appended and the cursor advanced
    Recorded(Judgment),
    /// Every row has already been judged; nothing changed
    Exhausted,
    /// No reviewer or no usable dataset yet; nothing changed
    NotReady,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    id: SessionId,
    dataset_name: Option<String>,
    dataset: Option<Arc<Dataset>>,
    reviewer: Option<ReviewerId>,
    state: ResumeState,
}

impl ReviewSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            dataset_name: None,
            dataset: None,
            reviewer: None,
            state: ResumeState::default(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.reviewer, &self.dataset) {
            (Some(_), Some(dataset)) if self.state.row_index >= dataset.len() => SessionPhase::Exhausted,
            (Some(_), Some(_)) => SessionPhase::Active,
            _ => SessionPhase::Uninitialized,
        }
    }

    /// Replace the dataset. `None` records a selection whose load failed.
    ///
    /// The reviewer's cursor and judgments are kept: progress is tracked per
    /// reviewer, not per dataset.
    pub fn set_dataset(&mut self, name: impl Into<String>, dataset: Option<Arc<Dataset>>) {
        self.dataset_name = Some(name.into());
        self.dataset = dataset;
    }

    /// Drop the reviewer and their in-memory progress without persisting it
    pub fn clear_reviewer(&mut self) {
        self.reviewer = None;
        self.state = ResumeState::default();
    }

    /// Start (or resume) reviewing as `reviewer` from a loaded state
    pub fn begin_review(&mut self, reviewer: ReviewerId, state: ResumeState) {
        self.reviewer = Some(reviewer);
        self.state = state;
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    pub fn reviewer(&self) -> Option<&ReviewerId> {
        self.reviewer.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.state.row_index
    }

    pub fn judgments(&self) -> &[Judgment] {
        &self.state.responses
    }

    pub fn resume_state(&self) -> &ResumeState {
        &self.state
    }

    /// Row under the cursor while the session is active
    pub fn current_row(&self) -> Option<&Row> {
        match self.phase() {
            SessionPhase::Active => self.dataset.as_ref()?.row(self.state.row_index),
            _ => None,
        }
    }

    /// Record `decision` against the current row and advance the cursor.
    ///
    /// Outside the `Active` phase this is a no-op.
    pub fn apply_decision(&mut self, decision: Decision) -> DecisionOutcome {
        match self.phase() {
            SessionPhase::Uninitialized => return DecisionOutcome::NotReady,
            SessionPhase::Exhausted => return DecisionOutcome::Exhausted,
            SessionPhase::Active => {}
        }

        let (Some(reviewer), Some(row)) = (self.reviewer.clone(), self.current_row()) else {
            return DecisionOutcome::NotReady;
        };

        let judgment = Judgment {
            row_id: row.id().clone(),
            decision,
            reviewer,
        };
        self.state.responses.push(judgment.clone());
        self.state.row_index += 1;
        DecisionOutcome::Recorded(judgment)
    }

    /// Snapshot for the presentation layer
    pub fn view(&self, notices: Vec<Notice>) -> SessionView {
        let phase = self.phase();
        let row = self.current_row().map(|row| {
            row.cells()
                .map(|(column, value)| CellView {
                    column: column.to_string(),
                    value: value.to_string(),
                })
                .collect()
        });
        let message = match phase {
            SessionPhase::Exhausted => Some(COMPLETED_MESSAGE.to_string()),
            SessionPhase::Active => None,
            SessionPhase::Uninitialized if self.dataset.is_none() => {
                Some("Choose a dataset to review.".to_string())
            }
            SessionPhase::Uninitialized => Some("Select a reviewer to start.".to_string()),
        };

        SessionView {
            session_id: self.id,
            dataset: self.dataset_name.clone(),
            reviewer: self.reviewer.as_ref().map(|r| r.to_string()),
            phase,
            cursor: self.state.row_index,
            total_rows: self.dataset.as_ref().map_or(0, |d| d.len()),
            row,
            responses: self.state.responses.len(),
            message,
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::RowId;

    fn dataset(rows: usize) -> Arc<Dataset> {
        let mut csv = String::from("Id.,Text\n");
        for i in 0..rows {
            csv.push_str(&format!("r{},text {}\n", i, i));
        }
        Arc::new(Dataset::parse("quanti.csv", csv.as_bytes()).unwrap())
    }

    fn reviewer(name: &str) -> ReviewerId {
        ReviewerId::new(name).unwrap()
    }

    fn active_session(rows: usize) -> ReviewSession {
        let mut session = ReviewSession::new(SessionId::new());
        session.set_dataset("quanti.csv", Some(dataset(rows)));
        session.begin_review(reviewer("Alberto"), ResumeState::default());
        session
    }

    #[test]
    fn test_new_session_is_uninitialized() {
        let mut session = ReviewSession::new(SessionId::new());
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert_eq!(session.apply_decision(Decision::Keep), DecisionOutcome::NotReady);

        session.set_dataset("quanti.csv", Some(dataset(2)));
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert_eq!(
            session.view(Vec::new()).message.as_deref(),
            Some("Select a reviewer to start.")
        );
    }

    #[test]
    fn test_n_decisions_advance_cursor() {
        let mut session = active_session(5);
        let decisions = [Decision::Keep, Decision::Pass, Decision::Keep];

        for decision in decisions {
            assert!(matches!(session.apply_decision(decision), DecisionOutcome::Recorded(_)));
        }

        assert_eq!(session.cursor(), 3);
        assert_eq!(session.judgments().len(), 3);
        for (i, (judgment, decision)) in session.judgments().iter().zip(decisions).enumerate() {
            assert_eq!(judgment.row_id, RowId::new(format!("r{}", i)));
            assert_eq!(judgment.decision, decision);
            assert_eq!(judgment.reviewer.as_str(), "Alberto");
        }
        assert_eq!(session.current_row().unwrap().id().as_str(), "r3");
    }

    #[test]
    fn test_exhausted_rejects_further_decisions() {
        let mut session = active_session(2);
        session.apply_decision(Decision::Keep);
        session.apply_decision(Decision::Pass);

        assert_eq!(session.phase(), SessionPhase::Exhausted);
        assert!(session.current_row().is_none());
        assert_eq!(session.apply_decision(Decision::Keep), DecisionOutcome::Exhausted);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.judgments().len(), 2);

        let view = session.view(Vec::new());
        assert_eq!(view.message.as_deref(), Some(COMPLETED_MESSAGE));
        assert!(view.row.is_none());
    }

    #[test]
    fn test_resume_state_beyond_dataset_is_exhausted() {
        let mut session = ReviewSession::new(SessionId::new());
        session.set_dataset("quanti.csv", Some(dataset(2)));
        session.begin_review(reviewer("Julien"), ResumeState::new(10, Vec::new()));
        assert_eq!(session.phase(), SessionPhase::Exhausted);
        assert_eq!(session.apply_decision(Decision::Pass), DecisionOutcome::Exhausted);
    }

    #[test]
    fn test_resume_mid_dataset() {
        let mut session = ReviewSession::new(SessionId::new());
        session.set_dataset("quanti.csv", Some(dataset(5)));
        session.begin_review(reviewer("Julien"), ResumeState::new(3, Vec::new()));

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.current_row().unwrap().id().as_str(), "r3");
    }

    #[test]
    fn test_clear_reviewer_discards_progress() {
        let mut session = active_session(3);
        session.apply_decision(Decision::Keep);
        session.clear_reviewer();

        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert_eq!(session.cursor(), 0);
        assert!(session.judgments().is_empty());
    }

    #[test]
    fn test_dataset_switch_keeps_progress() {
        let mut session = active_session(3);
        session.apply_decision(Decision::Keep);
        session.set_dataset("quali.csv", Some(dataset(4)));

        assert_eq!(session.cursor(), 1);
        assert_eq!(session.dataset_name(), Some("quali.csv"));
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_failed_dataset_load_blocks_decisions() {
        let mut session = active_session(3);
        session.set_dataset("quali.csv", None);

        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert_eq!(session.apply_decision(Decision::Keep), DecisionOutcome::NotReady);
        assert_eq!(
            session.view(Vec::new()).message.as_deref(),
            Some("Choose a dataset to review.")
        );
    }

    #[test]
    fn test_view_of_active_row() {
        let session = active_session(2);
        let view = session.view(Vec::new());

        assert_eq!(view.phase, SessionPhase::Active);
        assert_eq!(view.total_rows, 2);
        assert_eq!(view.reviewer.as_deref(), Some("Alberto"));
        let row = view.row.unwrap();
        assert_eq!(row[0], CellView { column: "Id.".to_string(), value: "r0".to_string() });
        assert_eq!(row[1].value, "text 0");
        assert!(view.message.is_none());
    }
}
