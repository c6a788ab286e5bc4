//! Core review logic
//!
//! Datasets, sessions and per-reviewer persistence. Only the service and
//! the loader touch the remote store; sessions are plain data.

pub mod dataset;
pub mod persistence;
pub mod service;
pub mod session;

// Re-export commonly used types
pub use dataset::{Dataset, DatasetLoader, Row, ID_COLUMN};
pub use persistence::PersistenceAdapter;
pub use service::{RecordReport, ReviewService};
pub use session::{DecisionOutcome, ReviewSession, COMPLETED_MESSAGE};
