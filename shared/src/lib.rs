//! Shared types for the row review labeler
//!
//! Value types that cross component boundaries (reviewers, decisions,
//! judgments, resume state), the shared error type and logging bootstrap.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
