//! Row review labeler
//!
//! Reviewers walk a CSV dataset one row at a time and mark each row `Keep`
//! or `Pass`. Every decision is written straight to a remote store as a
//! responses table and a resume state, so a reviewer can pick up where they
//! stopped from any browser.

pub mod config;
pub mod core;
pub mod error;
pub mod labeler_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use config::{Args, LabelerConfig, StoreSettings};
pub use error::{LabelerError, LabelerResult};
pub use labeler_impl::Labeler;
pub use state::AppState;
pub use types::*;

// Re-export trait definitions
pub use traits::RemoteStore;

// Re-export service implementations
pub use services::{build_store, DriveStore, DropboxStore, InMemoryStore, LocalFsStore};
