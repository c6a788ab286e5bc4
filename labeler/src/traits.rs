//! Service trait definitions for dependency injection
//!
//! All remote storage I/O goes through [`RemoteStore`] so the review logic
//! never depends on a concrete backend.

use async_trait::async_trait;

use crate::error::LabelerResult;
use crate::types::WriteMode;

/// Key-value blob store addressed by path-like names
#[mockall::automock]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch a blob. `Ok(None)` means the blob does not exist.
    async fn download(&self, name: &str) -> LabelerResult<Option<Vec<u8>>>;

    /// Store a blob under `name`
    async fn upload(&self, name: &str, bytes: Vec<u8>, mode: WriteMode) -> LabelerResult<()>;

    /// Short backend label used in logs and error messages
    fn backend_name(&self) -> &'static str;
}
