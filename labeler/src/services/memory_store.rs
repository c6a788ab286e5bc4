//! In-memory remote store for demos and tests

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{LabelerError, LabelerResult};
use crate::traits::RemoteStore;
use crate::types::WriteMode;

/// Blob map shared by every clone of the store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly, bypassing upload semantics
    pub async fn insert(&self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.blobs
            .write()
            .await
            .insert(normalize(name), bytes.into());
    }

    pub async fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(&normalize(name)).cloned()
    }

    /// Sorted blob names currently stored
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

fn normalize(name: &str) -> String {
    name.trim_start_matches('/').to_string()
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn download(&self, name: &str) -> LabelerResult<Option<Vec<u8>>> {
        Ok(self.get(name).await)
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, mode: WriteMode) -> LabelerResult<()> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(LabelerError::InvalidBlobName {
                name: name.to_string(),
            });
        }

        let mut blobs = self.blobs.write().await;
        if mode == WriteMode::CreateNew && blobs.contains_key(&key) {
            return Err(LabelerError::BackendConflict { name: key });
        }
        blobs.insert(key, bytes);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
