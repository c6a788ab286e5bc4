//! Local filesystem remote store
//!
//! Blobs are plain files under a base directory. Uploads go to a temporary
//! sibling first and are renamed into place so readers never observe a
//! half-written state file.

use std::path::{Component, Path, PathBuf};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{LabelerError, LabelerResult};
use crate::traits::RemoteStore;
use crate::types::WriteMode;

/// Filesystem-backed store rooted at `base_dir`
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    base_dir: PathBuf,
}

impl LocalFsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Map a blob name to a path inside the base directory
    fn blob_path(&self, name: &str) -> LabelerResult<PathBuf> {
        resolve_blob_path(&self.base_dir, name)
    }
}

/// Join `name` onto `base_dir`, refusing anything that could escape it
pub(crate) fn resolve_blob_path(base_dir: &Path, name: &str) -> LabelerResult<PathBuf> {
    let trimmed = name.trim_start_matches('/');
    let relative = Path::new(trimmed);
    let only_normal = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));

    if trimmed.is_empty() || !only_normal || trimmed.contains('\\') {
        return Err(LabelerError::InvalidBlobName {
            name: name.to_string(),
        });
    }

    Ok(base_dir.join(relative))
}

#[async_trait]
impl RemoteStore for LocalFsStore {
    async fn download(&self, name: &str) -> LabelerResult<Option<Vec<u8>>> {
        let path = self.blob_path(name)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!("📥 Read {} ({} bytes)", path.display(), bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LabelerError::transport(
                self.backend_name(),
                format!("reading {}: {}", path.display(), e),
            )),
        }
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, mode: WriteMode) -> LabelerResult<()> {
        let path = self.blob_path(name)?;

        if mode == WriteMode::CreateNew && fs::try_exists(&path).await.unwrap_or(false) {
            return Err(LabelerError::BackendConflict {
                name: name.to_string(),
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                LabelerError::transport(self.backend_name(), format!("creating {}: {}", parent.display(), e))
            })?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let write = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(&bytes).await?;
            file.flush().await?;
            file.sync_all().await?;
            fs::rename(&tmp_path, &path).await
        };

        if let Err(e) = write.await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(LabelerError::transport(
                self.backend_name(),
                format!("writing {}: {}", path.display(), e),
            ));
        }

        tracing::debug!("💾 Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_blob_path() {
        let base = Path::new("/data");
        assert_eq!(
            resolve_blob_path(base, "Alberto_state.json").unwrap(),
            PathBuf::from("/data/Alberto_state.json")
        );
        assert_eq!(
            resolve_blob_path(base, "/quanti.csv").unwrap(),
            PathBuf::from("/data/quanti.csv")
        );
        assert_eq!(
            resolve_blob_path(base, "sub/quali.csv").unwrap(),
            PathBuf::from("/data/sub/quali.csv")
        );
    }

    #[test]
    fn test_resolve_blob_path_rejects_escapes() {
        let base = Path::new("/data");
        for name in ["", "/", "../secret", "a/../../b", "./x", "a\\b"] {
            assert!(
                resolve_blob_path(base, name).is_err(),
                "name should be rejected: {name:?}"
            );
        }
    }
}
