//! Google Drive remote store
//!
//! Drive addresses files by id, not by path, so every operation starts with a
//! name lookup (optionally restricted to one parent folder). Uploads of new
//! blobs create the metadata first and then send the media.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{LabelerError, LabelerResult};
use crate::traits::RemoteStore;
use crate::types::WriteMode;

const DEFAULT_API_URL: &str = "https://www.googleapis.com";
const BACKEND: &str = "gdrive";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
struct FileRef {
    id: String,
}

/// Drive-backed store
#[derive(Clone)]
pub struct DriveStore {
    client: reqwest::Client,
    token: String,
    folder_id: Option<String>,
    api_url: String,
}

impl std::fmt::Debug for DriveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveStore")
            .field("api_url", &self.api_url)
            .field("folder_id", &self.folder_id)
            .field("token", &"***")
            .finish()
    }
}

impl DriveStore {
    pub fn new(token: impl Into<String>, folder_id: Option<String>) -> LabelerResult<Self> {
        Self::with_api_url(token, folder_id, DEFAULT_API_URL)
    }

    /// Point the store at a different API host (used by tests)
    pub fn with_api_url(
        token: impl Into<String>,
        folder_id: Option<String>,
        api_url: impl Into<String>,
    ) -> LabelerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LabelerError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            folder_id,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Drive search expression for a blob name
    fn name_query(&self, name: &str) -> String {
        let escaped = name
            .trim_start_matches('/')
            .replace('\\', "\\\\")
            .replace('\'', "\\'");
        match &self.folder_id {
            Some(folder) => format!("name = '{}' and '{}' in parents and trashed = false", escaped, folder),
            None => format!("name = '{}' and trashed = false", escaped),
        }
    }

    async fn find_file_id(&self, name: &str) -> LabelerResult<Option<String>> {
        let query = self.name_query(name);
        let response = self
            .client
            .get(format!("{}/drive/v3/files", self.api_url))
            .header("Authorization", self.bearer())
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id)"),
                ("spaces", "drive"),
                ("pageSize", "1"),
            ])
            .send()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        let response = check_status(response).await?;
        let list: FileList = response
            .json()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, format!("Invalid file list: {}", e)))?;

        Ok(list.files.into_iter().next().map(|file| file.id))
    }

    async fn create_metadata(&self, name: &str) -> LabelerResult<String> {
        let mut metadata = json!({ "name": name.trim_start_matches('/') });
        if let Some(folder) = &self.folder_id {
            metadata["parents"] = json!([folder]);
        }

        let response = self
            .client
            .post(format!("{}/drive/v3/files", self.api_url))
            .header("Authorization", self.bearer())
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        let response = check_status(response).await?;
        let created: FileRef = response
            .json()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, format!("Invalid create response: {}", e)))?;
        Ok(created.id)
    }

    async fn write_media(&self, file_id: &str, bytes: Vec<u8>) -> LabelerResult<()> {
        let response = self
            .client
            .patch(format!("{}/upload/drive/v3/files/{}", self.api_url, file_id))
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/octet-stream")
            .query(&[("uploadType", "media")])
            .body(bytes)
            .send()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }

    async fn delete_file(&self, file_id: &str) -> LabelerResult<()> {
        let response = self
            .client
            .delete(format!("{}/drive/v3/files/{}", self.api_url, file_id))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }
}

/// Map Drive HTTP failures onto the store error taxonomy
async fn check_status(response: reqwest::Response) -> LabelerResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(LabelerError::auth(BACKEND, message)),
        _ => Err(LabelerError::transport(BACKEND, format!("HTTP {}: {}", status, message))),
    }
}

#[async_trait]
impl RemoteStore for DriveStore {
    async fn download(&self, name: &str) -> LabelerResult<Option<Vec<u8>>> {
        let Some(file_id) = self.find_file_id(name).await? else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/drive/v3/files/{}", self.api_url, file_id))
            .header("Authorization", self.bearer())
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        // Deleted between lookup and fetch
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        tracing::debug!("📥 Downloaded {} from Drive ({} bytes)", name, bytes.len());
        Ok(Some(bytes.to_vec()))
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, mode: WriteMode) -> LabelerResult<()> {
        let size = bytes.len();
        let (file_id, created) = match (self.find_file_id(name).await?, mode) {
            (Some(_), WriteMode::CreateNew) => {
                return Err(LabelerError::BackendConflict {
                    name: name.to_string(),
                });
            }
            (Some(id), WriteMode::Overwrite) => (id, false),
            (None, _) => (self.create_metadata(name).await?, true),
        };

        if let Err(e) = self.write_media(&file_id, bytes).await {
            // The new file is still empty
            if created {
                if let Err(cleanup) = self.delete_file(&file_id).await {
                    tracing::warn!("⚠️ Could not remove empty Drive file {} for {}: {}", file_id, name, cleanup);
                }
            }
            return Err(e);
        }
        tracing::debug!("📤 Uploaded {} to Drive as {} ({} bytes)", name, file_id, size);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
