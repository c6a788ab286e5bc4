//! Dropbox remote store
//!
//! Talks to the Dropbox content endpoints directly over HTTP. Blob names map
//! to `/{name}` in the app folder. The access token is supplied out-of-band
//! (see [`crate::config`]).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use crate::error::{LabelerError, LabelerResult};
use crate::traits::RemoteStore;
use crate::types::WriteMode;

const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";
const BACKEND: &str = "dropbox";

/// `Dropbox-API-Arg` for downloads
#[derive(Serialize)]
struct DownloadArg {
    path: String,
}

/// `Dropbox-API-Arg` for uploads; field order is the header's key order
#[derive(Serialize)]
struct UploadArg {
    path: String,
    mode: &'static str,
    autorename: bool,
    mute: bool,
}

/// Dropbox-backed store
#[derive(Clone)]
pub struct DropboxStore {
    client: reqwest::Client,
    token: String,
    content_url: String,
}

impl std::fmt::Debug for DropboxStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxStore")
            .field("content_url", &self.content_url)
            .field("token", &"***")
            .finish()
    }
}

impl DropboxStore {
    pub fn new(token: impl Into<String>) -> LabelerResult<Self> {
        Self::with_content_url(token, DEFAULT_CONTENT_URL)
    }

    /// Point the store at a different content host (used by tests)
    pub fn with_content_url(token: impl Into<String>, content_url: impl Into<String>) -> LabelerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LabelerError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            content_url: content_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn dropbox_path(name: &str) -> String {
        format!("/{}", name.trim_start_matches('/'))
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/2/files/{}", self.content_url, route)
    }

    /// Turn a non-success response into the matching error
    async fn classify_failure(name: &str, response: reqwest::Response) -> LabelerError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let summary = error_summary(&body);

        match status {
            StatusCode::UNAUTHORIZED => LabelerError::auth(BACKEND, summary),
            StatusCode::CONFLICT if summary.contains("conflict") => LabelerError::BackendConflict {
                name: name.to_string(),
            },
            _ => LabelerError::transport(BACKEND, format!("HTTP {}: {}", status, summary)),
        }
    }
}

/// Pull `error_summary` out of a Dropbox error body, falling back to the raw text
fn error_summary(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error_summary")
                .and_then(|summary| summary.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Dropbox requires the API-Arg header to be pure ASCII
fn header_safe_json<T: Serialize>(value: &T) -> LabelerResult<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}

#[async_trait]
impl RemoteStore for DropboxStore {
    async fn download(&self, name: &str) -> LabelerResult<Option<Vec<u8>>> {
        let arg = header_safe_json(&DownloadArg {
            path: Self::dropbox_path(name),
        })?;

        let response = self
            .client
            .post(self.endpoint("download"))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Dropbox-API-Arg", arg)
            .send()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            let summary = error_summary(&body);
            if summary.contains("not_found") {
                return Ok(None);
            }
            return Err(LabelerError::transport(BACKEND, format!("HTTP 409: {}", summary)));
        }
        if !response.status().is_success() {
            return Err(Self::classify_failure(name, response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;
        tracing::debug!("📥 Downloaded {} from Dropbox ({} bytes)", name, bytes.len());
        Ok(Some(bytes.to_vec()))
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, mode: WriteMode) -> LabelerResult<()> {
        let mode = match mode {
            WriteMode::Overwrite => "overwrite",
            WriteMode::CreateNew => "add",
        };
        let arg = header_safe_json(&UploadArg {
            path: Self::dropbox_path(name),
            mode,
            autorename: false,
            mute: true,
        })?;
        let size = bytes.len();

        let response = self
            .client
            .post(self.endpoint("upload"))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Dropbox-API-Arg", arg)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| LabelerError::transport(BACKEND, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(name, response).await);
        }

        tracing::debug!("📤 Uploaded {} to Dropbox ({} bytes)", name, size);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
