//! HTTP presentation layer
//!
//! Handlers translate requests into review service calls and render
//! [`LabelerError`] as JSON error bodies.

pub mod handlers;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::error::LabelerError;

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl LabelerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SourceUnavailable { .. } | Self::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            Self::SchemaInvalid { .. } | Self::DatasetMalformed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BackendAuthFailure { .. } | Self::BackendTransportFailure { .. } => StatusCode::BAD_GATEWAY,
            Self::BackendConflict { .. } => StatusCode::CONFLICT,
            Self::InvalidBlobName { .. } | Self::Shared(_) => StatusCode::BAD_REQUEST,
            Self::Configuration { .. } | Self::IoError(_) | Self::JsonError(_) | Self::CsvError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for LabelerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            shared::logging::log_error("Request", &self);
        }

        let columns = match &self {
            Self::SchemaInvalid { columns, .. } => Some(columns.clone()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
            columns,
        };
        (status, Json(body)).into_response()
    }
}
