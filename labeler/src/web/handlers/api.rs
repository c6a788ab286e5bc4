//! REST API handlers
//!
//! JSON endpoints driving a review session from the browser

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use shared::{session_info, Decision};
use crate::error::LabelerResult;
use crate::state::{AppState, SessionHandle};
use crate::types::{
    DecisionRequest, Notice, OpenSessionRequest, OptionsView, SelectDatasetRequest,
    SelectReviewerRequest, SessionId, SessionView,
};

async fn lookup(state: &AppState, id: &str) -> LabelerResult<SessionHandle> {
    let id: SessionId = id.parse()?;
    state.sessions.get(&id).await
}

/// Health check - /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.service.backend_name(),
        "sessions": state.sessions.len().await,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Menu values - /api/options
pub async fn options(State(state): State<AppState>) -> Json<OptionsView> {
    let roster = state.service.roster();
    Json(OptionsView {
        reviewers: roster.reviewers().iter().map(|r| r.to_string()).collect(),
        datasets: roster.datasets().to_vec(),
        decisions: Decision::ALL.iter().map(|d| d.to_string()).collect(),
    })
}

/// Open a session - POST /api/sessions
pub async fn open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> LabelerResult<(StatusCode, Json<SessionView>)> {
    let session = state
        .service
        .open_session(request.dataset.as_deref(), request.reviewer.as_deref())
        .await?;
    let view = session.view(Vec::new());
    state.sessions.insert(session).await;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Current session view - GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> LabelerResult<Json<SessionView>> {
    let handle = lookup(&state, &id).await?;
    let session = handle.lock().await;
    Ok(Json(session.view(Vec::new())))
}

/// Switch dataset - PUT /api/sessions/:id/dataset
pub async fn select_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectDatasetRequest>,
) -> LabelerResult<Json<SessionView>> {
    let handle = lookup(&state, &id).await?;
    let mut session = handle.lock().await;
    state.service.select_dataset(&mut session, &request.dataset).await?;
    Ok(Json(session.view(Vec::new())))
}

/// Switch reviewer - PUT /api/sessions/:id/reviewer
pub async fn select_reviewer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectReviewerRequest>,
) -> LabelerResult<Json<SessionView>> {
    let handle = lookup(&state, &id).await?;
    let mut session = handle.lock().await;
    state.service.select_reviewer(&mut session, &request.reviewer).await?;
    Ok(Json(session.view(Vec::new())))
}

/// Record a decision - POST /api/sessions/:id/decisions
///
/// Save failures do not fail the request: the judgment is kept in memory and
/// each failure is reported as a notice.
pub async fn record_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> LabelerResult<Json<SessionView>> {
    let decision: Decision = request.decision.parse()?;
    let handle = lookup(&state, &id).await?;
    let mut session = handle.lock().await;

    let report = state.service.record(&mut session, decision).await;
    let notices: Vec<Notice> = report.failures.iter().map(Notice::from).collect();
    Ok(Json(session.view(notices)))
}

/// Download responses - GET /api/sessions/:id/responses.csv
pub async fn download_responses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> LabelerResult<Response> {
    let handle = lookup(&state, &id).await?;
    let session = handle.lock().await;

    let Some((file_name, bytes)) = state.service.download_responses(&session)? else {
        let body = json!({
            "error": "no_responses",
            "message": "No responses have been recorded yet"
        });
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };

    session_info!(session.id(), "⬇️ Download of {} ({} bytes)", file_name, bytes.len());
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
