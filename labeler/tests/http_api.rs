//! Integration tests for the HTTP API

mod fixtures;
mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;

use fixtures::*;
use helpers::*;

#[tokio::test]
async fn test_health_and_options() {
    let router = router(&seeded_store().await);

    let (status, body) = send_json(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");

    let (status, body) = send_json(&router, "GET", "/api/options", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviewers"], json!(["Alberto", "Julien", "Emilie"]));
    assert_eq!(body["datasets"], json!(["quanti.csv", "quali.csv"]));
    assert_eq!(body["decisions"], json!(["Keep", "Pass"]));
}

#[tokio::test]
async fn test_index_page_is_served() {
    let router = router(&seeded_store().await);
    let (status, body) = send(&router, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("/static/app.js"));

    let (status, _) = send(&router, "GET", "/static/app.js", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_review_round_trip() {
    let store = seeded_store().await;
    let router = router(&store);

    let (status, view) = send_json(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "dataset": "quanti.csv", "reviewer": "Alberto" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["phase"], "active");
    assert_eq!(view["row"][0], json!({ "column": "Id.", "value": "q1" }));
    let id = view["session_id"].as_str().unwrap().to_string();

    let (status, view) = send_json(
        &router,
        "POST",
        &format!("/api/sessions/{}/decisions", id),
        Some(json!({ "decision": "Keep" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["cursor"], 1);
    assert_eq!(view["responses"], 1);
    assert!(view.get("notices").is_none());

    let (status, view) = send_json(&router, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["row"][0]["value"], "q2");

    let (status, csv) = send(&router, "GET", &format!("/api/sessions/{}/responses.csv", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(csv, b"Id,Response,User\nq1,Keep,Alberto\n");
    assert_eq!(store.get("Alberto_responses.csv").await.unwrap(), csv);
}

#[tokio::test]
async fn test_resume_and_reviewer_switch() {
    let store = seeded_store().await;
    store.insert("Julien_state.json", JULIEN_STATE).await;
    let router = router(&store);

    let (_, view) = send_json(&router, "POST", "/api/sessions", Some(json!({}))).await;
    assert_eq!(view["phase"], "uninitialized");
    assert_eq!(view["dataset"], "quanti.csv");
    let id = view["session_id"].as_str().unwrap().to_string();

    let (status, view) = send_json(
        &router,
        "PUT",
        &format!("/api/sessions/{}/reviewer", id),
        Some(json!({ "reviewer": "Julien" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["cursor"], 2);
    assert_eq!(view["row"][0]["value"], "q3");
}

#[tokio::test]
async fn test_exhausted_session_message() {
    let store = seeded_store().await;
    store
        .insert("Emilie_state.json", r#"{"row_index":3,"responses":[]}"#)
        .await;
    let router = router(&store);

    let (_, view) = send_json(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "reviewer": "Emilie" })),
    )
    .await;
    assert_eq!(view["phase"], "exhausted");
    assert_eq!(
        view["message"],
        "All rows have been processed and responses have been saved."
    );
    assert!(view["row"].is_null());

    let id = view["session_id"].as_str().unwrap().to_string();
    let (status, view) = send_json(
        &router,
        "POST",
        &format!("/api/sessions/{}/decisions", id),
        Some(json!({ "decision": "Pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["cursor"], 3);
    assert!(store.get("Emilie_responses.csv").await.is_none());
}

#[tokio::test]
async fn test_error_responses() {
    let store = seeded_store().await;
    store.insert("quali.csv", NO_ID_CSV).await;
    let router = router(&store);

    let (status, body) = send_json(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "dataset": "quali.csv" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "schema_invalid");
    assert_eq!(body["columns"], json!(["Name", "Comment"]));

    let (status, body) = send_json(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "dataset": "missing.csv" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_dataset");

    let (status, body) = send_json(&router, "GET", "/api/sessions/not-a-session", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session_not_found");

    let (_, view) = send_json(&router, "POST", "/api/sessions", Some(json!({}))).await;
    let id = view["session_id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &router,
        "PUT",
        &format!("/api/sessions/{}/reviewer", id),
        Some(json!({ "reviewer": "Mallory" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_reviewer");

    let (status, body) = send_json(
        &router,
        "POST",
        &format!("/api/sessions/{}/decisions", id),
        Some(json!({ "decision": "Maybe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_decision");

    let (status, body) = send_json(&router, "GET", &format!("/api/sessions/{}/responses.csv", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no_responses");
}

#[tokio::test]
async fn test_missing_dataset_source() {
    let store = labeler::InMemoryStore::new();
    store.insert("quanti.csv", QUANTI_CSV).await;
    let router = router(&store);

    let (_, view) = send_json(&router, "POST", "/api/sessions", Some(json!({}))).await;
    let id = view["session_id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &router,
        "PUT",
        &format!("/api/sessions/{}/dataset", id),
        Some(json!({ "dataset": "quali.csv" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "source_unavailable");

    let (_, view) = send_json(&router, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(view["dataset"], "quali.csv");
    assert_eq!(view["message"], "Choose a dataset to review.");
}

#[tokio::test]
async fn test_open_session_with_reviewer_only() {
    let store = seeded_store().await;
    store.insert("Julien_state.json", JULIEN_STATE).await;
    let router = router(&store);

    let (status, view) = send_json(&router, "POST", "/api/sessions", Some(json!({ "reviewer": "Julien" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["phase"], "active");
    assert_eq!(view["reviewer"], "Julien");
    assert_eq!(view["cursor"], 2);
}

#[tokio::test]
async fn test_reloaded_page_resumes_same_session() {
    let router = router(&seeded_store().await);
    let (_, view) = send_json(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "dataset": "quanti.csv", "reviewer": "Emilie" })),
    )
    .await;
    let id = view["session_id"].as_str().unwrap().to_string();
    send_json(&router, "POST", &format!("/api/sessions/{}/decisions", id), Some(json!({ "decision": "Keep" }))).await;

    let (status, view) = send_json(&router, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["session_id"], id.as_str());
    assert_eq!(view["responses"], 1);

    let (_, body) = send_json(&router, "GET", "/health", None).await;
    assert_eq!(body["sessions"], 1);
}

#[tokio::test(start_paused = true)]
async fn test_idle_session_expires() {
    let router = router_with_idle(&seeded_store().await, Duration::from_secs(60));
    let (_, view) = send_json(&router, "POST", "/api/sessions", Some(json!({}))).await;
    let stale = view["session_id"].as_str().unwrap().to_string();

    tokio::time::advance(Duration::from_secs(61)).await;
    let (status, _) = send_json(&router, "POST", "/api/sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&router, "GET", &format!("/api/sessions/{}", stale), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session_not_found");

    let (_, body) = send_json(&router, "GET", "/health", None).await;
    assert_eq!(body["sessions"], 1);
}
