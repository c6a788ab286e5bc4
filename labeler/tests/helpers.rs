//! Test helper utilities for labeler integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use labeler::core::ReviewService;
use labeler::state::DEFAULT_IDLE_TIMEOUT;
use labeler::{InMemoryStore, Labeler};
use shared::Roster;

/// Review service over `store` with the default roster and no local fallback
pub fn service(store: &InMemoryStore) -> ReviewService {
    ReviewService::new(Arc::new(store.clone()), Roster::default(), None)
}

/// Router over `store`
pub fn router(store: &InMemoryStore) -> Router {
    router_with_idle(store, DEFAULT_IDLE_TIMEOUT)
}

/// Router over `store` dropping sessions idle for longer than `idle`
pub fn router_with_idle(store: &InMemoryStore, idle: Duration) -> Router {
    Labeler::new(service(store), idle).build_router()
}

/// Send one request through the router and decode the JSON body
pub async fn send_json(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Send one request through the router and return the raw body
pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}
