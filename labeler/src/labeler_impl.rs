//! Main labeler implementation
//!
//! Wires the review service into the Axum router and runs the HTTP server.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shared::logging;
use crate::core::ReviewService;
use crate::error::{LabelerError, LabelerResult};
use crate::state::AppState;
use crate::web::handlers::{api, static_files};

/// Review web application
#[derive(Clone)]
pub struct Labeler {
    state: AppState,
}

impl Labeler {
    pub fn new(service: ReviewService, session_idle: Duration) -> Self {
        Self {
            state: AppState::new(service, session_idle),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            // Static file routes
            .route("/", get(static_files::serve_index))
            .route("/static/*path", get(static_files::serve_static))

            // API routes
            .route("/api/options", get(api::options))
            .route("/api/sessions", post(api::open_session))
            .route("/api/sessions/:id", get(api::get_session))
            .route("/api/sessions/:id/dataset", put(api::select_dataset))
            .route("/api/sessions/:id/reviewer", put(api::select_reviewer))
            .route("/api/sessions/:id/decisions", post(api::record_decision))
            .route("/api/sessions/:id/responses.csv", get(api::download_responses))

            // Health check
            .route("/health", get(api::health))

            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self, bind_address: SocketAddr) -> LabelerResult<()> {
        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .map_err(|e| LabelerError::config(format!("Failed to bind to {}: {}", bind_address, e)))?;

        tracing::info!("🌐 Review page available at http://{}/", bind_address);
        tracing::info!("💾 Storage backend: {}", self.state.service.backend_name());

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown("Received Ctrl+C signal"),
        Err(err) => logging::log_error("Signal handling", &err),
    }
}
