//! HTTP gateway (Axum) for both recommendation flows.
//!
//! This module is primarily used by the `perkflow` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::{index_question_handler, question_handler, user_recommendations_handler};
pub use state::HandlerState;

use crate::constants::{PERKFLOW_STATUS_HEALTHY, PERKFLOW_STATUS_READY};
use crate::embedding::Embedder;
use crate::llm::LlmClient;
use crate::repository::{RecommendationRepository, StoreDirectory};
use crate::vectordb::VectorSearchClient;

pub fn create_router_with_state<E, V, L, R>(state: HandlerState<E, V, L, R>) -> Router
where
    E: Embedder + 'static,
    V: VectorSearchClient + 'static,
    L: LlmClient + 'static,
    R: RecommendationRepository + StoreDirectory + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/recommendations/question", post(question_handler))
        .route(
            "/v1/users/{user_id}/recommendations",
            get(user_recommendations_handler),
        )
        .route("/v1/questions", post(index_question_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub vectordb: &'static str,
    pub database: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: PERKFLOW_STATUS_HEALTHY,
        }),
    )
        .into_response()
}

/// Startup gates on migrations and collection creation, so a serving
/// process implies both backends were reachable.
#[tracing::instrument]
pub async fn ready_handler() -> Response {
    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ok",
            components: ComponentStatus {
                http: PERKFLOW_STATUS_READY,
                vectordb: PERKFLOW_STATUS_READY,
                database: PERKFLOW_STATUS_READY,
            },
        }),
    )
        .into_response()
}
