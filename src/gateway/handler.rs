use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::constants::{DEFAULT_TOP_K, PERKFLOW_CACHE_HEADER};
use crate::embedding::Embedder;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    IndexQuestionRequest, IndexQuestionResponse, QuestionRequest, RecommendParams,
    RecommendationsResponse,
};
use crate::gateway::state::HandlerState;
use crate::llm::LlmClient;
use crate::repository::{RecommendationRepository, StoreDirectory};
use crate::vectordb::VectorSearchClient;

/// `POST /v1/recommendations/question`
#[instrument(skip(state, request))]
pub async fn question_handler<E, V, L, R>(
    State(state): State<HandlerState<E, V, L, R>>,
    Json(request): Json<QuestionRequest>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    V: VectorSearchClient + 'static,
    L: LlmClient + 'static,
    R: RecommendationRepository + StoreDirectory + 'static,
{
    debug!(lat = request.lat, lng = request.lng, "question flow requested");

    let recommendation = state
        .recommender
        .recommend_by_question(&request.question, request.lat, request.lng)
        .await?;

    Ok((StatusCode::OK, Json(recommendation)).into_response())
}

/// `GET /v1/users/{user_id}/recommendations`
#[instrument(skip(state))]
pub async fn user_recommendations_handler<E, V, L, R>(
    State(state): State<HandlerState<E, V, L, R>>,
    Path(user_id): Path<i64>,
    Query(params): Query<RecommendParams>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    V: VectorSearchClient + 'static,
    L: LlmClient + 'static,
    R: RecommendationRepository + StoreDirectory + 'static,
{
    let top_k = params.top_k.unwrap_or(DEFAULT_TOP_K);

    let (batch, cache_status) = state.recommender.recommend(user_id, top_k).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        PERKFLOW_CACHE_HEADER,
        HeaderValue::from_static(cache_status.as_header_value()),
    );

    Ok((
        StatusCode::OK,
        headers,
        Json(RecommendationsResponse::from_batch(&batch)),
    )
        .into_response())
}

/// `POST /v1/questions`: adds a categorized question to the corpus.
#[instrument(skip(state, request))]
pub async fn index_question_handler<E, V, L, R>(
    State(state): State<HandlerState<E, V, L, R>>,
    Json(request): Json<IndexQuestionRequest>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    V: VectorSearchClient + 'static,
    L: LlmClient + 'static,
    R: RecommendationRepository + StoreDirectory + 'static,
{
    state
        .recommender
        .index_question(&request.question, &request.category)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IndexQuestionResponse { status: "indexed" }),
    )
        .into_response())
}
