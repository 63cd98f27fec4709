use crate::app_state::AppState;
use crate::error::ApiError;
use crate::query_payload::QueryPayload;
use crate::rag_response::{HealthResponse, RagResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<QueryPayload>, JsonRejection>,
) -> Result<Json<RagResponse>, ApiError> {
    let Json(payload) = payload?;
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(ApiError::EmptyQuery);
    }

    // Only requests that reach the pipeline spend quota.
    if state.limiter.check().is_err() {
        return Err(ApiError::RateLimited);
    }

    log::info!("Received recommendation query ({} chars)", query.chars().count());
    let answer = state.recommender.get_recommendation(query).await?;

    Ok(Json(RagResponse { answer }))
}
