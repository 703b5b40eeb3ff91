use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use wq_core::{Error, QuizSummary, StoredQuiz};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub url: String,
}

/// Error body in the `{"detail": "..."}` shape the front end expects.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Quiz not found")
    }

    fn internal(error: Error) -> Self {
        tracing::error!("❌ Request failed: {}", error);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<StoredQuiz>, ApiError> {
    match state.pipeline.generate(&request.url).await {
        Ok(stored) => Ok(Json(stored)),
        Err(e) if e.is_extraction() => {
            tracing::warn!("⚠️ Extraction failed for {}: {}", request.url, e);
            Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("Failed to scrape URL: {}", e),
            ))
        }
        Err(e) => Err(ApiError::internal(e)),
    }
}

pub async fn history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<QuizSummary>>, ApiError> {
    let summaries = state
        .pipeline
        .storage()
        .list()
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(summaries))
}

pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredQuiz>, ApiError> {
    if uuid::Uuid::parse_str(&id).is_err() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Invalid quiz id"));
    }
    state
        .pipeline
        .storage()
        .get(&id)
        .await
        .map_err(ApiError::internal)?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}
