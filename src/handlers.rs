use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use crate::services::PredictionService;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Prediction service over the model loaded at startup.
    pub predictions: PredictionService,
}

/// GET /
///
/// Static liveness message. Answers even when the model failed to load.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is live", body = LiveMessage))
)]
pub async fn root(State(state): State<Arc<AppState>>) -> Json<LiveMessage> {
    Json(state.predictions.health())
}

/// POST /predict
///
/// Classifies a loan application as `Approved` or `Rejected`.
///
/// # Returns
///
/// * `200` with the label, `503` when the model is not loaded, `422` when the
///   body is not a valid loan application. Errors always carry an `error` field.
#[utoipa::path(
    post,
    path = "/predict",
    request_body = LoanApplication,
    responses(
        (status = 200, description = "Prediction made", body = PredictionResponse),
        (status = 422, description = "Malformed loan application", body = ErrorResponse),
        (status = 503, description = "Model not loaded", body = ErrorResponse)
    )
)]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoanApplication>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(application) = payload?;

    let span = tracing::info_span!("predict", request_id = %Uuid::new_v4());
    span.in_scope(|| -> Result<Json<PredictionResponse>, AppError> {
        let response = state.predictions.predict(&application)?;
        tracing::info!("POST /predict -> {}", response.status.as_str());
        Ok(Json(response))
    })
}

/// GET /health
///
/// Always 200; reports whether the service is running degraded.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let model_loaded = state.predictions.is_model_loaded();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: if model_loaded { "healthy" } else { "degraded" }.to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_loaded,
        }),
    )
}

/// GET /model
///
/// Metadata about the loaded artifact.
#[utoipa::path(
    get,
    path = "/model",
    responses(
        (status = 200, description = "Loaded model metadata", body = ModelInfo),
        (status = 503, description = "Model not loaded", body = ErrorResponse)
    )
)]
pub async fn model_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelInfo>, AppError> {
    Ok(Json(state.predictions.model_info()?))
}
