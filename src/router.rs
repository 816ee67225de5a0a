use crate::errors::AppError;
use crate::handlers::{self, AppState};
use crate::openapi;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application without rate limiting.
pub fn build_router(state: Arc<AppState>) -> Router {
    assemble(state, prediction_routes())
}

/// Builds the application with per-IP rate limiting on `/predict`.
///
/// Requires the server to be started with connect info so the peer address
/// is available when no forwarding headers are present.
pub fn build_rate_limited_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(replenish_interval_ns(state.config.rate_limit_per_second))
            .burst_size(state.config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
    );

    let protected = prediction_routes().layer(
        ServiceBuilder::new()
            .layer(map_response(rate_limit_as_json))
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    Ok(assemble(state, protected))
}

/// Nanoseconds between replenished requests for a given per-second rate.
pub fn replenish_interval_ns(per_second: u64) -> u64 {
    (1_000_000_000 / per_second.max(1)).max(1)
}

/// Re-renders the limiter's plain-text 429 as the usual `{"error": ...}` body,
/// keeping its retry headers.
async fn rate_limit_as_json(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let (parts, body) = response.into_parts();
    let detail = axum::body::to_bytes(body, 1024)
        .await
        .ok()
        .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| "Too Many Requests".to_string());

    let mut json = AppError::RateLimited(detail).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            json.headers_mut().insert(name.clone(), value.clone());
        }
    }
    json
}

fn prediction_routes() -> Router<Arc<AppState>> {
    Router::new().route("/predict", post(handlers::predict))
}

fn assemble(state: Arc<AppState>, predictions: Router<Arc<AppState>>) -> Router {
    let body_limit = state.config.body_limit_bytes;

    // Liveness, health and docs bypass rate limiting.
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/model", get(handlers::model_info))
        .route("/docs", get(openapi::serve_swagger_ui))
        .route("/api-docs/openapi.json", get(openapi::serve_openapi_spec))
        .merge(predictions)
        .with_state(state)
        // Enforced while the JSON body is buffered, so oversize bodies
        // surface as a JSON 413 whether or not Content-Length is set.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
