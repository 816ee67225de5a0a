/// End-to-end tests against the router, with and without a loaded model.
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use loan_dt_api::config::Config;
use loan_dt_api::handlers::AppState;
use loan_dt_api::model_store::ModelState;
use loan_dt_api::router::{build_rate_limited_router, build_router};
use loan_dt_api::services::PredictionService;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/loan_dt_model.json")
}

/// Helper function to create app state backed by the artifact at `model_path`
fn create_test_state(model_path: PathBuf) -> Arc<AppState> {
    let config = Config {
        model_path: model_path.clone(),
        ..Config::default()
    };
    Arc::new(AppState {
        config,
        predictions: PredictionService::new(Arc::new(ModelState::load(&model_path))),
    })
}

fn ready_app() -> Router {
    build_router(create_test_state(fixture_path()))
}

fn degraded_app() -> Router {
    build_router(create_test_state(PathBuf::from("/nonexistent/loan_dt_model.json")))
}

fn scenario() -> Value {
    json!({
        "gender": 1, "married": 1, "dependents": 0, "education": 0,
        "self_employed": 0, "applicant_income": 5000, "coapplicant_income": 0,
        "loan_amount": 128, "loan_term": 360, "credit_history": 1,
        "property_area": 2
    })
}

fn post_predict(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_root_is_live() {
    let (status, body) = send(ready_app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Decision Tree Loan Prediction API is Live!"})
    );
}

#[tokio::test]
async fn test_root_is_live_when_degraded() {
    let (status, body) = send(degraded_app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Decision Tree Loan Prediction API is Live!");
}

#[tokio::test]
async fn test_predict_scenario_is_approved() {
    let (status, body) = send(ready_app(), post_predict(&scenario())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "Approved", "model_used": "Decision Tree"})
    );
}

#[tokio::test]
async fn test_predict_without_credit_history_is_rejected() {
    let mut input = scenario();
    input["credit_history"] = json!(0.0);
    let (status, body) = send(ready_app(), post_predict(&input)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Rejected");
}

#[tokio::test]
async fn test_predict_when_degraded_returns_error_payload() {
    let (status, body) = send(degraded_app(), post_predict(&scenario())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({"error": "Decision Tree model not loaded on server."})
    );
}

#[tokio::test]
async fn test_predict_missing_field_is_json_error() {
    let mut input = scenario();
    input.as_object_mut().unwrap().remove("loan_term");
    let (status, body) = send(ready_app(), post_predict(&input)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("loan_term"));
}

#[tokio::test]
async fn test_predict_wrong_type_is_json_error() {
    let mut input = scenario();
    input["gender"] = json!("male");
    let (status, body) = send(ready_app(), post_predict(&input)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_predict_without_content_type_is_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(scenario().to_string()))
        .unwrap();
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

fn oversized_body() -> String {
    let padding = "x".repeat(128 * 1024);
    format!(r#"{{"padding": "{}"}}"#, padding)
}

#[tokio::test]
async fn test_oversized_body_rejected_as_json() {
    let body = oversized_body();
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().unwrap().contains("length limit"));
}

#[tokio::test]
async fn test_oversized_body_without_length_header_matches() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(oversized_body()))
        .unwrap();
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_predict_accepts_whole_number_floats_for_integer_fields() {
    let mut input = scenario();
    input["gender"] = json!(1.0);
    input["property_area"] = json!(2.0);
    let (status, body) = send(ready_app(), post_predict(&input)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Approved");
}

#[tokio::test]
async fn test_predict_rejects_fractional_integer_field() {
    let mut input = scenario();
    input["dependents"] = json!(1.5);
    let (status, body) = send(ready_app(), post_predict(&input)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let (status, body) = send(ready_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["service"], "loan-dt-api");

    let (status, body) = send(degraded_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["model_loaded"], false);
}

#[tokio::test]
async fn test_model_info() {
    let (status, body) = send(ready_app(), get("/model")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "Decision Tree");
    assert_eq!(body["node_count"], 7);
    assert_eq!(body["leaf_count"], 4);
    assert_eq!(body["depth"], 3);
    assert_eq!(body["sha256"].as_str().unwrap().len(), 64);
    assert_eq!(body["feature_order"][9], "credit_history");

    let (status, body) = send(degraded_app(), get("/model")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(ready_app(), get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/predict"]["post"].is_object());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "https://loan-frontend.example.com")
        .body(Body::empty())
        .unwrap();
    let response = ready_app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_rate_limit_applies_to_predict_only() {
    let config = Config {
        model_path: fixture_path(),
        rate_limit_per_second: 1,
        rate_limit_burst: 2,
        ..Config::default()
    };
    let state = Arc::new(AppState {
        predictions: PredictionService::new(Arc::new(ModelState::load(&config.model_path))),
        config,
    });
    let app = build_rate_limited_router(state).unwrap();

    let limited = || {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::from(scenario().to_string()))
            .unwrap()
    };

    for _ in 0..2 {
        let response = app.clone().oneshot(limited()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let (status, body) = send(app.clone(), limited()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Too Many Requests"));

    // Liveness is not limited
    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
