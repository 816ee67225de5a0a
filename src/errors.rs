use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

/// Message returned whenever a prediction is requested in degraded mode.
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Decision Tree model not loaded on server.";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The model artifact failed to load at startup.
    ModelUnavailable(String),
    /// The request body could not be decoded into a loan application.
    InvalidInput(String),
    /// The request body exceeded the configured limit.
    PayloadTooLarge(String),
    /// The caller exceeded the rate limit.
    RateLimited(String),
    /// Internal server error.
    InternalError(String),
}

impl AppError {
    pub fn model_unavailable() -> Self {
        AppError::ModelUnavailable(MODEL_UNAVAILABLE_MESSAGE.to_string())
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ModelUnavailable(msg) => write!(f, "Model unavailable: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every variant is rendered as `{"error": "<message>"}` so callers can
    /// always look for the `error` field.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::ModelUnavailable(msg) => {
                tracing::warn!("Prediction requested while model is unavailable");
                msg
            }
            AppError::InvalidInput(msg) => {
                tracing::debug!("Rejected request body: {}", msg);
                msg
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::warn!("Rejected oversized request body: {}", msg);
                msg
            }
            AppError::RateLimited(msg) => {
                tracing::warn!("Rate limit exceeded: {}", msg);
                msg
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Length limit failures surface here when the body is buffered.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::InvalidInput(rejection.body_text())
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// Problems with the model artifact, raised at load time or on a malformed
/// feature vector.
#[derive(Debug)]
pub enum ModelError {
    /// No artifact at the resolved path.
    NotFound(PathBuf),
    /// The artifact exists but could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The artifact is not a valid tree export.
    Decode(serde_json::Error),
    /// The artifact decoded but describes an unusable tree.
    Invalid(String),
    /// A feature vector of the wrong width was passed to the tree.
    FeatureCount { expected: usize, actual: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::NotFound(path) => {
                write!(f, "model artifact not found at {}", path.display())
            }
            ModelError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ModelError::Decode(e) => write!(f, "failed to decode model artifact: {}", e),
            ModelError::Invalid(msg) => write!(f, "invalid model artifact: {}", msg),
            ModelError::FeatureCount { expected, actual } => write!(
                f,
                "expected {} features, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Io { source, .. } => Some(source),
            ModelError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Decode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::model_unavailable().status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::PayloadTooLarge("x".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::RateLimited("x".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_model_unavailable_carries_fixed_message() {
        match AppError::model_unavailable() {
            AppError::ModelUnavailable(msg) => assert_eq!(msg, MODEL_UNAVAILABLE_MESSAGE),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_model_error_display() {
        let err = ModelError::FeatureCount {
            expected: 11,
            actual: 3,
        };
        assert_eq!(err.to_string(), "expected 11 features, got 3");

        let err = ModelError::NotFound(PathBuf::from("/tmp/missing.json"));
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
