use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Name reported in every successful prediction.
pub const MODEL_NAME: &str = "Decision Tree";

/// Liveness message served at `GET /`.
pub const LIVE_MESSAGE: &str = "Decision Tree Loan Prediction API is Live!";

// ============ Request Models ============

/// A loan application as submitted by the frontend.
///
/// Categorical fields arrive already label-encoded as integers; the rest are
/// raw numeric values. No range checks are applied. Integer fields also take
/// whole-number floats such as `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "gender": 1, "married": 1, "dependents": 0, "education": 0,
    "self_employed": 0, "applicant_income": 5000.0, "coapplicant_income": 0.0,
    "loan_amount": 128.0, "loan_term": 360.0, "credit_history": 1.0,
    "property_area": 2
}))]
pub struct LoanApplication {
    #[serde(deserialize_with = "integral")]
    pub gender: i64,
    #[serde(deserialize_with = "integral")]
    pub married: i64,
    #[serde(deserialize_with = "integral")]
    pub dependents: i64,
    #[serde(deserialize_with = "integral")]
    pub education: i64,
    #[serde(deserialize_with = "integral")]
    pub self_employed: i64,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term: f64,
    pub credit_history: f64,
    #[serde(deserialize_with = "integral")]
    pub property_area: i64,
}

/// Accepts `3` and `3.0`, rejects `3.5`.
fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(v) => Ok(v),
        Number::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
        Number::Float(f) => Err(D::Error::custom(format!(
            "expected an integer, got {}",
            f
        ))),
    }
}

// ============ Response Models ============

/// Outcome label for a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    Approved,
    Rejected,
}

impl LoanStatus {
    /// Maps the tree's class label: `1` approves, anything else rejects.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            LoanStatus::Approved
        } else {
            LoanStatus::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
        }
    }
}

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    pub status: LoanStatus,
    pub model_used: String,
}

impl PredictionResponse {
    pub fn new(status: LoanStatus) -> Self {
        Self {
            status,
            model_used: MODEL_NAME.to_string(),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiveMessage {
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when the model is loaded, `degraded` otherwise.
    pub status: String,
    pub service: String,
    pub version: String,
    pub model_loaded: bool,
}

/// Metadata about the loaded artifact, served at `GET /model`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelInfo {
    pub model: String,
    pub path: String,
    /// SHA-256 of the artifact bytes, hex encoded.
    pub sha256: String,
    #[schema(value_type = String, format = DateTime)]
    pub loaded_at: DateTime<Utc>,
    pub node_count: usize,
    pub leaf_count: usize,
    pub depth: usize,
    pub classes: Vec<i64>,
    pub feature_order: Vec<String>,
}

/// Error payload shared by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
