use crate::errors::AppError;
use crate::features::FeatureVector;
use crate::model_store::ModelState;
use crate::models::{LiveMessage, LoanApplication, ModelInfo, PredictionResponse, LIVE_MESSAGE};
use std::sync::Arc;

/// Loan prediction over the shared, read-only model.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: Arc<ModelState>,
}

impl PredictionService {
    pub fn new(model: Arc<ModelState>) -> Self {
        Self { model }
    }

    /// Classifies one application.
    ///
    /// Returns [`AppError::ModelUnavailable`] when running in degraded mode.
    pub fn predict(&self, application: &LoanApplication) -> Result<PredictionResponse, AppError> {
        let model = self.model.model().ok_or_else(AppError::model_unavailable)?;

        let features = FeatureVector::from_application(application);
        let status = model.predict(&features)?;

        tracing::debug!("Features {:?} -> {}", features.as_slice(), status.as_str());
        Ok(PredictionResponse::new(status))
    }

    /// Static liveness message; independent of model state.
    pub fn health(&self) -> LiveMessage {
        LiveMessage {
            message: LIVE_MESSAGE.to_string(),
        }
    }

    pub fn model_info(&self) -> Result<ModelInfo, AppError> {
        self.model
            .model()
            .map(|m| m.info())
            .ok_or_else(AppError::model_unavailable)
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_loaded()
    }
}
