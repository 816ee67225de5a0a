use crate::decision_tree::DecisionTree;
use crate::errors::ModelError;
use crate::features::{feature_names, FeatureVector, FEATURE_COUNT};
use crate::models::{LoanStatus, ModelInfo, MODEL_NAME};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// File name of the artifact shipped next to the executable.
pub const ARTIFACT_FILE_NAME: &str = "loan_dt_model.json";

/// Default artifact location: alongside the running executable, falling back
/// to the working directory when the executable path can't be resolved.
pub fn default_model_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ARTIFACT_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(ARTIFACT_FILE_NAME))
}

/// A successfully loaded artifact plus what we learned while loading it.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    tree: DecisionTree,
    path: PathBuf,
    sha256: String,
    loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    /// Reads, checksums and validates the artifact at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sha256 = compute_checksum(&bytes);
        let tree = DecisionTree::from_json_slice(&bytes)?;
        Self::from_tree(tree, path.to_path_buf(), sha256)
    }

    /// Wraps an in-memory tree after checking it fits the loan feature layout.
    pub fn from_tree(tree: DecisionTree, path: PathBuf, sha256: String) -> Result<Self, ModelError> {
        tree.validate()?;
        if tree.n_features != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "tree expects {} features, loan applications have {}",
                tree.n_features, FEATURE_COUNT
            )));
        }
        if let Some(names) = &tree.feature_names {
            let expected = feature_names();
            if names != &expected {
                return Err(ModelError::Invalid(format!(
                    "tree was fitted on columns {:?}, expected {:?}",
                    names, expected
                )));
            }
        }

        Ok(Self {
            tree,
            path,
            sha256,
            loaded_at: Utc::now(),
        })
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<LoanStatus, ModelError> {
        let class = self.tree.predict(features.as_slice())?;
        Ok(LoanStatus::from_class(class))
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model: MODEL_NAME.to_string(),
            path: self.path.display().to_string(),
            sha256: self.sha256.clone(),
            loaded_at: self.loaded_at,
            node_count: self.tree.node_count(),
            leaf_count: self.tree.leaf_count(),
            depth: self.tree.depth(),
            classes: self.tree.classes.clone(),
            feature_order: feature_names(),
        }
    }
}

/// Outcome of the one-time startup load.
///
/// Built once before the server starts and shared read-only afterwards.
#[derive(Debug)]
pub enum ModelState {
    Ready(LoadedModel),
    /// The artifact could not be loaded; predictions are refused.
    Degraded { reason: String },
}

impl ModelState {
    /// Loads the artifact, logging the outcome. Never fails: a bad artifact
    /// yields [`ModelState::Degraded`].
    pub fn load(path: &Path) -> Self {
        match LoadedModel::from_path(path) {
            Ok(model) => {
                tracing::info!(
                    path = %path.display(),
                    sha256 = %model.sha256(),
                    nodes = model.tree().node_count(),
                    "✓ Decision Tree model loaded successfully"
                );
                ModelState::Ready(model)
            }
            Err(e) => {
                match &e {
                    ModelError::NotFound(_) => tracing::error!("❌ {}", e),
                    _ => tracing::error!("❌ Failed to load model: {}", e),
                }
                tracing::warn!("Starting in degraded mode; /predict will return errors");
                ModelState::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        match self {
            ModelState::Ready(model) => Some(model),
            ModelState::Degraded { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model().is_some()
    }
}

/// SHA-256 of the artifact bytes, hex encoded.
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
