//! CART decision tree stored as flat node arrays.
//!
//! The layout mirrors the usual export of a fitted classifier tree: node `i`
//! is a leaf when `children_left[i] == children_right[i] == -1`, otherwise
//! samples go left when `x[feature[i]] <= threshold[i]`. `value[i]` holds the
//! per-class counts seen at the node during training.

use crate::errors::ModelError;
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Class labels, indexed like the rows of `value`.
    pub classes: Vec<i64>,
    pub n_features: usize,
    /// Column names the tree was fitted on, when the exporter recorded them.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    /// Decodes and validates a JSON export.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let tree: DecisionTree = serde_json::from_slice(bytes)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Checks the arrays describe a finite tree that can be walked without
    /// bounds checks failing.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.children_left.len();
        if n == 0 {
            return Err(ModelError::Invalid("tree has no nodes".to_string()));
        }
        if self.classes.is_empty() {
            return Err(ModelError::Invalid("tree has no classes".to_string()));
        }
        for (name, len) in [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
        ] {
            if len != n {
                return Err(ModelError::Invalid(format!(
                    "{} has {} entries, expected {}",
                    name, len, n
                )));
            }
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(ModelError::Invalid(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                )));
            }
        }

        for node in 0..n {
            if self.value[node].len() != self.classes.len() {
                return Err(ModelError::Invalid(format!(
                    "node {} has {} class counts, expected {}",
                    node,
                    self.value[node].len(),
                    self.classes.len()
                )));
            }

            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF && right == LEAF {
                continue;
            }
            // Children always come after their parent, which rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(ModelError::Invalid(format!(
                        "node {} has out of range child {}",
                        node, child
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= self.n_features {
                return Err(ModelError::Invalid(format!(
                    "node {} splits on feature {} of {}",
                    node, feature, self.n_features
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(ModelError::Invalid(format!("node {} has NaN threshold", node)));
            }
        }

        Ok(())
    }

    /// Predicts the class label for one row.
    pub fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let leaf = self.leaf_for(features);
        Ok(self.classes[argmax(&self.value[leaf])])
    }

    fn leaf_for(&self, features: &[f64]) -> usize {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            // Splits were learned on single-precision inputs.
            let x = features[self.feature[node] as usize] as f32 as f64;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == LEAF
    }

    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    pub fn leaf_count(&self) -> usize {
        (0..self.node_count()).filter(|&n| self.is_leaf(n)).count()
    }

    /// Length of the longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if self.is_leaf(node) {
                max_depth = max_depth.max(depth);
            } else {
                stack.push((self.children_left[node] as usize, depth + 1));
                stack.push((self.children_right[node] as usize, depth + 1));
            }
        }
        max_depth
    }
}

/// Index of the largest count; ties go to the lowest index.
fn argmax(counts: &[f64]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate().skip(1) {
        if c > counts[best] {
            best = i;
        }
    }
    best
}
