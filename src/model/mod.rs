//! Model construction
//!
//! The engine owns an opaque [`Estimator`] chosen by the configuration's
//! `model_type`. Only `random_forest` ships with the crate; recognizing
//! further names is the intended extension point.

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeNode};
pub use random_forest::RandomForest;

use crate::config::AscensionConfig;
use crate::error::{AscensionError, Result};
use ndarray::{Array1, Array2};

/// An opaque trainable model.
pub trait Estimator: Send {
    /// Fit the model to features and labels
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict one label per feature row
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Serialize the fitted model for persistence
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Stable name of the model kind, recorded in the artifact
    fn kind(&self) -> &'static str;
}

impl std::fmt::Debug for dyn Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator").field("kind", &self.kind()).finish()
    }
}

impl Estimator for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        RandomForest::fit(self, x, y)?;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        RandomForest::predict(self, x)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| AscensionError::Serialization(e.to_string()))
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

/// Map the configured `model_type` to an estimator, applying
/// `model_params`. Unrecognized model names and unrecognized or
/// ill-typed hyperparameters are rejected.
pub fn build_model(config: &AscensionConfig) -> Result<Box<dyn Estimator>> {
    match config.model_type.to_ascii_lowercase().as_str() {
        "random_forest" => {
            let mut forest = RandomForest::new(100).with_random_state(config.random_state);
            for (name, value) in &config.model_params {
                match name.as_str() {
                    "n_estimators" => {
                        forest.n_estimators = param_usize(name, value)?.max(1);
                    }
                    "max_depth" => {
                        forest.max_depth = Some(param_usize(name, value)?);
                    }
                    "min_samples_leaf" => {
                        forest.min_samples_leaf = param_usize(name, value)?.max(1);
                    }
                    "random_state" => {
                        forest.random_state = value.as_u64().ok_or_else(|| {
                            AscensionError::Config(format!(
                                "model parameter '{}' must be a non-negative integer",
                                name
                            ))
                        })?;
                    }
                    other => {
                        return Err(AscensionError::Config(format!(
                            "unknown model parameter '{}' for random_forest",
                            other
                        )))
                    }
                }
            }
            Ok(Box::new(forest))
        }
        other => Err(AscensionError::UnsupportedModel(other.to_string())),
    }
}

fn param_usize(name: &str, value: &crate::config::ParamValue) -> Result<usize> {
    value.as_usize().ok_or_else(|| {
        AscensionError::Config(format!(
            "model parameter '{}' must be a non-negative integer",
            name
        ))
    })
}

/// Fraction of predictions matching the truth labels.
pub fn accuracy(truth: &Array1<f64>, predictions: &Array1<f64>) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predictions.iter())
        .filter(|(t, p)| (**t - **p).abs() < 1e-9)
        .count();
    correct as f64 / truth.len() as f64
}
