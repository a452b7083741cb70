//! Pipeline configuration
//!
//! [`AscensionConfig`] carries everything a run needs: where the data lives,
//! which model to build, the hyperparameters to pass to it, and where
//! artifacts go. Every field has a default so the pipeline runs with zero
//! configuration. A YAML or JSON file can overlay individual keys on top of
//! the defaults; the config is never mutated after loading.

use crate::error::{AscensionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A scalar hyperparameter value as it appears in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer parameter (e.g. `n_estimators`)
    Int(i64),
    /// Floating point parameter (e.g. `learning_rate`)
    Float(f64),
    /// String parameter
    Str(String),
}

impl ParamValue {
    /// Interpret the value as a usize, if it is a non-negative integer.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ParamValue::Int(v) if *v >= 0 => Some(*v as usize),
            _ => None,
        }
    }

    /// Interpret the value as a u64, if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParamValue::Int(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    /// Interpret the value as a float. Integers widen losslessly enough
    /// for hyperparameter use.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// Configuration for one ascension run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AscensionConfig {
    /// Path to the training CSV. Last column is the label.
    pub data_path: String,

    /// Model to build. Only `random_forest` is recognized out of the box.
    pub model_type: String,

    /// Hyperparameters forwarded to the model constructor.
    pub model_params: BTreeMap<String, ParamValue>,

    /// Directory for artifacts (trained model, run log). Created if absent.
    pub output_dir: String,

    /// Whether to launch the graphical front end.
    pub gui: bool,

    /// Fraction of rows held out for validation.
    pub validation_split: f64,

    /// Seed for reproducible splits and model fitting.
    pub random_state: u64,
}

impl Default for AscensionConfig {
    fn default() -> Self {
        Self {
            data_path: "data/train.csv".to_string(),
            model_type: "random_forest".to_string(),
            model_params: BTreeMap::new(),
            output_dir: "output".to_string(),
            gui: false,
            validation_split: 0.2,
            random_state: 42,
        }
    }
}

/// Overlay parsed from a config file. Absent keys keep their defaults;
/// unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    data_path: Option<String>,
    model_type: Option<String>,
    model_params: Option<BTreeMap<String, ParamValue>>,
    output_dir: Option<String>,
    gui: Option<bool>,
    validation_split: Option<f64>,
    random_state: Option<u64>,
}

impl AscensionConfig {
    /// Load configuration from a YAML or JSON file, chosen by extension,
    /// overlaying supplied keys onto the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AscensionError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let overlay: ConfigOverlay = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)
                .map_err(|e| AscensionError::Config(format!("{}: {}", path.display(), e)))?,
            "json" => serde_json::from_str(&text)
                .map_err(|e| AscensionError::Config(format!("{}: {}", path.display(), e)))?,
            other => {
                return Err(AscensionError::Config(format!(
                    "unsupported config format '{}' (expected .yaml, .yml or .json)",
                    other
                )))
            }
        };

        Ok(Self::default().merged(overlay))
    }

    fn merged(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(v) = overlay.data_path {
            self.data_path = v;
        }
        if let Some(v) = overlay.model_type {
            self.model_type = v;
        }
        if let Some(v) = overlay.model_params {
            self.model_params = v;
        }
        if let Some(v) = overlay.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = overlay.gui {
            self.gui = v;
        }
        if let Some(v) = overlay.validation_split {
            self.validation_split = v;
        }
        if let Some(v) = overlay.random_state {
            self.random_state = v;
        }
        self
    }

    /// Builder method to set the data path
    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Builder method to set the model type
    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = model_type.into();
        self
    }

    /// Builder method to set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder method to set one hyperparameter
    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.model_params.insert(name.into(), value);
        self
    }
}
