//! Ascension - configurable train-and-persist pipeline
//!
//! Loads tabular data from CSV, preprocesses it, builds and trains a
//! model, evaluates it on a holdout split, persists the artifact, and
//! finally invokes a pluggable "ascension" hook whose real logic is
//! deliberately absent from this repository.
//!
//! # Modules
//!
//! - [`config`] - Pipeline configuration with YAML/JSON overlay loading
//! - [`engine`] - Stage orchestration and progress reporting
//! - [`data`] - CSV loading and preprocessing
//! - [`model`] - Estimators and the `model_type` factory
//! - [`soul`] - Memory, emotion and reflection engines with the loop controller
//! - [`crypto`] - XOR obfuscation helpers and proprietary placeholders
//! - [`logging`] - Per-run log file owned by the engine
//! - [`cli`] - Flag parsing and dispatch
//! - [`gui`] - Optional graphical front end (feature `gui`)

pub mod error;

pub mod config;
pub mod crypto;
pub mod data;
pub mod engine;
pub mod logging;
pub mod model;
pub mod soul;

pub mod cli;

#[cfg(feature = "gui")]
pub mod gui;

pub use error::{AscensionError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AscensionConfig, ParamValue};
    pub use crate::data::Dataset;
    pub use crate::engine::{
        AscendHook, AscensionEngine, NoOpAscend, ProgressEvent, RunReport, Stage,
    };
    pub use crate::error::{AscensionError, Result};
    pub use crate::model::{build_model, Estimator, RandomForest};
    pub use crate::soul::{
        EmotionEngine, MemoryEngine, ReflectionEngine, SoulCycle, SoulLoopController,
    };
}
