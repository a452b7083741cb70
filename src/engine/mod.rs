//! Pipeline engine
//!
//! [`AscensionEngine`] orchestrates the fixed stage sequence
//! load → preprocess → build model → train → evaluate → persist → ascend.
//! Each stage reports progress to an optional observer before and after it
//! executes, and every transition is recorded in the run log. A failure in
//! any stage aborts the rest and surfaces that stage's error; artifacts
//! already written stay on disk.
//!
//! The engine is not reentrant: one run at a time, driven to completion or
//! failure with no cancellation.

use crate::config::AscensionConfig;
use crate::data::{self, Dataset};
use crate::error::{AscensionError, Result};
use crate::logging::RunLog;
use crate::model::{self, Estimator};
use ndarray::s;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the serialized model artifact under `output_dir`.
pub const MODEL_FILE_NAME: &str = "model.bin";

/// The fixed pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadData,
    Preprocess,
    BuildModel,
    Train,
    Evaluate,
    Persist,
    Ascend,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::LoadData,
        Stage::Preprocess,
        Stage::BuildModel,
        Stage::Train,
        Stage::Evaluate,
        Stage::Persist,
        Stage::Ascend,
    ];

    /// Stable label used in logs and progress events.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::LoadData => "load_data",
            Stage::Preprocess => "preprocess",
            Stage::BuildModel => "build_model",
            Stage::Train => "train",
            Stage::Evaluate => "evaluate",
            Stage::Persist => "persist",
            Stage::Ascend => "ascend",
        }
    }

    fn index(&self) -> usize {
        Stage::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ephemeral progress notification emitted by the engine.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Stage the event belongs to
    pub stage: Stage,
    /// Overall completion in `0.0..=1.0`, nondecreasing across a run
    pub fraction: f64,
    /// Human-readable status line
    pub message: String,
}

/// Observer callback for progress events.
pub type ProgressFn = Box<dyn Fn(&ProgressEvent) + Send>;

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Validation accuracy; informational, never gates success
    pub accuracy: f64,
    /// Where the model artifact was written
    pub model_path: PathBuf,
    /// Rows remaining after preprocessing
    pub n_rows: usize,
    /// Feature columns
    pub n_features: usize,
}

/// Post-training extension point invoked as the final pipeline stage.
///
/// The default implementation does nothing; the real logic is deliberately
/// absent from this repository and is meant to be supplied locally. Hooks
/// run as a side effect only and do not alter pipeline outputs.
pub trait AscendHook: Send {
    fn ascend(&self, report: &RunReport, log: &RunLog) -> Result<()>;
}

/// Default hook: records that the placeholder was called and does nothing.
pub struct NoOpAscend;

impl AscendHook for NoOpAscend {
    fn ascend(&self, _report: &RunReport, log: &RunLog) -> Result<()> {
        log.record("executing proprietary ascension logic (placeholder)");
        Ok(())
    }
}

/// Serialized model envelope written to `output_dir/model.bin`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Model kind, as reported by the estimator
    pub model_type: String,
    /// Feature count the model was trained on
    pub n_features: usize,
    /// Estimator payload (bincode)
    pub payload: Vec<u8>,
}

/// Orchestrates one pipeline run.
pub struct AscensionEngine {
    config: AscensionConfig,
    log: RunLog,
    progress: Option<ProgressFn>,
    hook: Box<dyn AscendHook>,
}

impl AscensionEngine {
    /// Create an engine for `config`, opening the run log under
    /// `output_dir` (created if absent).
    pub fn new(config: AscensionConfig) -> Result<Self> {
        let log = RunLog::create(&config.output_dir).map_err(|e| {
            AscensionError::Persistence(format!(
                "cannot open run log under {}: {}",
                config.output_dir, e
            ))
        })?;
        Ok(Self {
            config,
            log,
            progress: None,
            hook: Box::new(NoOpAscend),
        })
    }

    /// Attach a progress observer.
    pub fn with_progress(mut self, f: impl Fn(&ProgressEvent) + Send + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Replace the ascend hook.
    pub fn with_hook(mut self, hook: impl AscendHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &AscensionConfig {
        &self.config
    }

    /// Path of the run log file.
    pub fn log_path(&self) -> &std::path::Path {
        self.log.path()
    }

    /// Execute the full pipeline and return the run summary.
    pub fn run(&mut self) -> Result<RunReport> {
        self.log.record("starting ascension pipeline");

        let df = self.stage(Stage::LoadData, |eng| {
            let df = data::load_csv(&eng.config.data_path)?;
            eng.log.record(&format!(
                "loaded {} rows and {} columns from {}",
                df.height(),
                df.width(),
                eng.config.data_path
            ));
            Ok(df)
        })?;

        let dataset = self.stage(Stage::Preprocess, |eng| {
            let ds = data::preprocess(&df)?;
            eng.log.record(&format!(
                "extracted {} samples with {} features",
                ds.n_rows(),
                ds.n_features()
            ));
            Ok(ds)
        })?;

        let mut estimator = self.stage(Stage::BuildModel, |eng| {
            eng.log
                .record(&format!("building model type: {}", eng.config.model_type));
            model::build_model(&eng.config)
        })?;

        let split = self.stage(Stage::Train, |eng| {
            let split = eng.train(estimator.as_mut(), &dataset)?;
            Ok(split)
        })?;

        let accuracy = self.stage(Stage::Evaluate, |eng| {
            let (x_val, y_val) = &split;
            let predictions = estimator
                .predict(x_val)
                .map_err(|e| AscensionError::Training(e.to_string()))?;
            let accuracy = model::accuracy(y_val, &predictions);
            eng.log
                .record(&format!("validation accuracy: {:.4}", accuracy));
            Ok(accuracy)
        })?;

        let model_path = self.stage(Stage::Persist, |eng| {
            eng.persist(estimator.as_ref(), dataset.n_features())
        })?;

        let report = RunReport {
            accuracy,
            model_path,
            n_rows: dataset.n_rows(),
            n_features: dataset.n_features(),
        };

        self.stage(Stage::Ascend, |eng| eng.hook.ascend(&report, &eng.log))?;

        self.log.record("ascension pipeline completed");
        Ok(report)
    }

    /// Run one stage with progress bracketing: an event before at the
    /// stage's start fraction, an event after at its end fraction.
    fn stage<T>(
        &mut self,
        stage: Stage,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let n = Stage::ALL.len() as f64;
        let start = stage.index() as f64 / n;
        let end = (stage.index() + 1) as f64 / n;

        self.emit(stage, start, &format!("stage {} started", stage));
        let result = body(self);
        match &result {
            Ok(_) => self.emit(stage, end, &format!("stage {} completed", stage)),
            Err(e) => self.emit(stage, start, &format!("stage {} failed: {}", stage, e)),
        }
        result
    }

    fn emit(&self, stage: Stage, fraction: f64, message: &str) {
        self.log.record(message);
        if let Some(progress) = &self.progress {
            progress(&ProgressEvent {
                stage,
                fraction,
                message: message.to_string(),
            });
        }
    }

    /// Fit the estimator on a holdout split and return the validation
    /// features and labels for the evaluate stage. Falls back to the
    /// training rows when the configured split leaves no holdout.
    fn train(
        &self,
        estimator: &mut dyn Estimator,
        dataset: &Dataset,
    ) -> Result<(ndarray::Array2<f64>, ndarray::Array1<f64>)> {
        let n = dataset.n_rows();
        let split = self.config.validation_split.clamp(0.0, 0.9);
        let val_size = (n as f64 * split) as usize;
        let train_size = n - val_size;
        if train_size == 0 {
            return Err(AscensionError::Training(format!(
                "validation split {} leaves no training rows out of {}",
                split, n
            )));
        }

        let x_train = dataset.features.slice(s![..train_size, ..]).to_owned();
        let y_train = dataset.labels.slice(s![..train_size]).to_owned();

        self.log.record(&format!(
            "training on {} samples, validating on {}",
            train_size, val_size
        ));

        estimator
            .fit(&x_train, &y_train)
            .map_err(|e| AscensionError::Training(e.to_string()))?;

        if val_size == 0 {
            return Ok((x_train, y_train));
        }
        let x_val = dataset.features.slice(s![train_size.., ..]).to_owned();
        let y_val = dataset.labels.slice(s![train_size..]).to_owned();
        Ok((x_val, y_val))
    }

    fn persist(&self, estimator: &dyn Estimator, n_features: usize) -> Result<PathBuf> {
        let out_dir = PathBuf::from(&self.config.output_dir);
        std::fs::create_dir_all(&out_dir)
            .map_err(|e| AscensionError::Persistence(e.to_string()))?;

        let artifact = ModelArtifact {
            model_type: estimator.kind().to_string(),
            n_features,
            payload: estimator.to_bytes()?,
        };
        let bytes = bincode::serialize(&artifact)
            .map_err(|e| AscensionError::Serialization(e.to_string()))?;

        let model_path = out_dir.join(MODEL_FILE_NAME);
        std::fs::write(&model_path, bytes)
            .map_err(|e| AscensionError::Persistence(e.to_string()))?;

        self.log
            .record(&format!("saved model to {}", model_path.display()));
        Ok(model_path)
    }
}
