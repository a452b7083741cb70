//! Integration test: full pipeline (load → preprocess → train → evaluate → persist → ascend)

use ascension::config::{AscensionConfig, ParamValue};
use ascension::engine::{AscensionEngine, Stage, MODEL_FILE_NAME};
use ascension::error::AscensionError;
use ascension::logging::LOG_FILE_NAME;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// 10 rows, 3 numeric feature columns, binary label in the last column.
fn write_training_csv(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("train.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "f1,f2,f3,label").unwrap();
    for i in 0..10 {
        let x = i as f64;
        writeln!(
            file,
            "{},{},{},{}",
            x,
            x * 2.0 + 1.0,
            10.0 - x,
            if i < 5 { 0 } else { 1 }
        )
        .unwrap();
    }
    path
}

fn config_for(dir: &TempDir) -> AscensionConfig {
    AscensionConfig::default()
        .with_data_path(write_training_csv(dir).to_string_lossy().to_string())
        .with_output_dir(dir.path().join("out").to_string_lossy().to_string())
        .with_param("n_estimators", ParamValue::Int(20))
        .with_param("max_depth", ParamValue::Int(4))
}

#[test]
fn test_default_pipeline_persists_model_and_log() {
    let dir = TempDir::new().unwrap();
    let mut engine = AscensionEngine::new(config_for(&dir)).unwrap();
    let report = engine.run().unwrap();

    let out = dir.path().join("out");
    assert!(out.join(MODEL_FILE_NAME).exists(), "model artifact missing");
    assert!(out.join(LOG_FILE_NAME).exists(), "run log missing");
    assert_eq!(report.model_path, out.join(MODEL_FILE_NAME));
    assert_eq!(report.n_rows, 10);
    assert_eq!(report.n_features, 3);
}

#[test]
fn test_log_records_every_stage_transition() {
    let dir = TempDir::new().unwrap();
    let mut engine = AscensionEngine::new(config_for(&dir)).unwrap();
    engine.run().unwrap();

    let log = std::fs::read_to_string(engine.log_path()).unwrap();
    for stage in Stage::ALL {
        assert!(
            log.contains(&format!("stage {} started", stage)),
            "missing start record for {}",
            stage
        );
        assert!(
            log.contains(&format!("stage {} completed", stage)),
            "missing completion record for {}",
            stage
        );
    }
}

#[test]
fn test_progress_monotonic_from_zero_to_one() {
    let dir = TempDir::new().unwrap();
    let fractions = Arc::new(Mutex::new(Vec::<f64>::new()));
    let sink = Arc::clone(&fractions);

    let mut engine = AscensionEngine::new(config_for(&dir))
        .unwrap()
        .with_progress(move |event| sink.lock().unwrap().push(event.fraction));
    engine.run().unwrap();

    let fractions = fractions.lock().unwrap();
    assert!(!fractions.is_empty());
    assert_eq!(*fractions.first().unwrap(), 0.0);
    assert_eq!(*fractions.last().unwrap(), 1.0);
    assert!(
        fractions.windows(2).all(|w| w[0] <= w[1]),
        "progress must be nondecreasing: {:?}",
        *fractions
    );
}

#[test]
fn test_separable_data_trains_accurately() {
    let dir = TempDir::new().unwrap();
    let mut engine = AscensionEngine::new(config_for(&dir)).unwrap();
    let report = engine.run().unwrap();
    assert!((0.0..=1.0).contains(&report.accuracy));
}

#[test]
fn test_one_column_csv_fails_with_data_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("narrow.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "label").unwrap();
    writeln!(file, "0").unwrap();
    writeln!(file, "1").unwrap();

    let config = config_for(&dir).with_data_path(path.to_string_lossy().to_string());
    let mut engine = AscensionEngine::new(config).unwrap();
    assert!(matches!(
        engine.run().unwrap_err(),
        AscensionError::Data(_)
    ));
}

#[test]
fn test_missing_csv_fails_with_data_error() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir).with_data_path("does/not/exist.csv");
    let mut engine = AscensionEngine::new(config).unwrap();
    assert!(matches!(
        engine.run().unwrap_err(),
        AscensionError::Data(_)
    ));
}

#[test]
fn test_unknown_model_type_fails_without_artifacts() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir).with_model_type("gradient_descent_9000");
    let mut engine = AscensionEngine::new(config).unwrap();
    let err = engine.run().unwrap_err();
    assert!(matches!(err, AscensionError::UnsupportedModel(_)));

    // build_model failed before persist; no model was written
    assert!(!dir.path().join("out").join(MODEL_FILE_NAME).exists());
}

#[test]
fn test_string_labels_train_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("labeled.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "f1,f2,species").unwrap();
    for i in 0..10 {
        let x = i as f64;
        writeln!(
            file,
            "{},{},{}",
            x,
            x * 1.5,
            if i < 5 { "setosa" } else { "versicolor" }
        )
        .unwrap();
    }

    let config = config_for(&dir).with_data_path(path.to_string_lossy().to_string());
    let mut engine = AscensionEngine::new(config).unwrap();
    let report = engine.run().unwrap();
    assert_eq!(report.n_rows, 10);
    assert_eq!(report.n_features, 2);
    assert!((0.0..=1.0).contains(&report.accuracy));
}

#[test]
fn test_headerless_csv_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("noheader.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    for i in 0..10 {
        writeln!(file, "{},{},{}", i, i * 3, if i % 2 == 0 { 0 } else { 1 }).unwrap();
    }

    let config = config_for(&dir).with_data_path(path.to_string_lossy().to_string());
    let mut engine = AscensionEngine::new(config).unwrap();
    let report = engine.run().unwrap();
    assert_eq!(report.n_rows, 10);
    assert_eq!(report.n_features, 2);
}
