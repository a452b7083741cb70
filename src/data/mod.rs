//! Data loading and preprocessing
//!
//! Input is a CSV whose last column holds the label and whose remaining
//! columns are numeric features. The header row is optional: the loader
//! sniffs the first line and treats it as data when every field parses
//! as a number.

use crate::error::{AscensionError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// In-memory table ready for training: numeric features plus one label
/// per row.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix, one row per sample.
    pub features: Array2<f64>,
    /// Label vector, aligned with `features` rows.
    pub labels: Array1<f64>,
}

impl Dataset {
    /// Number of samples.
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Peek at the first line to decide whether the file starts with a header.
/// A line whose every field parses as a number is data, not a header.
fn sniff_header(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|e| {
        AscensionError::Data(format!("data file not found: {}: {}", path.display(), e))
    })?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line)?;
    let line = first_line.trim();
    if line.is_empty() {
        return Err(AscensionError::Data(format!(
            "data file is empty: {}",
            path.display()
        )));
    }
    let all_numeric = line
        .split(',')
        .all(|field| field.trim().parse::<f64>().is_ok());
    Ok(!all_numeric)
}

/// Load the training CSV at `path`.
///
/// Fails with a data error when the file is missing, empty, or has fewer
/// than two columns (a usable table needs at least one feature and the
/// label).
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AscensionError::Data(format!(
            "data file not found: {}",
            path.display()
        )));
    }

    let has_header = sniff_header(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(has_header)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    if df.height() == 0 {
        return Err(AscensionError::Data(format!(
            "data file has no rows: {}",
            path.display()
        )));
    }
    if df.width() < 2 {
        return Err(AscensionError::Data(format!(
            "need at least one feature column and a label column, got {} column(s)",
            df.width()
        )));
    }

    Ok(df)
}

/// Cast one column to f64, preserving nulls.
fn numeric_column(col: &Column) -> Result<Vec<Option<f64>>> {
    let series = col
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| {
            AscensionError::Data(format!("column '{}' is not numeric: {}", col.name(), e))
        })?;
    let ca = series
        .f64()
        .map_err(|e| AscensionError::Data(e.to_string()))?;
    Ok(ca.into_iter().collect())
}

/// Encode the label column. Numeric labels pass through; a string column
/// is mapped to class indices in sorted class order.
fn label_column(col: &Column) -> Result<Vec<Option<f64>>> {
    if col.dtype() != &DataType::String {
        return numeric_column(col);
    }

    let series = col.as_materialized_series();
    let ca = series
        .str()
        .map_err(|e| AscensionError::Data(e.to_string()))?;
    let raw: Vec<Option<&str>> = ca.into_iter().collect();

    let classes: std::collections::BTreeSet<&str> = raw.iter().flatten().copied().collect();
    let index: std::collections::BTreeMap<&str, f64> = classes
        .iter()
        .enumerate()
        .map(|(i, &class)| (class, i as f64))
        .collect();

    Ok(raw.into_iter().map(|v| v.map(|s| index[s])).collect())
}

/// Turn a raw frame into a [`Dataset`]: cast feature columns to f64, drop
/// rows containing missing or non-numeric values, and split off the last
/// column as the label vector. String labels are encoded as class
/// indices; string feature columns are rejected.
pub fn preprocess(df: &DataFrame) -> Result<Dataset> {
    let n_cols = df.width();
    if n_cols < 2 {
        return Err(AscensionError::Data(format!(
            "need at least one feature column and a label column, got {} column(s)",
            n_cols
        )));
    }

    // Column-major f64 view with nulls preserved; non-numeric values
    // become nulls through the cast and drop out with their row.
    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(n_cols);
    let all = df.get_columns();
    for col in &all[..n_cols - 1] {
        columns.push(numeric_column(col)?);
    }
    columns.push(label_column(&all[n_cols - 1])?);

    let n_rows = df.height();
    let keep: Vec<usize> = (0..n_rows)
        .filter(|&i| columns.iter().all(|c| c[i].is_some()))
        .collect();

    if keep.is_empty() {
        return Err(AscensionError::Data(
            "no complete numeric rows remain after cleaning".to_string(),
        ));
    }

    let n_features = n_cols - 1;
    let mut features = Vec::with_capacity(keep.len() * n_features);
    let mut labels = Vec::with_capacity(keep.len());
    for &i in &keep {
        for col in &columns[..n_features] {
            features.push(col[i].unwrap_or_default());
        }
        labels.push(columns[n_features][i].unwrap_or_default());
    }

    let features = Array2::from_shape_vec((keep.len(), n_features), features)
        .map_err(|e| AscensionError::Shape {
            expected: format!("({}, {})", keep.len(), n_features),
            actual: e.to_string(),
        })?;

    Ok(Dataset {
        features,
        labels: Array1::from_vec(labels),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv_with_header() {
        let file = csv_file("a,b,label\n1,2,0\n3,4,1\n");
        let df = load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_load_csv_without_header() {
        let file = csv_file("1,2,0\n3,4,1\n5,6,0\n");
        let df = load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_missing_file_is_data_error() {
        let err = load_csv("no/such/data.csv").unwrap_err();
        assert!(matches!(err, AscensionError::Data(_)));
    }

    #[test]
    fn test_empty_file_is_data_error() {
        let file = csv_file("");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, AscensionError::Data(_)));
    }

    #[test]
    fn test_single_column_is_data_error() {
        let file = csv_file("label\n1\n0\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, AscensionError::Data(_)));
    }

    #[test]
    fn test_preprocess_splits_features_and_labels() {
        let file = csv_file("a,b,label\n1,2,0\n3,4,1\n5,6,1\n");
        let df = load_csv(file.path()).unwrap();
        let ds = preprocess(&df).unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.features[[1, 0]], 3.0);
        assert_eq!(ds.labels[2], 1.0);
    }

    #[test]
    fn test_preprocess_encodes_string_labels_as_class_indices() {
        let file = csv_file("a,b,label\n1,2,yes\n3,4,no\n5,6,yes\n");
        let df = load_csv(file.path()).unwrap();
        let ds = preprocess(&df).unwrap();
        // classes sorted: no -> 0, yes -> 1
        assert_eq!(ds.labels.to_vec(), vec![1.0, 0.0, 1.0]);
        assert_eq!(ds.n_features(), 2);
    }

    #[test]
    fn test_preprocess_rejects_string_feature_column() {
        let file = csv_file("a,b,label\nred,2,0\nblue,4,1\n");
        let df = load_csv(file.path()).unwrap();
        let err = preprocess(&df).unwrap_err();
        assert!(matches!(err, AscensionError::Data(_)));
    }

    #[test]
    fn test_preprocess_drops_incomplete_rows() {
        let file = csv_file("a,b,label\n1,2,0\n,4,1\n5,6,1\n");
        let df = load_csv(file.path()).unwrap();
        let ds = preprocess(&df).unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.labels.len(), 2);
    }
}
