//! Random Forest classifier

use super::decision_tree::DecisionTree;
use crate::error::{AscensionError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bootstrap-aggregated ensemble of decision trees with majority voting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples each leaf must keep
    pub min_samples_leaf: usize,
    /// Seed for bootstrap sampling
    pub random_state: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    /// Create an unfitted forest with `n_estimators` trees
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators: n_estimators.max(1),
            max_depth: Some(8),
            min_samples_leaf: 1,
            random_state: 42,
        }
    }

    /// Set maximum depth per tree
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples per leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Set the sampling seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Whether the forest has been fitted
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Fit the forest on bootstrap resamples of the training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(AscensionError::Shape {
                expected: format!("{} labels", n_samples),
                actual: format!("{} labels", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(AscensionError::Training(
                "cannot fit a forest on zero samples".to_string(),
            ));
        }

        let base_seed = self.random_state;
        let trees: Result<Vec<DecisionTree>> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));

                let sample_indices: Vec<usize> = (0..n_samples)
                    .map(|_| (rng.next_u64() as usize) % n_samples)
                    .collect();

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = DecisionTree::new().with_min_samples_leaf(self.min_samples_leaf);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }
                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        Ok(self)
    }

    /// Predict by majority vote across all trees
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(AscensionError::Training(
                "forest is not fitted".to_string(),
            ));
        }

        let per_tree: Result<Vec<Array1<f64>>> =
            self.trees.par_iter().map(|tree| tree.predict(x)).collect();
        let per_tree = per_tree?;

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| {
                let mut votes: HashMap<u64, usize> = HashMap::new();
                for preds in &per_tree {
                    *votes.entry(preds[i].to_bits()).or_insert(0) += 1;
                }
                votes
                    .into_iter()
                    .max_by_key(|&(_, count)| count)
                    .map(|(bits, _)| f64::from_bits(bits))
                    .unwrap_or(0.0)
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}
