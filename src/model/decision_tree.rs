//! Decision tree classifier

use crate::error::{AscensionError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with the majority label of its samples
    Leaf { value: f64 },
    /// Internal node with an axis-aligned split
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Depth-limited CART classifier using Gini impurity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum depth; `None` grows until pure
    pub max_depth: Option<usize>,
    /// Minimum samples each leaf must keep
    pub min_samples_leaf: usize,
    n_features: usize,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Create an unfitted tree
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_leaf: 1,
            n_features: 0,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples per leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        if x.nrows() != y.len() {
            return Err(AscensionError::Shape {
                expected: format!("{} labels", x.nrows()),
                actual: format!("{} labels", y.len()),
            });
        }
        if x.nrows() == 0 {
            return Err(AscensionError::Training(
                "cannot fit a tree on zero samples".to_string(),
            ));
        }

        self.n_features = x.ncols();
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.root = Some(self.build(x, y, &indices, 0));
        Ok(self)
    }

    /// Predict one label per row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| AscensionError::Training("tree is not fitted".to_string()))?;
        if x.ncols() != self.n_features {
            return Err(AscensionError::Shape {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let predictions = x
            .rows()
            .into_iter()
            .map(|row| {
                let mut node = root;
                loop {
                    match node {
                        TreeNode::Leaf { value } => break *value,
                        TreeNode::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            node = if row[*feature] <= *threshold { left } else { right };
                        }
                    }
                }
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    fn build(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize], depth: usize) -> TreeNode {
        let labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();

        let depth_reached = self.max_depth.map_or(false, |d| depth >= d);
        if depth_reached || indices.len() < 2 * self.min_samples_leaf || is_pure(&labels) {
            return TreeNode::Leaf {
                value: majority(&labels),
            };
        }

        match self.best_split(x, y, indices) {
            Some((feature, threshold)) => {
                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| x[[i, feature]] <= threshold);
                if left_idx.len() < self.min_samples_leaf || right_idx.len() < self.min_samples_leaf
                {
                    return TreeNode::Leaf {
                        value: majority(&labels),
                    };
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left: Box::new(self.build(x, y, &left_idx, depth + 1)),
                    right: Box::new(self.build(x, y, &right_idx, depth + 1)),
                }
            }
            None => TreeNode::Leaf {
                value: majority(&labels),
            },
        }
    }

    fn best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Option<(usize, f64)> {
        let parent_labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let parent_gini = gini(&parent_labels);
        let n = indices.len() as f64;

        let mut best: Option<(usize, f64)> = None;
        let mut best_gain = 1e-12;

        for feature in 0..x.ncols() {
            let mut values: Vec<f64> = indices.iter().map(|&i| x[[i, feature]]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let mut left = Vec::new();
                let mut right = Vec::new();
                for &i in indices {
                    if x[[i, feature]] <= threshold {
                        left.push(y[i]);
                    } else {
                        right.push(y[i]);
                    }
                }
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let weighted = (left.len() as f64 / n) * gini(&left)
                    + (right.len() as f64 / n) * gini(&right);
                let gain = parent_gini - weighted;
                if gain > best_gain {
                    best_gain = gain;
                    best = Some((feature, threshold));
                }
            }
        }

        best
    }
}

fn is_pure(labels: &[f64]) -> bool {
    labels
        .windows(2)
        .all(|w| w[0].to_bits() == w[1].to_bits())
}

fn gini(labels: &[f64]) -> f64 {
    let n = labels.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.to_bits()).or_insert(0) += 1;
    }
    1.0 - counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

fn majority(labels: &[f64]) -> f64 {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.to_bits()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(bits, _)| f64::from_bits(bits))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fits_separable_data() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut tree = DecisionTree::new().with_max_depth(3);
        tree.fit(&x, &y).unwrap();

        let preds = tree.predict(&x).unwrap();
        assert_eq!(preds, y);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let tree = DecisionTree::new();
        let x = array![[1.0, 2.0]];
        assert!(tree.predict(&x).is_err());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0];
        let mut tree = DecisionTree::new();
        assert!(matches!(
            tree.fit(&x, &y),
            Err(AscensionError::Shape { .. })
        ));
    }

    #[test]
    fn test_pure_labels_give_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 1.0, 1.0];
        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();
        let preds = tree.predict(&array![[100.0]]).unwrap();
        assert_eq!(preds[0], 1.0);
    }
}
