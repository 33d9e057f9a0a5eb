//! Bagged decision-tree classifier
//!
//! A small CART ensemble used as the serialized estimator behind every
//! category. Trees are grown on bootstrap resamples with a random feature
//! subset per split, Gini impurity weighted by balanced class weights, and
//! bounded depth and split/leaf sizes. Per-tree RNGs are derived from a fixed
//! seed, so a fit is fully determined by its input data.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{PredictError, TrainError};

/// Hyperparameters for forest fitting
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        /// Class distribution at the leaf, weighted by class weights
        proba: [f64; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Walk the tree from the root (index 0) to a leaf distribution
    fn proba(&self, row: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// A binary classifier over fixed-width feature vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit a forest on `x` (rows of equal width) and binary labels `y`
    pub fn fit(config: &ForestConfig, x: &[Vec<f64>], y: &[u8]) -> Result<Self, TrainError> {
        if x.is_empty() || x.len() != y.len() || config.n_trees == 0 {
            return Err(TrainError::BadTrainingData);
        }
        let n_features = x[0].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(TrainError::BadTrainingData);
        }
        if y.iter().any(|&label| label > 1) {
            return Err(TrainError::BadTrainingData);
        }

        let n = x.len();
        let positives = y.iter().filter(|&&label| label == 1).count();
        let negatives = n - positives;
        if positives == 0 || negatives == 0 {
            return Err(TrainError::SingleClass);
        }

        // Balanced class weights: n / (n_classes * count)
        let class_weights = [
            n as f64 / (2.0 * negatives as f64),
            n as f64 / (2.0 * positives as f64),
        ];
        let features_per_split = ((n_features as f64).sqrt().ceil() as usize).max(1);

        let mut trees = Vec::with_capacity(config.n_trees);
        for tree_idx in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_idx as u64));
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut builder = TreeBuilder {
                x,
                y,
                class_weights,
                config,
                features_per_split,
                nodes: Vec::new(),
            };
            builder.grow(&sample, 0, &mut rng);
            trees.push(DecisionTree {
                nodes: builder.nodes,
            });
        }

        Ok(Self { trees, n_features })
    }

    /// Number of features this model was trained on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predict the class label for a single row
    pub fn predict(&self, row: &[f64]) -> Result<u8, PredictError> {
        let proba = self.predict_proba(row)?;
        Ok(u8::from(proba[1] > proba[0]))
    }

    /// Per-class probabilities for a single row (mean of tree leaf
    /// distributions; index 1 is the positive class)
    pub fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], PredictError> {
        if row.len() != self.n_features {
            return Err(PredictError::FeatureCount {
                got: row.len(),
                expected: self.n_features,
            });
        }
        let mut acc = [0.0f64; 2];
        for tree in &self.trees {
            let proba = tree.proba(row);
            acc[0] += proba[0];
            acc[1] += proba[1];
        }
        let count = self.trees.len() as f64;
        Ok([acc[0] / count, acc[1] / count])
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [u8],
    class_weights: [f64; 2],
    config: &'a ForestConfig,
    features_per_split: usize,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow a subtree over `indices`, returning its node index
    fn grow(&mut self, indices: &[usize], depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.weighted_counts(indices);
        let is_pure = counts[0] == 0.0 || counts[1] == 0.0;
        if is_pure
            || depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
        {
            return self.push_leaf(counts);
        }

        match self.best_split(indices, rng) {
            None => self.push_leaf(counts),
            Some((feature, threshold)) => {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .copied()
                    .partition(|&i| self.x[i][feature] <= threshold);

                // Reserve the slot so children get stable indices below it
                let slot = self.nodes.len();
                self.nodes.push(Node::Leaf { proba: [0.0, 0.0] });
                let left = self.grow(&left_rows, depth + 1, rng);
                let right = self.grow(&right_rows, depth + 1, rng);
                self.nodes[slot] = Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                };
                slot
            }
        }
    }

    fn push_leaf(&mut self, counts: [f64; 2]) -> usize {
        let total = counts[0] + counts[1];
        let proba = if total > 0.0 {
            [counts[0] / total, counts[1] / total]
        } else {
            [0.5, 0.5]
        };
        self.nodes.push(Node::Leaf { proba });
        self.nodes.len() - 1
    }

    fn weighted_counts(&self, indices: &[usize]) -> [f64; 2] {
        let mut counts = [0.0f64; 2];
        for &i in indices {
            let class = self.y[i] as usize;
            counts[class] += self.class_weights[class];
        }
        counts
    }

    /// Scan a random feature subset for the lowest-impurity midpoint split
    fn best_split(&self, indices: &[usize], rng: &mut StdRng) -> Option<(usize, f64)> {
        let n_features = self.x[0].len();
        let k = self.features_per_split.min(n_features);
        let min_leaf = self.config.min_samples_leaf;

        let mut best: Option<(f64, usize, f64)> = None;
        for feature in index::sample(rng, n_features, k).iter() {
            let mut column: Vec<(f64, u8)> = indices
                .iter()
                .map(|&i| (self.x[i][feature], self.y[i]))
                .collect();
            column.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let total = self.weighted_counts(indices);
            let mut left = [0.0f64; 2];
            for i in 1..column.len() {
                let (prev_value, prev_label) = column[i - 1];
                left[prev_label as usize] += self.class_weights[prev_label as usize];

                let value = column[i].0;
                if value <= prev_value {
                    continue;
                }
                if i < min_leaf || column.len() - i < min_leaf {
                    continue;
                }

                let right = [total[0] - left[0], total[1] - left[1]];
                let impurity = split_impurity(&left, &right);
                if best.map_or(true, |(b, _, _)| impurity < b) {
                    best = Some((impurity, feature, (prev_value + value) / 2.0));
                }
            }
        }
        best.map(|(_, feature, threshold)| (feature, threshold))
    }
}

fn gini(counts: &[f64; 2]) -> f64 {
    let total = counts[0] + counts[1];
    if total <= 0.0 {
        return 0.0;
    }
    let p0 = counts[0] / total;
    let p1 = counts[1] / total;
    1.0 - p0 * p0 - p1 * p1
}

/// Weighted mean impurity of a candidate split
fn split_impurity(left: &[f64; 2], right: &[f64; 2]) -> f64 {
    let weight_left = left[0] + left[1];
    let weight_right = right[0] + right[1];
    (weight_left * gini(left) + weight_right * gini(right)) / (weight_left + weight_right)
}
