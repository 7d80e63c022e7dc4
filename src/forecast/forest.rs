//! Bagged ensemble of regression trees

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::forecast::tree::{RegressionTree, TreeParams};

/// Random forest hyper-parameters
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// Random forest regressor: every tree is fit on a bootstrap resample of the
/// training rows and predictions are the mean over trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: ForestParams) -> Result<Self> {
        if x.is_empty() {
            return Err(AppError::Training("No training samples".to_string()));
        }
        if x.len() != y.len() {
            return Err(AppError::Training(format!(
                "Feature rows ({}) and targets ({}) differ in length",
                x.len(),
                y.len()
            )));
        }
        if params.n_estimators == 0 {
            return Err(AppError::Training("n_estimators must be positive".to_string()));
        }

        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(AppError::Training("Ragged feature matrix".to_string()));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Training("Non-finite training target".to_string()));
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
        };
        let mut rng = StdRng::seed_from_u64(params.seed);
        let n = x.len();

        let trees = (0..params.n_estimators)
            .map(|_| {
                let mut sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, &mut sample, tree_params)
            })
            .collect::<Vec<_>>();

        debug!(
            trees = trees.len(),
            samples = n,
            features = n_features,
            "Random forest fitted"
        );

        Ok(Self { n_features, trees })
    }

    pub fn predict_one(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(AppError::Internal(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Sanity check applied to models read back from storage
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(AppError::Storage("Model has no trees".to_string()));
        }
        if !self.trees.iter().all(RegressionTree::is_well_formed) {
            return Err(AppError::Storage("Model contains a malformed tree".to_string()));
        }
        Ok(())
    }
}
