//! Regression tree grown by greedy variance reduction

use serde::{Deserialize, Serialize};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree stored as a flat node arena (root at index 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct Split {
    feature: usize,
    threshold: f64,
}

impl RegressionTree {
    /// Fit a tree on the rows of `x` selected by `indices` (duplicates allowed)
    pub fn fit(x: &[Vec<f64>], y: &[f64], indices: &mut [usize], params: TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        if indices.is_empty() {
            tree.nodes.push(Node::Leaf { value: 0.0 });
        } else {
            tree.grow(x, y, indices, 0, params);
        }
        tree
    }

    fn grow(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        params: TreeParams,
    ) -> usize {
        let value = mean(y, indices);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        if depth >= params.max_depth || indices.len() < params.min_samples_split {
            return id;
        }

        let Some(split) = best_split(x, y, indices) else {
            return id;
        };

        let mut mid = 0;
        for k in 0..indices.len() {
            if x[indices[k]][split.feature] <= split.threshold {
                indices.swap(k, mid);
                mid += 1;
            }
        }
        if mid == 0 || mid == indices.len() {
            return id;
        }

        let (left_rows, right_rows) = indices.split_at_mut(mid);
        let left = self.grow(x, y, left_rows, depth + 1, params);
        let right = self.grow(x, y, right_rows, depth + 1, params);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Predict the target for one feature row
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = row.get(*feature).copied().unwrap_or(f64::NAN);
                    id = if v <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
    }

    /// Longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check that every child reference points forward inside the arena
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(id, node)| match node {
                Node::Leaf { value } => value.is_finite(),
                Node::Split { left, right, .. } => {
                    *left > id && *right > id && *left < self.nodes.len() && *right < self.nodes.len()
                }
            })
    }
}

fn mean(y: &[f64], indices: &[usize]) -> f64 {
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

/// Find the threshold that maximizes the reduction in squared error.
///
/// Minimizing the children's summed squared error is equivalent to maximizing
/// `sum_l^2 / n_l + sum_r^2 / n_r`, which a single sorted sweep per feature
/// computes from prefix sums.
fn best_split(x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> Option<Split> {
    let n = indices.len();
    let n_features = x.get(indices[0]).map_or(0, Vec::len);
    let total: f64 = indices.iter().map(|&i| y[i]).sum();
    let parent_score = total * total / n as f64;

    let mut best: Option<(f64, Split)> = None;
    let mut sorted = indices.to_vec();

    for feature in 0..n_features {
        sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        for k in 1..n {
            left_sum += y[sorted[k - 1]];
            let lo = x[sorted[k - 1]][feature];
            let hi = x[sorted[k]][feature];
            if lo >= hi {
                continue;
            }

            let right_sum = total - left_sum;
            let score = left_sum * left_sum / k as f64 + right_sum * right_sum / (n - k) as f64;

            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some((score, Split { feature, threshold }));
            }
        }
    }

    match best {
        Some((score, split)) if score - parent_score > 1e-9 * parent_score.abs().max(1.0) => {
            Some(split)
        }
        _ => None,
    }
}
