//! Trainable classifiers used inside cross-validation.
//!
//! Each fold gets a fresh, unfitted classifier built from a [`ModelKind`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Classifier family and the hyper-parameters needed to build it
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[allow(non_camel_case_types)]
pub enum ModelKind {
    knn,
    gaussian_nb,
    nearest_centroid,
}

impl ModelKind {
    /// Build an unfitted classifier
    pub fn build(&self, knn_neighbors: usize) -> Box<dyn Classifier> {
        match self {
            ModelKind::knn => Box::new(KNearestNeighbors::new(knn_neighbors)),
            ModelKind::gaussian_nb => Box::new(GaussianNaiveBayes::new()),
            ModelKind::nearest_centroid => Box::new(NearestCentroid::new()),
        }
    }
}

pub trait Classifier: Send {
    /// Train on rows of `X` (one per sample) and their classes
    fn fit(&mut self, X: &[Vec<f64>], y: &[u8]) -> Result<(), String>;

    /// Predict one class per row
    fn predict(&self, X: &[Vec<f64>]) -> Vec<u8>;
}

fn check_training_set(X: &[Vec<f64>], y: &[u8]) -> Result<(), String> {
    if X.is_empty() {
        return Err("empty training set".to_string());
    }
    if X.len() != y.len() {
        return Err(format!("{} training rows for {} labels", X.len(), y.len()));
    }
    Ok(())
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

//-----------------------------------------------------------------------------
// k-nearest neighbours
//-----------------------------------------------------------------------------

/// Majority vote among the k closest training samples (Euclidean distance).
///
/// Ties on distance keep training order; ties on votes go to the class of the
/// nearest tied neighbour.
pub struct KNearestNeighbors {
    k: usize,
    X: Vec<Vec<f64>>,
    y: Vec<u8>,
}

impl KNearestNeighbors {
    pub fn new(k: usize) -> Self {
        KNearestNeighbors { k: k.max(1), X: Vec::new(), y: Vec::new() }
    }

    fn predict_one(&self, row: &[f64]) -> u8 {
        let mut distances: Vec<(f64, usize)> = self.X.iter()
            .enumerate()
            .map(|(i, train_row)| (squared_distance(row, train_row), i))
            .collect();
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let neighbours = &distances[..self.k.min(distances.len())];
        let mut votes: BTreeMap<u8, usize> = BTreeMap::new();
        for (_, i) in neighbours {
            *votes.entry(self.y[*i]).or_insert(0) += 1;
        }
        let best_vote = votes.values().copied().max().unwrap_or(0);

        neighbours.iter()
            .map(|(_, i)| self.y[*i])
            .find(|class| votes.get(class) == Some(&best_vote))
            .unwrap_or(0)
    }
}

impl Classifier for KNearestNeighbors {
    fn fit(&mut self, X: &[Vec<f64>], y: &[u8]) -> Result<(), String> {
        check_training_set(X, y)?;
        self.X = X.to_vec();
        self.y = y.to_vec();
        Ok(())
    }

    fn predict(&self, X: &[Vec<f64>]) -> Vec<u8> {
        X.iter().map(|row| self.predict_one(row)).collect()
    }
}

//-----------------------------------------------------------------------------
// Gaussian naive Bayes
//-----------------------------------------------------------------------------

const VAR_SMOOTHING: f64 = 1e-9;

struct ClassStats {
    class: u8,
    log_prior: f64,
    means: Vec<f64>,
    variances: Vec<f64>,
}

/// Gaussian naive Bayes, variances smoothed by 1e-9 times the largest feature variance
pub struct GaussianNaiveBayes {
    stats: Vec<ClassStats>,
}

impl GaussianNaiveBayes {
    pub fn new() -> Self {
        GaussianNaiveBayes { stats: Vec::new() }
    }

    fn joint_log_likelihood(stats: &ClassStats, row: &[f64]) -> f64 {
        stats.log_prior + row.iter().zip(stats.means.iter().zip(&stats.variances))
            .map(|(x, (mean, var))| {
                -0.5 * (2.0 * std::f64::consts::PI * var).ln() - 0.5 * (x - mean).powi(2) / var
            })
            .sum::<f64>()
    }
}

fn column_variance(rows: &[&Vec<f64>], j: usize, mean: f64) -> f64 {
    rows.iter().map(|row| (row[j] - mean).powi(2)).sum::<f64>() / rows.len() as f64
}

impl Classifier for GaussianNaiveBayes {
    fn fit(&mut self, X: &[Vec<f64>], y: &[u8]) -> Result<(), String> {
        check_training_set(X, y)?;
        let feature_len = X[0].len();
        let all_rows: Vec<&Vec<f64>> = X.iter().collect();

        let epsilon = VAR_SMOOTHING * (0..feature_len)
            .map(|j| {
                let mean = all_rows.iter().map(|row| row[j]).sum::<f64>() / all_rows.len() as f64;
                column_variance(&all_rows, j, mean)
            })
            .fold(0.0, f64::max);

        let mut by_class: BTreeMap<u8, Vec<&Vec<f64>>> = BTreeMap::new();
        for (row, class) in X.iter().zip(y) {
            by_class.entry(*class).or_default().push(row);
        }

        self.stats = by_class.into_iter().map(|(class, rows)| {
            let n = rows.len() as f64;
            let means: Vec<f64> = (0..feature_len)
                .map(|j| rows.iter().map(|row| row[j]).sum::<f64>() / n)
                .collect();
            let variances: Vec<f64> = (0..feature_len)
                .map(|j| column_variance(&rows, j, means[j]) + epsilon)
                .collect();
            ClassStats { class, log_prior: (n / X.len() as f64).ln(), means, variances }
        }).collect();

        // Constant features in every class would give a zero variance
        if self.stats.iter().any(|s| s.variances.iter().any(|v| *v <= 0.0)) {
            for stats in self.stats.iter_mut() {
                for v in stats.variances.iter_mut() {
                    if *v <= 0.0 { *v = VAR_SMOOTHING; }
                }
            }
        }

        Ok(())
    }

    fn predict(&self, X: &[Vec<f64>]) -> Vec<u8> {
        X.iter().map(|row| {
            let mut best: Option<(f64, u8)> = None;
            for stats in &self.stats {
                let score = Self::joint_log_likelihood(stats, row);
                if best.map_or(true, |(b, _)| score > b) {
                    best = Some((score, stats.class));
                }
            }
            best.map(|(_, class)| class).unwrap_or(0)
        }).collect()
    }
}

//-----------------------------------------------------------------------------
// Nearest centroid
//-----------------------------------------------------------------------------

/// Assigns each sample to the class whose mean training vector is closest
pub struct NearestCentroid {
    centroids: Vec<(u8, Vec<f64>)>,
}

impl NearestCentroid {
    pub fn new() -> Self {
        NearestCentroid { centroids: Vec::new() }
    }
}

impl Classifier for NearestCentroid {
    fn fit(&mut self, X: &[Vec<f64>], y: &[u8]) -> Result<(), String> {
        check_training_set(X, y)?;
        let feature_len = X[0].len();

        let mut sums: BTreeMap<u8, (Vec<f64>, usize)> = BTreeMap::new();
        for (row, class) in X.iter().zip(y) {
            let entry = sums.entry(*class).or_insert_with(|| (vec![0.0; feature_len], 0));
            for (s, x) in entry.0.iter_mut().zip(row) {
                *s += x;
            }
            entry.1 += 1;
        }

        self.centroids = sums.into_iter()
            .map(|(class, (sum, n))| (class, sum.into_iter().map(|s| s / n as f64).collect()))
            .collect();
        Ok(())
    }

    fn predict(&self, X: &[Vec<f64>]) -> Vec<u8> {
        X.iter().map(|row| {
            self.centroids.iter()
                .map(|(class, centroid)| (squared_distance(row, centroid), *class))
                .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
                .map(|(_, class)| class)
                .unwrap_or(0)
        }).collect()
    }
}
