// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! K-means grouping of authors
//!
//! Centroids are seeded with k-means++ from a seeded RNG, then refined with
//! Lloyd iterations until they stop moving or the iteration bound is hit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClusterError;
use crate::features::FeatureTable;

/// Default RNG seed
pub const DEFAULT_SEED: u64 = 0;

/// Default bound on Lloyd iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// Default convergence tolerance on total centroid shift
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Tuning for a k-means run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansConfig {
    /// Seed for centroid initialization
    pub seed: u64,
    /// Upper bound on Lloyd iterations
    pub max_iterations: usize,
    /// Stop once the summed squared centroid shift is at most this
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl KMeansConfig {
    /// Set the RNG seed
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the iteration bound
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// An author and the group it landed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// Author name
    pub name: String,
    /// Group label in `[0, k)`; only the partition is meaningful
    #[serde(rename = "cluster")]
    pub cluster_id: usize,
}

/// Parse a requested cluster count
///
/// # Errors
///
/// Returns `ClusterError::InvalidClusterCount` unless the input is a
/// positive integer.
pub fn parse_cluster_count(input: &str) -> Result<usize, ClusterError> {
    match input.trim().parse::<usize>() {
        Ok(k) if k > 0 => Ok(k),
        _ => Err(ClusterError::InvalidClusterCount {
            input: input.to_string(),
        }),
    }
}

/// Check that `authors` distinct contributors can fill `k` clusters
///
/// # Errors
///
/// Returns `ClusterError::InvalidClusterCount` if `k` is zero, or
/// `ClusterError::InsufficientPopulation` if `authors < k`.
pub fn check_population(authors: usize, k: usize) -> Result<(), ClusterError> {
    if k == 0 {
        return Err(ClusterError::InvalidClusterCount {
            input: k.to_string(),
        });
    }
    if authors < k {
        return Err(ClusterError::InsufficientPopulation {
            authors,
            clusters: k,
        });
    }
    Ok(())
}

/// Partition the authors of `table` into `k` groups
///
/// Assignments come back in table order. The same table, `k` and seed always
/// give the same assignments.
///
/// # Errors
///
/// Returns `ClusterError::InvalidClusterCount` if `k` is zero, or
/// `ClusterError::InsufficientPopulation` if there are fewer authors than
/// `k`.
pub fn cluster(
    table: &FeatureTable,
    k: usize,
    config: &KMeansConfig,
) -> Result<Vec<ClusterAssignment>, ClusterError> {
    check_population(table.len(), k)?;

    let points = table.matrix();
    let labels = lloyd(&points, k, config);

    Ok(table
        .names()
        .zip(labels)
        .map(|(name, cluster_id)| ClusterAssignment {
            name: name.to_string(),
            cluster_id,
        })
        .collect())
}

fn lloyd(points: &[Vec<f64>], k: usize, config: &KMeansConfig) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut centroids = init_plus_plus(points, k, &mut rng);
    let mut labels = vec![0; points.len()];

    let mut iterations = 0;
    let mut shift = f64::INFINITY;
    while iterations < config.max_iterations.max(1) {
        iterations += 1;
        assign(points, &centroids, &mut labels);
        reseed_empty(points, &centroids, &mut labels, k);
        let next = means(points, &labels, k);
        shift = centroids
            .iter()
            .zip(&next)
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = next;
        if shift <= config.tolerance {
            break;
        }
    }

    debug!(
        points = points.len(),
        clusters = k,
        iterations,
        shift,
        "K-means finished"
    );
    labels
}

/// k-means++ seeding: each next centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one
fn init_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.gen_range(0.0..total);
            let mut index = nearest.len() - 1;
            for (i, weight) in nearest.iter().enumerate() {
                if target < *weight {
                    index = i;
                    break;
                }
                target -= weight;
            }
            index
        } else {
            // Every point coincides with a centroid already
            rng.gen_range(0..points.len())
        };

        let centroid = points[chosen].clone();
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }
    centroids
}

/// Assign each point to its nearest centroid; ties go to the lowest index
fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) {
    for (label, point) in labels.iter_mut().zip(points) {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, centroid) in centroids.iter().enumerate() {
            let distance = squared_distance(point, centroid);
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        *label = best;
    }
}

/// Move the farthest point of a multi-member cluster into each empty cluster
fn reseed_empty(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize], k: usize) {
    let mut counts = vec![0usize; k];
    for label in labels.iter() {
        counts[*label] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let donor = (0..points.len())
            .filter(|&i| counts[labels[i]] > 1)
            .max_by(|&a, &b| {
                let da = squared_distance(&points[a], &centroids[labels[a]]);
                let db = squared_distance(&points[b], &centroids[labels[b]]);
                da.total_cmp(&db)
            });
        if let Some(i) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
        }
    }
}

fn means(points: &[Vec<f64>], labels: &[usize], k: usize) -> Vec<Vec<f64>> {
    let dim = points.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];
    for (point, label) in points.iter().zip(labels) {
        counts[*label] += 1;
        for (s, x) in sums[*label].iter_mut().zip(point) {
            *s += x;
        }
    }
    for (sum, count) in sums.iter_mut().zip(&counts) {
        if *count > 0 {
            for s in sum.iter_mut() {
                *s /= *count as f64;
            }
        }
    }
    sums
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
