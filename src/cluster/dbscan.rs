//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN is a density-based clustering algorithm that groups points based on
//! neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinPts**: Minimum number of points within ε, the point itself included,
//!   for a point to be "core".
//! - **Core point**: Its closed ε-ball holds at least MinPts points.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Parallel formulation
//!
//! The classic formulation grows one cluster at a time from a seed queue, which is
//! inherently sequential. Here the same partition is computed in four phases:
//!
//! 1. Build a KD-tree over all points.
//! 2. In parallel, count each point's ε-neighbors (capped at MinPts) and flag
//!    core points.
//! 3. In parallel over core points, union each core point with every point in its
//!    ε-ball in a lock-free disjoint-set forest.
//! 4. Sequentially, compress the forest and number clusters by the smallest point
//!    index they contain. Components without a core point are noise.
//!
//! Each phase completes before the next one starts. The result does not depend on
//! the number of threads or on scheduling.
//!
//! A border point within ε of core points from two different components joins
//! both, which merges them into one cluster.
//!
//! ## Complexity
//!
//! - **Time**: O(n log n) tree build, plus one range query per point and one per
//!   core point; near O(n log n) for well-spread data, O(n²) in the worst case.
//! - **Space**: O(n · d) for the tree, O(n) for flags, forest and labels.
//!
//! ## When to Use
//!
//! - Clusters have non-convex shapes
//! - Number of clusters unknown
//! - Data has outliers
//! - Clusters have similar density
//!
//! ## Limitations
//!
//! - Struggles with varying densities (consider OPTICS)
//! - ε parameter is sensitive and dataset-dependent
//! - Euclidean distance only
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.
//!
//! Wang, Gu, Shun (2020). "Theoretically-Efficient and Practical Parallel DBSCAN."
//! SIGMOD 2020.

use tracing::{debug, debug_span};

use super::density::classify_core_points;
use super::kdtree::KdTree;
use super::labels::{finalize_labels, NOISE_LABEL};
use super::resolver::resolve_components;
use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f32,
    /// Minimum points for core point classification.
    min_pts: usize,
}

/// Label used by [`Clustering::fit_predict`] for noise points.
pub const NOISE: usize = usize::MAX;

/// Result of a DBSCAN run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbscanFit {
    /// One label per input point: [`NOISE_LABEL`] or a cluster id in `[0, k)`.
    ///
    /// Cluster ids are numbered by the smallest point index in each cluster.
    pub labels: Vec<i64>,
    /// One flag per input point: whether it is a core point.
    pub core_flags: Vec<bool>,
}

impl DbscanFit {
    /// Number of clusters `k`.
    pub fn n_clusters(&self) -> usize {
        self.labels.iter().copied().max().map_or(0, |m| (m + 1) as usize)
    }

    /// Number of points labeled noise.
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == NOISE_LABEL).count()
    }

    /// Number of core points.
    pub fn core_count(&self) -> usize {
        self.core_flags.iter().filter(|&&c| c).count()
    }

    /// Indices of core points, ascending.
    pub fn core_sample_indices(&self) -> Vec<usize> {
        self.core_flags
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(|(i, _)| i)
            .collect()
    }

    /// Coordinates of the core points, in index order.
    ///
    /// `data` must be the dataset this result was fitted on.
    pub fn core_samples(&self, data: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        if data.len() != self.core_flags.len() {
            return Err(Error::DimensionMismatch {
                expected: self.core_flags.len(),
                found: data.len(),
            });
        }
        Ok(data
            .iter()
            .zip(&self.core_flags)
            .filter(|(_, &c)| c)
            .map(|(p, _)| p.clone())
            .collect())
    }

    /// Number of points in each cluster, indexed by cluster id.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters()];
        for &l in &self.labels {
            if l != NOISE_LABEL {
                sizes[l as usize] += 1;
            }
        }
        sizes
    }

    /// Whether point `i` is noise.
    pub fn is_noise(&self, i: usize) -> bool {
        self.labels[i] == NOISE_LABEL
    }
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors. Must be positive.
    /// * `min_pts` - Minimum number of points, the point itself included, to form a
    ///   dense region. Must be at least 1.
    ///
    /// Parameters are checked when fitting.
    ///
    /// # Typical Values
    ///
    /// - `epsilon`: Often determined by k-distance plot (k = min_pts - 1).
    /// - `min_pts`: 2 * dimension is a common heuristic.
    pub fn new(epsilon: f32, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Minimum neighborhood size for a core point.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Cluster `data`, returning labels and core flags.
    ///
    /// All parameter and input checks run before any parallel work. The work runs on
    /// the current rayon thread pool; use `ThreadPool::install` to pick its size.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<DbscanFit> {
        util::validate_params(self.epsilon, self.min_pts)?;

        let _span = debug_span!(
            "dbscan",
            n = data.len(),
            eps = self.epsilon,
            min_pts = self.min_pts
        )
        .entered();

        // Validates the points; nothing runs in parallel before this returns.
        let tree = KdTree::build(data)?;
        let core_flags = classify_core_points(&tree, self.epsilon, self.min_pts)?;
        let forest = resolve_components(&tree, &core_flags, self.epsilon)?;
        let labels = finalize_labels(forest, &core_flags)?;

        let fit = DbscanFit { labels, core_flags };
        debug!(
            clusters = fit.n_clusters(),
            core = fit.core_count(),
            noise = fit.noise_count(),
            "dbscan finished"
        );
        Ok(fit)
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    /// Noise points are labeled [`NOISE`].
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let fit = self.fit(data)?;
        Ok(fit
            .labels
            .into_iter()
            .map(|l| if l == NOISE_LABEL { NOISE } else { l as usize })
            .collect())
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    ///
    /// To get the actual number of clusters, see [`DbscanFit::n_clusters`].
    fn n_clusters(&self) -> usize {
        0 // Unknown until fit
    }
}

/// Extended DBSCAN interface with noise detection.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: usize) -> bool {
        label == NOISE
    }
}

impl DbscanExt for Dbscan {
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        let fit = self.fit(data)?;
        Ok(fit
            .labels
            .into_iter()
            .map(|l| if l >= 0 { Some(l as usize) } else { None })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbscan_two_clusters() {
        // Two well-separated clusters
        let data = vec![
            // Cluster 1: around (0, 0)
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![0.05, 0.05],
            // Cluster 2: around (5, 5)
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
            vec![5.05, 5.05],
        ];

        let dbscan = Dbscan::new(0.3, 3);
        let fit = dbscan.fit(&data).unwrap();

        assert_eq!(fit.labels, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
        assert_eq!(fit.core_count(), 10);
        assert_eq!(fit.n_clusters(), 2);
        assert_eq!(fit.cluster_sizes(), vec![5, 5]);
    }

    #[test]
    fn test_dbscan_with_noise() {
        // Two clusters plus an outlier
        let data = vec![
            // Cluster 1
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            // Outlier
            vec![100.0, 100.0],
            // Cluster 2
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
        ];

        let dbscan = Dbscan::new(0.3, 3);
        let labels = dbscan.fit_predict_with_noise(&data).unwrap();

        assert_eq!(labels.len(), 9);

        // Point 4 (outlier) should be noise
        assert!(labels[4].is_none());

        // Others should have cluster assignments
        for (i, label) in labels.iter().enumerate() {
            if i != 4 {
                assert!(label.is_some());
            }
        }

        let hard = dbscan.fit_predict(&data).unwrap();
        assert_eq!(hard[4], NOISE);
        assert!(<Dbscan as DbscanExt>::is_noise(hard[4]));
    }

    #[test]
    fn test_dbscan_border_points() {
        let data = vec![
            vec![0.0, 2.0],
            vec![1.0, 3.0],
            vec![1.5, 2.5],
            vec![2.5, 1.5],
            vec![4.0, 0.0],
        ];

        let fit = Dbscan::new(1.42, 3).fit(&data).unwrap();
        assert_eq!(fit.core_flags, vec![false, true, true, false, false]);
        assert_eq!(fit.labels, vec![0, 0, 0, 0, NOISE_LABEL]);
        assert_eq!(fit.core_sample_indices(), vec![1, 2]);
        assert!(fit.is_noise(4));

        let cores = fit.core_samples(&data).unwrap();
        assert_eq!(cores, vec![vec![1.0, 3.0], vec![1.5, 2.5]]);
        assert!(fit.core_samples(&data[..3]).is_err());
    }

    #[test]
    fn test_dbscan_all_noise() {
        // Points too far apart
        let data = vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
        ];

        let dbscan = Dbscan::new(0.5, 3);
        let labels = dbscan.fit_predict_with_noise(&data).unwrap();

        // All should be noise
        for label in labels {
            assert!(label.is_none());
        }
    }

    #[test]
    fn test_dbscan_all_one_cluster() {
        // All points close together
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
        ];

        let dbscan = Dbscan::new(0.5, 2);
        let labels = dbscan.fit_predict(&data).unwrap();

        // All in same cluster
        let cluster = labels[0];
        for label in labels {
            assert_eq!(label, cluster);
        }
    }

    #[test]
    fn test_dbscan_empty() {
        let data: Vec<Vec<f32>> = vec![];
        let dbscan = Dbscan::new(0.5, 3);
        let result = dbscan.fit_predict(&data);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = vec![vec![0.0, 0.0]];

        // Invalid epsilon
        let dbscan = Dbscan::new(0.0, 3);
        assert!(dbscan.fit_predict(&data).is_err());

        let dbscan = Dbscan::new(-1.0, 3);
        assert!(dbscan.fit_predict(&data).is_err());

        let dbscan = Dbscan::new(f32::NAN, 3);
        assert!(dbscan.fit_predict(&data).is_err());

        // Invalid min_pts
        let dbscan = Dbscan::new(0.5, 0);
        let err = dbscan.fit_predict(&data).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_dbscan_dimension_mismatch() {
        let data = vec![vec![0.0, 0.0], vec![0.0, 0.0, 0.0]];
        let err = Dbscan::new(0.5, 1).fit(&data).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_dbscan_chain() {
        // Chain of points - DBSCAN should connect them
        let data: Vec<Vec<f32>> = (0..10).map(|i| vec![i as f32 * 0.3, 0.0]).collect();

        let dbscan = Dbscan::new(0.5, 2);
        let labels = dbscan.fit_predict(&data).unwrap();

        // All should be in one cluster (chain is connected)
        let cluster = labels[0];
        for label in labels {
            assert_eq!(label, cluster);
        }
    }

    #[test]
    fn test_dbscan_builder() {
        let dbscan = Dbscan::default().with_epsilon(0.25).with_min_pts(7);
        assert_eq!(dbscan.epsilon(), 0.25);
        assert_eq!(dbscan.min_pts(), 7);
        assert_eq!(dbscan.n_clusters(), 0);
    }
}
