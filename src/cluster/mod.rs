//! Parallel density-based clustering.
//!
//! ## DBSCAN
//!
//! Density-based clustering that can discover non-convex clusters and identify
//! outliers (noise points). DBSCAN does not require specifying the number of
//! clusters in advance.
//!
//! The engine is split into the pieces it runs in order:
//!
//! - [`KdTree`]: spatial index answering closed-ball range queries and capped
//!   range counts.
//! - [`classify_core_points`]: parallel density test, one capped count per point.
//! - [`resolve_components`]: parallel merging of every core point with its
//!   neighbors in a [`ConcurrentUnionFind`].
//! - [`finalize_labels`]: compression of the forest into dense cluster ids,
//!   numbered by the smallest point index in each cluster.
//!
//! [`Dbscan::fit`] runs all of them. [`brute_force`] computes the same result by
//! all-pairs scanning and serves as a reference for small inputs.
//!
//! ## Usage
//!
//! ```rust
//! use pardbscan::cluster::{Clustering, Dbscan, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//!     vec![50.0, 50.0],
//! ];
//!
//! let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();
//! assert_eq!(fit.labels, vec![0, 0, 1, 1, -1]);
//! assert_eq!(fit.core_flags, vec![true, true, true, true, false]);
//!
//! // Hard labels with noise as `NOISE`.
//! let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels[4], NOISE);
//! ```

mod brute;
mod dbscan;
mod density;
mod kdtree;
mod labels;
mod resolver;
mod traits;
mod union_find;
mod util;

pub use brute::brute_force;
pub use dbscan::{Dbscan, DbscanExt, DbscanFit, NOISE};
pub use density::{classify_core_points, neighbor_counts};
pub use kdtree::{KdTree, LEAF_SIZE};
pub use labels::{canonicalize_labels, cluster_count, finalize_labels, NOISE_LABEL};
pub use resolver::resolve_components;
pub use traits::Clustering;
pub use union_find::ConcurrentUnionFind;
