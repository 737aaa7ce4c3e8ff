//! Parallel exact DBSCAN.
//!
//! `pardbscan` clusters points in Euclidean space by density. Points that are
//! mutually reachable through chains of dense neighborhoods form a cluster; points
//! in sparse regions are noise.
//!
//! The primary public API is under [`cluster`]:
//! - [`Dbscan`]: the engine (`fit` returns labels and core flags)
//! - the building blocks it runs: KD-tree, density classifier, lock-free union-find,
//!   label finalizer
//!
//! Work is spread over the ambient rayon thread pool. Results are identical for any
//! pool size.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    brute_force, canonicalize_labels, cluster_count, Clustering, Dbscan, DbscanExt, DbscanFit,
    KdTree, NOISE, NOISE_LABEL,
};
pub use error::{Error, Result};
