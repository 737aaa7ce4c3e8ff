//! Turning the merged forest into public cluster labels.
//!
//! Cluster ids are handed out while scanning points in index order, so cluster `0`
//! is the one containing the smallest clustered index, cluster `1` the next, and so
//! on. Root ids are never exposed.

use std::collections::HashMap;

use tracing::debug;

use super::union_find::ConcurrentUnionFind;
use super::util;
use crate::error::{Error, Result};

/// Label of a point that belongs to no cluster.
pub const NOISE_LABEL: i64 = -1;

/// Compress `forest` and assign dense, first-discovery cluster ids.
///
/// Components without a core point are noise.
pub fn finalize_labels(forest: ConcurrentUnionFind, core_flags: &[bool]) -> Result<Vec<i64>> {
    let roots = forest.into_roots();
    labels_from_roots(&roots, core_flags)
}

pub(crate) fn labels_from_roots(roots: &[usize], core_flags: &[bool]) -> Result<Vec<i64>> {
    if roots.len() != core_flags.len() {
        return Err(Error::DimensionMismatch {
            expected: roots.len(),
            found: core_flags.len(),
        });
    }
    let n = roots.len();

    let mut has_core = util::try_filled("component core flags", n, false)?;
    for (&root, &core) in roots.iter().zip(core_flags) {
        if core {
            has_core[root] = true;
        }
    }

    let mut ids = util::try_filled("cluster ids", n, NOISE_LABEL)?;
    let mut labels = util::try_with_capacity("labels", n)?;
    let mut next = 0;
    for &root in roots {
        if !has_core[root] {
            labels.push(NOISE_LABEL);
            continue;
        }
        if ids[root] == NOISE_LABEL {
            ids[root] = next;
            next += 1;
        }
        labels.push(ids[root]);
    }

    debug!(points = n, clusters = next, "finalized labels");
    Ok(labels)
}

/// Number of distinct non-noise labels.
pub fn cluster_count(labels: &[i64]) -> usize {
    let mut seen: Vec<i64> = labels.iter().copied().filter(|&l| l != NOISE_LABEL).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Renumber clusters by first appearance, keeping noise at `NOISE_LABEL`.
///
/// Two label arrays describe the same partition iff their canonical forms are equal.
pub fn canonicalize_labels(labels: &[i64]) -> Vec<i64> {
    let mut mapping: HashMap<i64, i64> = HashMap::new();
    labels
        .iter()
        .map(|&l| {
            if l == NOISE_LABEL {
                return NOISE_LABEL;
            }
            let next = mapping.len() as i64;
            *mapping.entry(l).or_insert(next)
        })
        .collect()
}
