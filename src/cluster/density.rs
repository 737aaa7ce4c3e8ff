//! Core-point classification.
//!
//! A point is core when its closed `eps`-ball, the point itself included, holds at
//! least `min_samples` points. Each point is tested independently against the shared
//! tree, so the pass is a plain parallel map with no synchronization.

use rayon::prelude::*;
use tracing::debug;

use super::kdtree::KdTree;
use super::util;
use crate::error::Result;

/// Compute the core flag of every indexed point.
pub fn classify_core_points(tree: &KdTree, eps: f32, min_samples: usize) -> Result<Vec<bool>> {
    util::validate_params(eps, min_samples)?;
    let n = tree.len();
    let mut flags = util::try_filled("core flags", n, false)?;

    if min_samples <= 1 {
        // Every ball contains its own center.
        flags.fill(true);
    } else {
        flags.par_iter_mut().enumerate().for_each(|(i, flag)| {
            *flag = tree.range_count(tree.point(i), eps, min_samples) >= min_samples;
        });
    }

    debug!(
        points = n,
        core = flags.iter().filter(|&&c| c).count(),
        eps,
        min_samples,
        "classified core points"
    );
    Ok(flags)
}

/// Exact size of every point's closed `eps`-ball, the point itself included.
pub fn neighbor_counts(tree: &KdTree, eps: f32) -> Result<Vec<usize>> {
    util::validate_eps(eps)?;
    let mut counts = util::try_filled("neighbor counts", tree.len(), 0usize)?;
    counts.par_iter_mut().enumerate().for_each(|(i, c)| {
        *c = tree.range_count(tree.point(i), eps, usize::MAX);
    });
    Ok(counts)
}
