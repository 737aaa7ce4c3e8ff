//! Connectivity resolution: merge every core point with its `eps`-neighbors.

use std::ops::ControlFlow;

use rayon::prelude::*;
use tracing::debug;

use super::kdtree::KdTree;
use super::union_find::ConcurrentUnionFind;
use super::util;
use crate::error::{Error, Result};

/// Union each core point with every point in its closed `eps`-ball.
///
/// Runs in parallel over core points; border and noise points never start a merge.
/// A border point reachable from two cores therefore joins their components.
pub fn resolve_components(
    tree: &KdTree,
    core_flags: &[bool],
    eps: f32,
) -> Result<ConcurrentUnionFind> {
    util::validate_eps(eps)?;
    if core_flags.len() != tree.len() {
        return Err(Error::DimensionMismatch {
            expected: tree.len(),
            found: core_flags.len(),
        });
    }
    let forest = ConcurrentUnionFind::new(tree.len())?;

    let merges: usize = core_flags
        .par_iter()
        .enumerate()
        .filter(|(_, &core)| core)
        .map(|(p, _)| {
            let mut merged = 0;
            let _ = tree.range_visit(tree.point(p), eps, |q| {
                // Core-core edges are seen from both ends; take them from the larger index.
                let skip = q == p || (q > p && core_flags[q]);
                if !skip && forest.union(p, q) {
                    merged += 1;
                }
                ControlFlow::Continue(())
            });
            merged
        })
        .sum();

    debug!(
        points = tree.len(),
        merges,
        components = tree.len() - merges,
        "resolved connectivity"
    );
    Ok(forest)
}
