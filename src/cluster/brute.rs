//! Quadratic reference DBSCAN.
//!
//! Same definitions, union rule and numbering as [`Dbscan::fit`](super::Dbscan::fit),
//! but every neighborhood is found by scanning all points. Useful as an oracle
//! for small inputs.

use rayon::prelude::*;

use super::dbscan::DbscanFit;
use super::labels::finalize_labels;
use super::union_find::ConcurrentUnionFind;
use super::util::{self, squared_euclidean};
use crate::error::Result;

/// Cluster `data` by all-pairs distance checks.
pub fn brute_force(data: &[Vec<f32>], eps: f32, min_samples: usize) -> Result<DbscanFit> {
    util::validate_params(eps, min_samples)?;
    util::validate_points(data)?;

    let eps_sq = eps * eps;
    let within = |i: usize, j: usize| squared_euclidean(&data[i], &data[j]) <= eps_sq;
    let n = data.len();

    let core_flags: Vec<bool> = (0..n)
        .into_par_iter()
        .map(|i| (0..n).filter(|&j| within(i, j)).count() >= min_samples)
        .collect();

    let forest = ConcurrentUnionFind::new(n)?;
    (0..n)
        .into_par_iter()
        .filter(|&i| core_flags[i])
        .for_each(|i| {
            for j in (0..n).filter(|&j| j != i && within(i, j)) {
                forest.union(i, j);
            }
        });

    let labels = finalize_labels(forest, &core_flags)?;
    Ok(DbscanFit { labels, core_flags })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::labels::NOISE_LABEL;

    #[test]
    fn matches_hand_computed_result() {
        let data = vec![
            vec![0.0, 2.0],
            vec![1.0, 3.0],
            vec![1.5, 2.5],
            vec![2.5, 1.5],
            vec![4.0, 0.0],
        ];
        let fit = brute_force(&data, 1.42, 3).unwrap();
        assert_eq!(fit.core_flags, vec![false, true, true, false, false]);
        assert_eq!(fit.labels, vec![0, 0, 0, 0, NOISE_LABEL]);
    }

    #[test]
    fn rejects_bad_parameters() {
        let data = vec![vec![0.0]];
        assert!(brute_force(&data, 0.0, 1).is_err());
        assert!(brute_force(&data, 1.0, 0).is_err());
        assert!(brute_force(&[], 1.0, 1).is_err());
    }
}
