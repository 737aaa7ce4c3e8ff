//! Lock-free disjoint-set forest.
//!
//! Parent pointers are `AtomicUsize`s. `union` attaches the root with the larger index
//! under the root with the smaller index using a compare-and-swap, retrying when
//! another thread moved the root first. `find` halves paths with the same primitive.
//!
//! Because a parent pointer only ever moves to a smaller index, the forest has no
//! cycles and the root of every component is its smallest member. The final
//! partition is the equivalence closure of all performed unions, so it does not
//! depend on thread interleaving, and neither do the root ids.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::util;
use crate::error::Result;

/// Disjoint-set forest safe for concurrent `union` / `find` from many threads.
#[derive(Debug)]
pub struct ConcurrentUnionFind {
    parent: Vec<AtomicUsize>,
}

impl ConcurrentUnionFind {
    /// A forest of `n` singleton sets.
    pub fn new(n: usize) -> Result<Self> {
        let mut parent = util::try_with_capacity("union-find forest", n)?;
        parent.extend((0..n).map(AtomicUsize::new));
        Ok(Self { parent })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest has no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Current representative of `x`, halving the path on the way.
    pub fn find(&self, mut x: usize) -> usize {
        loop {
            let p = self.parent[x].load(Ordering::Acquire);
            if p == x {
                return x;
            }
            let gp = self.parent[p].load(Ordering::Acquire);
            if gp != p {
                // Losing this race is harmless: someone already moved x closer to the root.
                let _ = self.parent[x].compare_exchange_weak(
                    p,
                    gp,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                );
            }
            x = gp;
        }
    }

    /// Merge the sets of `a` and `b`. Returns `false` if they were already merged.
    pub fn union(&self, mut a: usize, mut b: usize) -> bool {
        loop {
            a = self.find(a);
            b = self.find(b);
            if a == b {
                return false;
            }
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            if self.parent[hi]
                .compare_exchange(hi, lo, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    /// Whether `a` and `b` are currently in the same set.
    pub fn same_set(&self, mut a: usize, mut b: usize) -> bool {
        loop {
            a = self.find(a);
            b = self.find(b);
            if a == b {
                return true;
            }
            // `a` still being a root means the answer was valid at this instant.
            if self.parent[a].load(Ordering::Acquire) == a {
                return false;
            }
        }
    }

    /// Consume the forest and return the fully compressed root of every element.
    pub fn into_roots(self) -> Vec<usize> {
        let mut roots: Vec<usize> = self
            .parent
            .into_iter()
            .map(AtomicUsize::into_inner)
            .collect();
        // parent[i] <= i, so ascending order sees every parent resolved first.
        for i in 0..roots.len() {
            let p = roots[i];
            roots[i] = roots[p];
        }
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn singletons_are_their_own_roots() {
        let uf = ConcurrentUnionFind::new(4).unwrap();
        assert_eq!(uf.len(), 4);
        for i in 0..4 {
            assert_eq!(uf.find(i), i);
        }
        assert_eq!(uf.into_roots(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn union_attaches_under_smaller_root() {
        let uf = ConcurrentUnionFind::new(6).unwrap();
        assert!(uf.union(5, 3));
        assert!(uf.union(4, 5));
        assert!(!uf.union(3, 4));
        assert_eq!(uf.find(5), 3);
        assert!(uf.same_set(4, 3));
        assert!(!uf.same_set(0, 3));
        assert_eq!(uf.into_roots(), vec![0, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn concurrent_chain_collapses_to_zero() {
        let n = 10_000;
        let uf = ConcurrentUnionFind::new(n).unwrap();
        (1..n).into_par_iter().for_each(|i| {
            uf.union(i, i - 1);
        });
        let roots = uf.into_roots();
        assert!(roots.iter().all(|&r| r == 0));
    }

    #[test]
    fn concurrent_unions_match_sequential() {
        let n = 5_000;
        // Two interleaved families: even and odd indices.
        let pairs: Vec<(usize, usize)> = (0..n - 2).map(|i| (i + 2, i)).collect();

        let seq = ConcurrentUnionFind::new(n).unwrap();
        for &(a, b) in &pairs {
            seq.union(a, b);
        }

        let par = ConcurrentUnionFind::new(n).unwrap();
        pairs.par_iter().for_each(|&(a, b)| {
            par.union(b, a);
        });

        let seq_roots = seq.into_roots();
        assert_eq!(seq_roots, par.into_roots());
        for (i, &r) in seq_roots.iter().enumerate() {
            assert_eq!(r, i % 2);
        }
    }
}
