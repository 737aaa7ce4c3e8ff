//! KD-tree for fixed-radius neighbor search.
//!
//! The tree is built once over the whole point set and is immutable afterwards, so it
//! can be shared by reference across rayon workers without synchronization.
//!
//! Layout: nodes live in a flat `Vec`, leaves refer to a contiguous range of the
//! permuted point order, and coordinates are copied into that same order so a leaf
//! scan walks memory linearly. Every node keeps its tight bounding box; a subtree is
//! skipped when the box lies farther from the query than the search radius.
//!
//! Construction is deterministic for a given input ordering: the split dimension is
//! the one of maximum spread (lowest index on ties) and the median is selected under
//! the total order `(coordinate, original index)`.

use std::ops::ControlFlow;

use tracing::debug;

use super::util::{self, squared_euclidean};
use crate::error::{Error, Result};

/// Maximum number of points in a leaf bucket.
pub const LEAF_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        dim: usize,
        value: f32,
        left: usize,
        right: usize,
    },
    /// Range `[start..end)` into `order` / `coords`.
    Leaf { start: usize, end: usize },
}

/// A KD-tree over a copy of the point set, answering closed-ball range queries.
#[derive(Debug, Clone)]
pub struct KdTree {
    dim: usize,
    nodes: Vec<Node>,
    /// Bounding boxes, `dim` lows then `dim` highs per node.
    bounds: Vec<f32>,
    /// Original point index at each tree position.
    order: Vec<usize>,
    /// Tree position of each original point index.
    position: Vec<usize>,
    /// Coordinates in tree order, `dim` per point.
    coords: Vec<f32>,
}

impl KdTree {
    /// Build a tree over `data`.
    ///
    /// Fails on an empty point set, zero-dimensional or non-finite points, and on
    /// points of differing dimension.
    pub fn build(data: &[Vec<f32>]) -> Result<Self> {
        let dim = util::validate_points(data)?;
        let n = data.len();

        let mut order = util::try_with_capacity("kd-tree order", n)?;
        order.extend(0..n);

        let mut builder = Builder {
            data,
            dim,
            nodes: Vec::new(),
            bounds: Vec::new(),
            depth: 0,
        };
        builder.build_recursive(&mut order, 0, n, 0);

        let len = n.checked_mul(dim).ok_or(Error::ResourceExhausted {
            what: "kd-tree coordinates",
            requested: usize::MAX,
        })?;
        let mut coords = util::try_with_capacity("kd-tree coordinates", len)?;
        for &i in &order {
            coords.extend_from_slice(&data[i]);
        }

        let mut position = util::try_filled("kd-tree positions", n, 0usize)?;
        for (pos, &i) in order.iter().enumerate() {
            position[i] = pos;
        }

        debug!(
            points = n,
            dim,
            nodes = builder.nodes.len(),
            depth = builder.depth,
            "built kd-tree"
        );

        Ok(Self {
            dim,
            nodes: builder.nodes,
            bounds: builder.bounds,
            order,
            position,
            coords,
        })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false for a successfully built tree.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Dimensionality of the indexed points.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of the point with original index `i`.
    pub fn point(&self, i: usize) -> &[f32] {
        let pos = self.position[i];
        &self.coords[pos * self.dim..(pos + 1) * self.dim]
    }

    /// All point indices within `radius` of `query` (inclusive), ascending.
    pub fn range_query(&self, query: &[f32], radius: f32) -> Vec<usize> {
        let mut out = Vec::new();
        let _ = self.range_visit(query, radius, |i| {
            out.push(i);
            ControlFlow::Continue(())
        });
        out.sort_unstable();
        out
    }

    /// Count points within `radius` of `query` (inclusive), stopping at `cap`.
    ///
    /// Returns `min(true_count, cap)`.
    pub fn range_count(&self, query: &[f32], radius: f32, cap: usize) -> usize {
        if cap == 0 {
            return 0;
        }
        let mut count = 0;
        let _ = self.range_visit(query, radius, |_| {
            count += 1;
            if count >= cap {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        count
    }

    /// Call `visit` with the index of every point within `radius` of `query`.
    ///
    /// Points are reported in tree order, not index order. The visitor stops the
    /// traversal by returning `ControlFlow::Break`. A negative or NaN radius
    /// matches nothing.
    pub fn range_visit<F>(&self, query: &[f32], radius: f32, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(usize) -> ControlFlow<()>,
    {
        debug_assert_eq!(query.len(), self.dim);
        if self.nodes.is_empty() || radius.is_nan() || radius < 0.0 {
            return ControlFlow::Continue(());
        }
        let radius_sq = radius * radius;
        self.visit_recursive(0, query, radius_sq, &mut visit)
    }

    fn visit_recursive<F>(
        &self,
        node_idx: usize,
        query: &[f32],
        radius_sq: f32,
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(usize) -> ControlFlow<()>,
    {
        if self.box_distance_sq(node_idx, query) > radius_sq {
            return ControlFlow::Continue(());
        }

        match self.nodes[node_idx] {
            Node::Leaf { start, end } => {
                for pos in start..end {
                    let p = &self.coords[pos * self.dim..(pos + 1) * self.dim];
                    if squared_euclidean(query, p) <= radius_sq {
                        visit(self.order[pos])?;
                    }
                }
                ControlFlow::Continue(())
            }
            Node::Split {
                dim,
                value,
                left,
                right,
            } => {
                let (near, far) = if query[dim] <= value {
                    (left, right)
                } else {
                    (right, left)
                };
                self.visit_recursive(near, query, radius_sq, visit)?;
                self.visit_recursive(far, query, radius_sq, visit)
            }
        }
    }

    /// Squared distance from `query` to the bounding box of a node.
    ///
    /// Accumulated in the same order as `squared_euclidean`, so it never exceeds the
    /// computed distance to any point inside the box.
    #[inline]
    fn box_distance_sq(&self, node_idx: usize, query: &[f32]) -> f32 {
        let base = node_idx * 2 * self.dim;
        let lo = &self.bounds[base..base + self.dim];
        let hi = &self.bounds[base + self.dim..base + 2 * self.dim];
        query
            .iter()
            .zip(lo.iter().zip(hi.iter()))
            .map(|(&q, (&l, &h))| {
                let gap = if q < l {
                    l - q
                } else if q > h {
                    q - h
                } else {
                    0.0
                };
                gap * gap
            })
            .sum()
    }
}

struct Builder<'a> {
    data: &'a [Vec<f32>],
    dim: usize,
    nodes: Vec<Node>,
    bounds: Vec<f32>,
    depth: usize,
}

impl Builder<'_> {
    fn build_recursive(
        &mut self,
        order: &mut [usize],
        start: usize,
        end: usize,
        depth: usize,
    ) -> usize {
        self.depth = self.depth.max(depth);

        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf { start, end });
        let spread_dim = self.push_bounds(&order[start..end]);

        let count = end - start;
        if count <= LEAF_SIZE {
            return node_idx;
        }

        let data = self.data;
        let mid = count / 2;
        order[start..end].select_nth_unstable_by(mid, |&a, &b| {
            data[a][spread_dim]
                .total_cmp(&data[b][spread_dim])
                .then(a.cmp(&b))
        });
        let median_pos = start + mid;
        let value = data[order[median_pos]][spread_dim];

        let left = self.build_recursive(order, start, median_pos, depth + 1);
        let right = self.build_recursive(order, median_pos, end, depth + 1);

        self.nodes[node_idx] = Node::Split {
            dim: spread_dim,
            value,
            left,
            right,
        };
        node_idx
    }

    /// Append the bounding box of `points` and return its widest dimension.
    fn push_bounds(&mut self, points: &[usize]) -> usize {
        let mut lo = vec![f32::INFINITY; self.dim];
        let mut hi = vec![f32::NEG_INFINITY; self.dim];
        for &i in points {
            for (d, &v) in self.data[i].iter().enumerate() {
                lo[d] = lo[d].min(v);
                hi[d] = hi[d].max(v);
            }
        }

        let mut best_dim = 0;
        let mut best_spread = f32::NEG_INFINITY;
        for d in 0..self.dim {
            let spread = hi[d] - lo[d];
            if spread > best_spread {
                best_spread = spread;
                best_dim = d;
            }
        }

        self.bounds.extend_from_slice(&lo);
        self.bounds.extend_from_slice(&hi);
        best_dim
    }
}
