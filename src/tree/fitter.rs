use log::trace;
use ndarray::ArrayView2;
use rand::Rng;

use crate::{
    errors::{SimForestError, SimForestResult},
    projection::Projection,
};

use super::{params::SimilarityTreeParams, Node, NodeKind, SimilarityTree};

#[cfg(feature = "use-rayon")]
use rayon::prelude::*;

/// Subsets at least this large are projected with a parallel iterator.
#[cfg(feature = "use-rayon")]
pub const PARALLEL_PROJECTION_MIN_ROWS: usize = 4096;

/// Fits a tree on every row of `x`.
pub fn fit<R: Rng + ?Sized>(
    x: ArrayView2<f64>,
    hyperparameters: &SimilarityTreeParams,
    rng: &mut R,
) -> SimForestResult<SimilarityTree> {
    let rows: Vec<usize> = (0..x.nrows()).collect();
    fit_rows(x, &rows, hyperparameters, rng)
}

/// Fits a tree on the rows of `x` listed in `rows`. Rows may repeat, as they do in a
/// bootstrap sample.
pub fn fit_rows<R: Rng + ?Sized>(
    x: ArrayView2<f64>,
    rows: &[usize],
    hyperparameters: &SimilarityTreeParams,
    rng: &mut R,
) -> SimForestResult<SimilarityTree> {
    hyperparameters.validate()?;
    SimilarityTreeFitter::new(x, hyperparameters).fit(rows, rng)
}

#[derive(Debug)]
struct SimilarityTreeFitter<'a> {
    x: ArrayView2<'a, f64>,
    max_depth: Option<usize>,
    projection: Projection,
    nodes: Vec<Node>,
}

impl<'a> SimilarityTreeFitter<'a> {
    fn new(x: ArrayView2<'a, f64>, hyperparameters: &SimilarityTreeParams) -> Self {
        Self {
            x,
            max_depth: hyperparameters.max_depth,
            projection: hyperparameters.projection,
            nodes: Vec::new(),
        }
    }

    fn fit<R: Rng + ?Sized>(
        mut self,
        rows: &[usize],
        rng: &mut R,
    ) -> SimForestResult<SimilarityTree> {
        let root = self.grow(rows, 1, rng)?;
        Ok(SimilarityTree::new(self.nodes, root, self.projection))
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        rows: &[usize],
        depth: usize,
        rng: &mut R,
    ) -> SimForestResult<usize> {
        if self.is_terminal(rows, depth) {
            return Ok(self.push(Node::leaf(depth)));
        }

        // Draw order: p, q, threshold.
        let (p, q) = self.sample_split_points(rows, depth, rng)?;
        let projections = self.project_rows(rows, p, q);

        let (min, max) = projections
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let threshold = rng.gen_range(min..=max);

        let mut left = Vec::with_capacity(rows.len());
        let mut right = Vec::with_capacity(rows.len());
        for (&row, &v) in rows.iter().zip(projections.iter()) {
            if v <= threshold {
                left.push(row);
            } else {
                right.push(row);
            }
        }

        if left.is_empty() || right.is_empty() {
            trace!(
                "degenerate split at depth {} over {} rows (range [{}, {}], threshold {})",
                depth,
                rows.len(),
                min,
                max,
                threshold
            );
            return Ok(self.push(Node::leaf(depth)));
        }

        let left_child = self.grow(&left, depth + 1, rng)?;
        let right_child = self.grow(&right, depth + 1, rng)?;

        Ok(self.push(Node {
            depth,
            kind: NodeKind::Split {
                p: self.x.row(p).to_owned(),
                q: self.x.row(q).to_owned(),
                threshold,
                left: left_child,
                right: right_child,
            },
        }))
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn is_terminal(&self, rows: &[usize], depth: usize) -> bool {
        if rows.len() <= 1 || self.max_depth.is_some_and(|max_depth| depth >= max_depth) {
            return true;
        }
        let first = self.x.row(rows[0]);
        rows.iter().all(|&i| self.x.row(i) == first)
    }

    /// Returns the row indices of `p` and `q`. The two rows are guaranteed to differ.
    fn sample_split_points<R: Rng + ?Sized>(
        &self,
        rows: &[usize],
        depth: usize,
        rng: &mut R,
    ) -> SimForestResult<(usize, usize)> {
        if rows.len() == 2 {
            return Ok((rows[0], rows[1]));
        }

        let p = rows[rng.gen_range(0..rows.len())];
        let p_row = self.x.row(p);
        let candidates: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&i| self.x.row(i) != p_row)
            .collect();
        if candidates.is_empty() {
            return Err(SimForestError::InvariantViolation {
                depth,
                n_rows: rows.len(),
            });
        }
        let q = candidates[rng.gen_range(0..candidates.len())];

        Ok((p, q))
    }

    fn project_rows(&self, rows: &[usize], p: usize, q: usize) -> Vec<f64> {
        let x = self.x;
        let projection = self.projection;
        let (p, q) = (x.row(p), x.row(q));

        #[cfg(feature = "use-rayon")]
        {
            if rows.len() >= PARALLEL_PROJECTION_MIN_ROWS {
                return rows
                    .par_iter()
                    .map(|&i| projection.project(x.row(i), p, q))
                    .collect();
            }
        }

        rows.iter()
            .map(|&i| projection.project(x.row(i), p, q))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_data::uniform, tree::params::SimilarityTreeParamsBuilder, FittedModel};
    use itertools::Itertools;
    use ndarray::{array, Array2};
    use rand::{rngs::StdRng, SeedableRng};

    fn random_points(n: usize, m: usize, seed: u64) -> Array2<f64> {
        uniform(n, m, 5.0, seed)
    }

    #[test]
    fn test_single_row_is_leaf() {
        let x = array![[1.0, 2.0, 3.0]];
        let mut rng = StdRng::seed_from_u64(42);
        let tree = fit(x.view(), &SimilarityTreeParams::default(), &mut rng).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().depth, 1);
    }

    #[test]
    fn test_two_rows_split_once() {
        let x = array![[0.0, 1.0], [2.0, -1.0]];
        for projection in [Projection::Dot, Projection::SquaredEuclidean, Projection::Rbf] {
            let params = SimilarityTreeParamsBuilder::new()
                .projection(projection)
                .build();
            let mut rng = StdRng::seed_from_u64(7);
            let tree = fit(x.view(), &params, &mut rng).unwrap();

            assert_eq!(tree.n_nodes(), 3);
            assert_eq!(tree.n_leaves(), 2);
            match &tree.root().kind {
                NodeKind::Split {
                    p, q, left, right, ..
                } => {
                    assert_eq!(p, &x.row(0));
                    assert_eq!(q, &x.row(1));
                    assert_eq!(tree.node(*left).depth, 2);
                    assert_eq!(tree.node(*right).depth, 2);
                    assert!(tree.node(*left).is_leaf());
                    assert!(tree.node(*right).is_leaf());
                }
                NodeKind::Leaf => panic!("root of two distinct rows should split"),
            }
            assert_eq!(tree.distance(x.row(0), x.row(1)), 1);
        }
    }

    #[test]
    fn test_identical_rows_are_leaf() {
        let x = array![[1.5, -2.0], [1.5, -2.0], [1.5, -2.0], [1.5, -2.0]];
        let mut rng = StdRng::seed_from_u64(42);
        let tree = fit(x.view(), &SimilarityTreeParams::default(), &mut rng).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.root().depth, 1);
    }

    #[test]
    fn test_repeated_rows_are_leaf() {
        let x = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        let mut rng = StdRng::seed_from_u64(42);
        let tree = fit_rows(x.view(), &[1, 1, 1], &SimilarityTreeParams::default(), &mut rng)
            .unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_max_depth_one_is_leaf() {
        let x = random_points(10, 3, 1);
        let params = SimilarityTreeParamsBuilder::new().max_depth(Some(1)).build();
        let mut rng = StdRng::seed_from_u64(42);
        let tree = fit(x.view(), &params, &mut rng).unwrap();
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn test_max_depth_bounds_leaves() {
        let x = random_points(60, 4, 2);
        let params = SimilarityTreeParamsBuilder::new()
            .max_depth(Some(3))
            .projection(Projection::SquaredEuclidean)
            .build();
        let mut rng = StdRng::seed_from_u64(42);
        let tree = fit(x.view(), &params, &mut rng).unwrap();
        assert!(tree.depth() <= 3);
        assert!(tree.nodes().iter().all(|node| node.depth >= 1));
        assert!(tree.leaves().all(|leaf| leaf.depth <= 3));
    }

    #[test]
    fn test_zero_max_depth_is_rejected() {
        let x = random_points(5, 2, 3);
        let params = SimilarityTreeParamsBuilder::new().max_depth(Some(0)).build();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(matches!(
            fit(x.view(), &params, &mut rng),
            Err(SimForestError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unbounded_tree_isolates_distinct_rows() {
        let x = random_points(25, 3, 4);
        for projection in [Projection::Dot, Projection::SquaredEuclidean, Projection::Rbf] {
            let params = SimilarityTreeParamsBuilder::new()
                .projection(projection)
                .build();
            let mut rng = StdRng::seed_from_u64(11);
            let tree = fit(x.view(), &params, &mut rng).unwrap();
            assert_eq!(tree.n_leaves(), x.nrows());
            assert_eq!(tree.n_nodes(), 2 * x.nrows() - 1);
        }
    }

    #[test]
    fn test_distance_is_symmetric_and_bounded() {
        let x = random_points(30, 2, 5);
        let mut rng = StdRng::seed_from_u64(42);
        let tree = fit(x.view(), &SimilarityTreeParams::default(), &mut rng).unwrap();
        let depth = tree.depth();
        for (i, j) in (0..x.nrows()).tuple_combinations() {
            let d_ij = tree.distance(x.row(i), x.row(j));
            let d_ji = tree.distance(x.row(j), x.row(i));
            assert_eq!(d_ij, d_ji);
            assert!(d_ij >= 1 && d_ij <= depth);
        }
    }

    #[test]
    fn test_draw_order() {
        let x = random_points(12, 3, 6);
        let n = x.nrows();

        let mut expected_rng = StdRng::seed_from_u64(99);
        let p = expected_rng.gen_range(0..n);
        let candidates: Vec<usize> = (0..n).filter(|&i| i != p).collect();
        let q = candidates[expected_rng.gen_range(0..candidates.len())];
        let projections: Vec<f64> = (0..n)
            .map(|i| Projection::Dot.project(x.row(i), x.row(p), x.row(q)))
            .collect();
        let min = projections.iter().copied().fold(f64::INFINITY, f64::min);
        let max = projections.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let threshold = expected_rng.gen_range(min..=max);

        let mut rng = StdRng::seed_from_u64(99);
        let tree = fit(x.view(), &SimilarityTreeParams::default(), &mut rng).unwrap();
        match &tree.root().kind {
            NodeKind::Split {
                p: root_p,
                q: root_q,
                threshold: root_threshold,
                ..
            } => {
                assert_eq!(root_p, &x.row(p));
                assert_eq!(root_q, &x.row(q));
                assert_eq!(*root_threshold, threshold);
            }
            NodeKind::Leaf => panic!("root should split"),
        }
    }

    #[test]
    fn test_same_seed_same_tree() {
        let x = random_points(40, 3, 8);
        let params = SimilarityTreeParamsBuilder::new()
            .projection(Projection::Rbf)
            .build();
        let tree1 = fit(x.view(), &params, &mut StdRng::seed_from_u64(3)).unwrap();
        let tree2 = fit(x.view(), &params, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(tree1.nodes(), tree2.nodes());
    }
}
