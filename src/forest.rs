use itertools::Itertools;
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

use crate::{
    errors::{SimForestError, SimForestResult},
    tree::SimilarityTree,
    FittedModel,
};

mod fitter;
pub mod params;

pub use fitter::{bootstrap_indices, fit, fit_with_rng};
pub use params::{SimilarityForestParams, SimilarityForestParamsBuilder, ZeroSumPolicy};

#[cfg(feature = "use-rayon")]
use rayon::prelude::*;

/// An ensemble of independently fitted similarity trees.
///
/// Two pairwise outputs are offered and they do not agree with each other:
///
/// * [`predict_condensed`](Self::predict_condensed) returns `1 / Σ depth` for every pair
///   `i < j`, row-major. Higher values mean the pair separates early, i.e. more dissimilar.
/// * [`predict_square`](Self::predict_square) returns the raw `Σ depth` as a symmetric
///   `n × n` matrix with a zero diagonal. Higher values mean more similar.
#[derive(Debug, Clone)]
pub struct SimilarityForest {
    estimators: Vec<SimilarityTree>,
    n_features: usize,
    bootstrap: bool,
    zero_sum_policy: ZeroSumPolicy,
}

impl SimilarityForest {
    pub const fn new(
        estimators: Vec<SimilarityTree>,
        n_features: usize,
        bootstrap: bool,
        zero_sum_policy: ZeroSumPolicy,
    ) -> Self {
        Self {
            estimators,
            n_features,
            bootstrap,
            zero_sum_policy,
        }
    }

    pub fn estimators(&self) -> &[SimilarityTree] {
        &self.estimators
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn bootstrap(&self) -> bool {
        self.bootstrap
    }

    pub fn zero_sum_policy(&self) -> ZeroSumPolicy {
        self.zero_sum_policy
    }

    fn check_features(&self, x: ArrayView2<f64>) -> SimForestResult<()> {
        if x.ncols() != self.n_features {
            return Err(SimForestError::DimensionMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        Ok(())
    }

    /// Condensed dissimilarities `1 / Σ_t depth_t(i, j)` for every pair `i < j`, in the
    /// order `(0, 1), (0, 2), ..., (0, n-1), (1, 2), ...`. Length `n (n - 1) / 2`.
    ///
    /// A zero sum is handled according to the forest's [`ZeroSumPolicy`].
    pub fn predict_condensed(&self, x: ArrayView2<f64>) -> SimForestResult<Array1<f64>> {
        self.check_features(x)?;
        let n = x.nrows();
        let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);

        for (i, j) in (0..n).tuple_combinations() {
            let total = self.distance(x.row(i), x.row(j));
            let value = if total == 0 {
                match self.zero_sum_policy {
                    ZeroSumPolicy::Error => {
                        return Err(SimForestError::DegenerateAggregation { i, j })
                    }
                    ZeroSumPolicy::Zero => 0.0,
                }
            } else {
                1.0 / total as f64
            };
            condensed.push(value);
        }

        debug!(
            "computed {} condensed dissimilarities over {} trees",
            condensed.len(),
            self.estimators.len()
        );
        Ok(Array1::from(condensed))
    }

    /// Square matrix of summed divergence depths `Σ_t depth_t(i, j)`, symmetric with a zero
    /// diagonal. No inversion is applied.
    ///
    /// Trees are visited one after another. Within a tree the rows of the accumulator are
    /// filled in parallel when the `use-rayon` feature is enabled.
    pub fn predict_square(&self, x: ArrayView2<f64>) -> SimForestResult<Array2<f64>> {
        self.check_features(x)?;
        let n = x.nrows();
        let mut distances = Array2::<f64>::zeros((n, n));

        for tree in &self.estimators {
            #[cfg(not(feature = "use-rayon"))]
            distances
                .axis_iter_mut(Axis(0))
                .enumerate()
                .for_each(|(i, row)| accumulate_upper_row(tree, x, i, row));

            #[cfg(feature = "use-rayon")]
            distances
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(i, row)| accumulate_upper_row(tree, x, i, row));
        }

        // Only the upper triangle was accumulated.
        for i in 0..n {
            for j in (i + 1)..n {
                distances[[j, i]] = distances[[i, j]];
            }
        }

        debug!(
            "computed {}x{} summed depth matrix over {} trees",
            n,
            n,
            self.estimators.len()
        );
        Ok(distances)
    }
}

fn accumulate_upper_row(
    tree: &SimilarityTree,
    x: ArrayView2<f64>,
    i: usize,
    mut row: ArrayViewMut1<f64>,
) {
    let xi = x.row(i);
    for j in (i + 1)..x.nrows() {
        row[j] += tree.distance(xi, x.row(j)) as f64;
    }
}

impl FittedModel for SimilarityForest {
    /// Divergence depth summed over every tree.
    fn distance(&self, xi: ArrayView1<f64>, xj: ArrayView1<f64>) -> usize {
        self.estimators
            .iter()
            .map(|tree| tree.distance(xi, xj))
            .sum()
    }
}
