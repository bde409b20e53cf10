use log::debug;
use ndarray::ArrayView2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    errors::{SimForestError, SimForestResult},
    tree::{self, SimilarityTree, SimilarityTreeParams},
};

use super::{params::SimilarityForestParams, SimilarityForest};

#[cfg(feature = "use-rayon")]
use rayon::prelude::*;

/// Fits a forest with a random stream seeded from `hyperparameters.seed`.
pub fn fit(
    x: ArrayView2<f64>,
    hyperparameters: &SimilarityForestParams,
) -> SimForestResult<SimilarityForest> {
    let mut rng = StdRng::seed_from_u64(hyperparameters.seed);
    fit_with_rng(x, hyperparameters, &mut rng)
}

/// Fits a forest drawing from a caller supplied random stream. `hyperparameters.seed` is
/// ignored.
pub fn fit_with_rng<R: Rng + ?Sized>(
    x: ArrayView2<f64>,
    hyperparameters: &SimilarityForestParams,
    rng: &mut R,
) -> SimForestResult<SimilarityForest> {
    let SimilarityForestParams {
        n_estimators,
        bootstrap,
        seed: _,
        zero_sum_policy,
        tree_params,
    } = hyperparameters;

    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(SimForestError::EmptyInput);
    }
    tree_params.validate()?;

    // Pre-generate seeds for each tree
    let seeds: Vec<u64> = (0..*n_estimators).map(|_| rng.gen()).collect();

    #[cfg(not(feature = "use-rayon"))]
    let estimators = seeds
        .iter()
        .map(|&seed| fit_estimator(x, *bootstrap, tree_params, seed))
        .collect::<SimForestResult<Vec<SimilarityTree>>>()?;

    #[cfg(feature = "use-rayon")]
    let estimators = seeds
        .into_par_iter()
        .map(|seed| fit_estimator(x, *bootstrap, tree_params, seed))
        .collect::<SimForestResult<Vec<SimilarityTree>>>()?;

    debug!(
        "fitted {} similarity trees on {} rows (bootstrap: {}, projection: {}, max depth: {:?})",
        estimators.len(),
        x.nrows(),
        bootstrap,
        tree_params.projection,
        tree_params.max_depth
    );

    Ok(SimilarityForest::new(
        estimators,
        x.ncols(),
        *bootstrap,
        *zero_sum_policy,
    ))
}

fn fit_estimator(
    x: ArrayView2<f64>,
    bootstrap: bool,
    tree_params: &SimilarityTreeParams,
    seed: u64,
) -> SimForestResult<SimilarityTree> {
    let mut tree_rng = StdRng::seed_from_u64(seed);
    if bootstrap {
        let sample_indices = bootstrap_indices(x.nrows(), &mut tree_rng);
        tree::fit_rows(x, &sample_indices, tree_params, &mut tree_rng)
    } else {
        tree::fit(x, tree_params, &mut tree_rng)
    }
}

/// Draws `n` row indices uniformly with replacement from `0..n`.
pub fn bootstrap_indices<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}
