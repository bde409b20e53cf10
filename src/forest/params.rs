use crate::{
    projection::Projection,
    tree::params::{SimilarityTreeParams, SimilarityTreeParamsBuilder},
};

/// What the condensed predict reports for a pair whose summed divergence depth is zero.
/// Only a forest without estimators can produce such a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroSumPolicy {
    /// Fail with `SimForestError::DegenerateAggregation`.
    #[default]
    Error,
    /// Report a dissimilarity of zero.
    Zero,
}

#[derive(Debug, Clone)]
pub struct SimilarityForestParams {
    pub n_estimators: usize,
    pub bootstrap: bool,
    pub seed: u64,
    pub zero_sum_policy: ZeroSumPolicy,
    pub tree_params: SimilarityTreeParams,
}

// Builder for SimilarityForestParams
#[derive(Debug, Clone)]
pub struct SimilarityForestParamsBuilder {
    n_estimators: usize,
    bootstrap: bool,
    seed: u64,
    zero_sum_policy: ZeroSumPolicy,
    tree_params_builder: SimilarityTreeParamsBuilder,
}

impl SimilarityForestParamsBuilder {
    pub fn new() -> Self {
        Self {
            n_estimators: 20,
            bootstrap: false,
            seed: 42,
            zero_sum_policy: ZeroSumPolicy::Error,
            tree_params_builder: SimilarityTreeParamsBuilder::new(),
        }
    }

    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn zero_sum_policy(mut self, zero_sum_policy: ZeroSumPolicy) -> Self {
        self.zero_sum_policy = zero_sum_policy;
        self
    }

    // Convenience methods for SimilarityTreeParams configuration
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.tree_params_builder = self.tree_params_builder.max_depth(max_depth);
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.tree_params_builder = self.tree_params_builder.projection(projection);
        self
    }

    pub fn build(self) -> SimilarityForestParams {
        SimilarityForestParams {
            n_estimators: self.n_estimators,
            bootstrap: self.bootstrap,
            seed: self.seed,
            zero_sum_policy: self.zero_sum_policy,
            tree_params: self.tree_params_builder.build(),
        }
    }
}

impl Default for SimilarityForestParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SimilarityForestParams {
    fn default() -> Self {
        SimilarityForestParamsBuilder::new().build()
    }
}
