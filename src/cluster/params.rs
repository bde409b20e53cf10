use std::str::FromStr;

use crate::{
    errors::SimForestError,
    forest::params::{SimilarityForestParams, SimilarityForestParamsBuilder},
    projection::Projection,
};

/// Distance between two clusters when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    #[default]
    Single,
    Complete,
    Average,
}

impl FromStr for Linkage {
    type Err = SimForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Linkage::Single),
            "complete" => Ok(Linkage::Complete),
            "average" => Ok(Linkage::Average),
            _ => Err(SimForestError::InvalidParameter(format!(
                "unknown linkage `{}`, expected one of: single, complete, average",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClusterParams {
    pub forest_params: SimilarityForestParams,
    pub n_clusters: usize,
    pub linkage: Linkage,
}

// Builder for ClusterParams
#[derive(Debug, Clone)]
pub struct ClusterParamsBuilder {
    forest_params_builder: SimilarityForestParamsBuilder,
    n_clusters: usize,
    linkage: Linkage,
}

impl ClusterParamsBuilder {
    pub fn new() -> Self {
        Self {
            forest_params_builder: SimilarityForestParamsBuilder::new(),
            n_clusters: 3,
            linkage: Linkage::Single,
        }
    }

    pub fn n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    // Convenience methods for nested parameters
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.forest_params_builder = self.forest_params_builder.n_estimators(n_estimators);
        self
    }

    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.forest_params_builder = self.forest_params_builder.bootstrap(bootstrap);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.forest_params_builder = self.forest_params_builder.seed(seed);
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.forest_params_builder = self.forest_params_builder.max_depth(max_depth);
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.forest_params_builder = self.forest_params_builder.projection(projection);
        self
    }

    pub fn build(self) -> ClusterParams {
        ClusterParams {
            forest_params: self.forest_params_builder.build(),
            n_clusters: self.n_clusters,
            linkage: self.linkage,
        }
    }
}

impl Default for ClusterParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ClusterParams {
    fn default() -> Self {
        ClusterParamsBuilder::new().build()
    }
}
