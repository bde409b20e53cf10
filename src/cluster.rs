use log::info;
use ndarray::{Array1, Array2, ArrayView2};

use crate::{
    errors::{SimForestError, SimForestResult},
    forest::{self, SimilarityForest},
};

pub mod hierarchy;
pub mod params;

pub use hierarchy::{condensed_index, cut_tree, linkage};
pub use params::{ClusterParams, ClusterParamsBuilder, Linkage};

/// Flat clustering of the rows a similarity forest was fit on.
#[derive(Debug, Clone)]
pub struct SimilarityForestCluster {
    forest: SimilarityForest,
    links: Array2<f64>,
    labels: Array1<usize>,
}

impl SimilarityForestCluster {
    /// Fits a forest on `x`, links the rows by their condensed dissimilarities and cuts the
    /// hierarchy into `n_clusters` groups.
    pub fn fit_predict(
        x: ArrayView2<f64>,
        hyperparameters: &ClusterParams,
    ) -> SimForestResult<Self> {
        let ClusterParams {
            forest_params,
            n_clusters,
            linkage: method,
        } = hyperparameters;
        let n = x.nrows();

        if *n_clusters == 0 || (n > 0 && *n_clusters > n) {
            return Err(SimForestError::InvalidParameter(format!(
                "n_clusters must be between 1 and the number of rows ({}), got {}",
                n, n_clusters
            )));
        }

        let forest = forest::fit(x, forest_params)?;
        let condensed = forest.predict_condensed(x)?;
        let links = linkage(condensed.view(), n, *method)?;
        let labels = cut_tree(links.view(), n, *n_clusters);

        info!(
            "clustered {} rows into {} clusters ({:?} linkage, {} trees)",
            n,
            n_clusters,
            method,
            forest.estimators().len()
        );

        Ok(Self {
            forest,
            links,
            labels,
        })
    }

    pub fn forest(&self) -> &SimilarityForest {
        &self.forest
    }

    /// Merge history, `[cluster_a, cluster_b, distance, size]` per row.
    pub fn links(&self) -> &Array2<f64> {
        &self.links
    }

    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    pub fn into_labels(self) -> Array1<usize> {
        self.labels
    }
}
