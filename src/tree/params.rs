use crate::{
    errors::{SimForestError, SimForestResult},
    projection::Projection,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityTreeParams {
    /// Depth at which nodes stop splitting. `None` grows until every leaf is pure.
    pub max_depth: Option<usize>,
    pub projection: Projection,
}

impl SimilarityTreeParams {
    pub fn validate(&self) -> SimForestResult<()> {
        if self.max_depth == Some(0) {
            return Err(SimForestError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// Builder for SimilarityTreeParams
#[derive(Debug, Clone)]
pub struct SimilarityTreeParamsBuilder {
    max_depth: Option<usize>,
    projection: Projection,
}

impl SimilarityTreeParamsBuilder {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            projection: Projection::Dot,
        }
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn build(self) -> SimilarityTreeParams {
        SimilarityTreeParams {
            max_depth: self.max_depth,
            projection: self.projection,
        }
    }
}

impl Default for SimilarityTreeParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SimilarityTreeParams {
    fn default() -> Self {
        SimilarityTreeParamsBuilder::new().build()
    }
}
