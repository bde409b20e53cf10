//! Errors raised while configuring, fitting or querying similarity trees.

/// Helper type for a call that could go wrong.
pub type SimForestResult<T> = Result<T, SimForestError>;

#[derive(Debug, thiserror::Error)]
pub enum SimForestError {
    #[error("unknown projection kind `{0}`, expected one of: dot, sqeuclidean, rbf")]
    UnknownProjection(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("input matrix has no rows or no columns")]
    EmptyInput,

    #[error("dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The purity check let through a subset where every row equals the first split point.
    #[error("no row differs from the first split point among {n_rows} rows at depth {depth}")]
    InvariantViolation { depth: usize, n_rows: usize },

    #[error("pair ({i}, {j}) has a zero accumulated divergence depth")]
    DegenerateAggregation { i: usize, j: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not parse `{value}` as a number on line {line}")]
    Parse { line: usize, value: String },
}
