pub mod cluster;
pub mod data;
pub mod errors;
pub mod forest;
pub mod projection;
pub mod test_data;
pub mod tree;

use ndarray::ArrayView1;

pub use errors::{SimForestError, SimForestResult};
pub use projection::Projection;

pub trait FittedModel {
    /// Depth at which the paths of `xi` and `xj` part ways.
    fn distance(&self, xi: ArrayView1<f64>, xj: ArrayView1<f64>) -> usize;
}
