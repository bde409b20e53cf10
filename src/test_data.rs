use ndarray::{array, Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Two tight groups of two points in the plane, far apart.
pub fn two_clusters() -> Array2<f64> {
    array![[0.0, 0.0], [0.1, 0.0], [10.0, 10.0], [10.1, 10.0]]
}

/// `n_per_blob` points jittered by at most 0.5 around (0, 0), then as many around (50, 50).
/// Returns the points and the blob each one was drawn from.
pub fn two_blobs(n_per_blob: usize, seed: u64) -> (Array2<f64>, Array1<usize>) {
    blobs(&[[0.0, 0.0], [50.0, 50.0]], n_per_blob, 0.5, seed)
}

/// Points drawn uniformly within `spread` of each center, grouped by center.
pub fn blobs(
    centers: &[[f64; 2]],
    n_per_blob: usize,
    spread: f64,
    seed: u64,
) -> (Array2<f64>, Array1<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = centers.len() * n_per_blob;
    let mut x = Array2::zeros((n, 2));
    let mut y = Array1::zeros(n);

    for (c, center) in centers.iter().enumerate() {
        for k in 0..n_per_blob {
            let i = c * n_per_blob + k;
            x[[i, 0]] = center[0] + rng.gen_range(-spread..spread);
            x[[i, 1]] = center[1] + rng.gen_range(-spread..spread);
            y[i] = c;
        }
    }
    (x, y)
}

/// Uniform noise in `[-scale, scale)`.
pub fn uniform(n: usize, m: usize, scale: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((n, m), |_| rng.gen_range(-scale..scale))
}
