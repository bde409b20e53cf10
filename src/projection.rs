use std::{fmt, str::FromStr};

use ndarray::ArrayView1;

use crate::errors::SimForestError;

/// Function used to place a point along the split direction drawn through `p` and `q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Dot,
    SquaredEuclidean,
    Rbf,
}

impl Projection {
    #[inline]
    pub fn project(&self, x: ArrayView1<f64>, p: ArrayView1<f64>, q: ArrayView1<f64>) -> f64 {
        match self {
            Projection::Dot => dot_projection(x, p, q),
            Projection::SquaredEuclidean => sqeuclidean_projection(x, p, q),
            Projection::Rbf => rbf_projection(x, p, q),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Projection::Dot => "dot",
            Projection::SquaredEuclidean => "sqeuclidean",
            Projection::Rbf => "rbf",
        }
    }
}

impl FromStr for Projection {
    type Err = SimForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" => Ok(Projection::Dot),
            "sqeuclidean" | "squared_euclidean" | "squared-euclidean" => {
                Ok(Projection::SquaredEuclidean)
            }
            "rbf" => Ok(Projection::Rbf),
            _ => Err(SimForestError::UnknownProjection(s.to_string())),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plain dot product of two vectors of equal length.
#[inline]
pub fn dot(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.dot(&b)
}

/// `x · (q - p)`
pub fn dot_projection(x: ArrayView1<f64>, p: ArrayView1<f64>, q: ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(p.iter().zip(q.iter()))
        .map(|(xi, (pi, qi))| xi * (qi - pi))
        .sum()
}

/// `x · (p - q)`. Orders points like `|x - q|^2 - |x - p|^2`, up to a constant shift.
pub fn sqeuclidean_projection(x: ArrayView1<f64>, p: ArrayView1<f64>, q: ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(p.iter().zip(q.iter()))
        .map(|(xi, (pi, qi))| xi * (pi - qi))
        .sum()
}

/// `exp(-gamma |x - q|^2) - exp(-gamma |x - p|^2)` with `gamma = 1 / m`.
pub fn rbf_projection(x: ArrayView1<f64>, p: ArrayView1<f64>, q: ArrayView1<f64>) -> f64 {
    let gamma = 1.0 / x.len() as f64;
    let (mut d_p, mut d_q) = (0.0, 0.0);
    for ((xi, pi), qi) in x.iter().zip(p.iter()).zip(q.iter()) {
        d_p += (xi - pi).powi(2);
        d_q += (xi - qi).powi(2);
    }
    (-gamma * d_q).exp() - (-gamma * d_p).exp()
}
