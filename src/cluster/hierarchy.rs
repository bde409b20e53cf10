use std::collections::HashMap;

use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::errors::{SimForestError, SimForestResult};

use super::params::Linkage;

/// Position of the pair `i < j` in a row-major condensed distance vector over `n` points.
#[inline]
pub fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

/// Agglomerative clustering over a condensed distance vector.
///
/// Returns one row per merge, `[cluster_a, cluster_b, distance, size]`. Clusters `0..n` are
/// the input points, the cluster created by merge `k` gets id `n + k`.
pub fn linkage(
    condensed: ArrayView1<f64>,
    n: usize,
    method: Linkage,
) -> SimForestResult<Array2<f64>> {
    let expected = n * n.saturating_sub(1) / 2;
    if condensed.len() != expected {
        return Err(SimForestError::InvalidParameter(format!(
            "condensed distances of length {} do not describe {} points (expected {})",
            condensed.len(),
            n,
            expected
        )));
    }

    let mut distances = Array2::<f64>::zeros((n, n));
    for ((i, j), &d) in (0..n).tuple_combinations().zip(condensed.iter()) {
        distances[[i, j]] = d;
        distances[[j, i]] = d;
    }

    // Slots of `distances` still holding a live cluster. A merge keeps the lower slot.
    let mut active: Vec<usize> = (0..n).collect();
    let mut ids: Vec<usize> = (0..n).collect();
    let mut sizes = vec![1usize; n];
    let mut links = Array2::<f64>::zeros((n.saturating_sub(1), 4));

    for step in 0..n.saturating_sub(1) {
        let Some((a, b)) = active
            .iter()
            .copied()
            .tuple_combinations()
            .min_by(|&(a1, b1), &(a2, b2)| {
                distances[[a1, b1]].total_cmp(&distances[[a2, b2]])
            })
        else {
            break;
        };

        let merged_size = sizes[a] + sizes[b];
        let mut link = links.row_mut(step);
        link[0] = ids[a].min(ids[b]) as f64;
        link[1] = ids[a].max(ids[b]) as f64;
        link[2] = distances[[a, b]];
        link[3] = merged_size as f64;

        for &k in &active {
            if k == a || k == b {
                continue;
            }
            let (d_a, d_b) = (distances[[a, k]], distances[[b, k]]);
            let d = match method {
                Linkage::Single => d_a.min(d_b),
                Linkage::Complete => d_a.max(d_b),
                Linkage::Average => {
                    (sizes[a] as f64 * d_a + sizes[b] as f64 * d_b) / merged_size as f64
                }
            };
            distances[[a, k]] = d;
            distances[[k, a]] = d;
        }

        sizes[a] = merged_size;
        ids[a] = n + step;
        active.retain(|&k| k != b);
    }

    Ok(links)
}

/// Flat cluster labels obtained by replaying the first `n - n_clusters` merges of `links`.
/// Labels are numbered from 0 in order of first appearance.
pub fn cut_tree(links: ArrayView2<f64>, n: usize, n_clusters: usize) -> Array1<usize> {
    let mut parent: Vec<usize> = (0..(2 * n).saturating_sub(1)).collect();
    let n_merges = n.saturating_sub(n_clusters.max(1)).min(links.nrows());
    for (step, link) in links.outer_iter().take(n_merges).enumerate() {
        parent[link[0] as usize] = n + step;
        parent[link[1] as usize] = n + step;
    }

    let find = |mut id: usize| {
        while parent[id] != id {
            id = parent[id];
        }
        id
    };

    let mut labels: HashMap<usize, usize> = HashMap::new();
    (0..n)
        .map(|i| {
            let next = labels.len();
            *labels.entry(find(i)).or_insert(next)
        })
        .collect()
}
