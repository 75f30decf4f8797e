// Kernel-transformed k-means over co-usage rows

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Gaussian kernel bandwidth (denominator of the exponent)
pub const AFFINITY_BANDWIDTH: f64 = 0.2;

/// Hard cap on k-means refinement rounds
pub const MAX_KMEANS_ITERATIONS: usize = 100;

/// Cluster assignment of every symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// 0-based cluster label per symbol, aligned with the input rows
    pub labels: Vec<usize>,
    /// `max(label) + 1`; may count labels that ended up without members
    pub num_clusters: usize,
    /// Balance measure in (0, 1]
    pub quality_score: f64,
}

/// Gaussian kernel over the max-normalized co-usage matrix
///
/// `A[i][j] = exp(-x² / 0.2)` with `x = M[i][j] / max(M)` (or `M[i][j]` when
/// the matrix is all zeros).
pub fn compute_affinity_matrix(co_usage: &[Vec<u32>]) -> Vec<Vec<f64>> {
    let max = co_usage
        .iter()
        .flat_map(|row| row.iter().copied())
        .max()
        .unwrap_or(0);
    let scale = if max == 0 { 1.0 } else { max as f64 };

    co_usage
        .iter()
        .map(|row| {
            row.iter()
                .map(|&count| {
                    let x = count as f64 / scale;
                    (-(x * x) / AFFINITY_BANDWIDTH).exp()
                })
                .collect()
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Lloyd's k-means with randomly chosen distinct rows as initial centroids
///
/// `k` is clamped to `1..=rows`. A centroid that loses all members keeps its
/// previous position. Ties go to the lowest centroid index.
pub fn kmeans<R: Rng + ?Sized>(
    features: &[Vec<f64>],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Vec<usize> {
    let n = features.len();
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);
    let dim = features[0].len();

    let mut centroids: Vec<Vec<f64>> = index::sample(rng, n, k)
        .into_iter()
        .map(|i| features[i].clone())
        .collect();
    let mut labels = vec![0usize; n];

    for iteration in 0..max_iterations {
        let mut changed = false;
        for (point, label) in features.iter().zip(labels.iter_mut()) {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let distance = squared_distance(point, centroid);
                if distance < best_distance {
                    best = c;
                    best_distance = distance;
                }
            }
            if *label != best {
                *label = best;
                changed = true;
            }
        }

        if iteration > 0 && !changed {
            break;
        }

        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];
        for (point, &label) in features.iter().zip(&labels) {
            counts[label] += 1;
            for (acc, value) in sums[label].iter_mut().zip(point) {
                *acc += value;
            }
        }
        for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
            if count > 0 {
                *centroid = sum.into_iter().map(|v| v / count as f64).collect();
            }
        }
    }

    labels
}

/// Average member share per label, divided again by the label count
fn quality_score(labels: &[usize], num_clusters: usize) -> f64 {
    if labels.is_empty() || num_clusters == 0 {
        return 1.0;
    }

    let total = labels.len() as f64;
    let mut counts = vec![0usize; num_clusters];
    for &label in labels {
        counts[label] += 1;
    }

    let average_share =
        counts.iter().map(|&c| c as f64 / total).sum::<f64>() / num_clusters as f64;
    average_share / num_clusters as f64
}

/// Cluster symbols from their co-usage matrix
///
/// # Example
/// ```
/// use buildlens::header_split::perform_spectral_clustering;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let matrix = vec![
///     vec![10, 9, 1, 0],
///     vec![9, 10, 0, 1],
///     vec![1, 0, 10, 9],
///     vec![0, 1, 9, 10],
/// ];
/// let mut rng = StdRng::seed_from_u64(7);
/// let result = perform_spectral_clustering(&matrix, 2, &mut rng);
///
/// assert_eq!(result.labels.len(), 4);
/// assert!(result.num_clusters <= 2);
/// assert!(result.quality_score > 0.0 && result.quality_score <= 1.0);
/// ```
pub fn perform_spectral_clustering<R: Rng + ?Sized>(
    co_usage: &[Vec<u32>],
    k: usize,
    rng: &mut R,
) -> ClusteringResult {
    let affinity = compute_affinity_matrix(co_usage);
    let labels = kmeans(&affinity, k, MAX_KMEANS_ITERATIONS, rng);
    let num_clusters = labels.iter().max().map_or(0, |&max| max + 1);
    let quality_score = quality_score(&labels, num_clusters);

    ClusteringResult {
        labels,
        num_clusters,
        quality_score,
    }
}
