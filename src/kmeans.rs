//! Iterative refinement of seed centroids under the CIEDE2000 distance.
//!
//! A bounded k-means loop over the sampled [`ColorPoint`]s: every point is
//! reassigned to its perceptually nearest centroid, then each centroid moves
//! to the population-weighted mean of its members. The loop stops early once
//! the centroids settle.

use crate::{
    colorspace,
    types::{Centroid, ColorPoint},
};

/// Maximum number of reassignment rounds.
const MAX_ITERATIONS: usize = 12;

/// Largest per-channel movement (0-255 scale) still counted as settled.
const CONVERGENCE: f32 = 0.5;

/// Distances closer together than this are treated as a tie.
const DISTANCE_EPSILON: f64 = 1e-9;

/// Refines `centroids` in place against `points`.
///
/// Assignment ties go to the centroid with the larger population, then the
/// lower index. Centroids that attract no points keep their previous value.
/// The number of centroids never changes.
pub fn refine_centroids(points: &[ColorPoint], centroids: &mut [Centroid]) {
    if points.is_empty() || centroids.is_empty() {
        return;
    }

    let mut assignment = vec![0usize; points.len()];
    for _ in 0..MAX_ITERATIONS {
        for (slot, point) in assignment.iter_mut().zip(points) {
            *slot = nearest_centroid(point, centroids);
        }

        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        let mut populations = vec![0u64; centroids.len()];
        for (&cluster, point) in assignment.iter().zip(points) {
            let weight = f64::from(point.population);
            for channel in 0..3 {
                sums[cluster][channel] += f64::from(point.srgb[channel]) * weight;
            }
            populations[cluster] += u64::from(point.population);
        }

        let mut moved = 0.0f32;
        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            if populations[cluster] == 0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let mean =
                sums[cluster].map(|sum| (sum / populations[cluster] as f64) as f32);
            for channel in 0..3 {
                moved = moved.max((mean[channel] - centroid.srgb[channel]).abs());
            }
            *centroid = Centroid::new(mean, populations[cluster]);
        }

        if moved <= CONVERGENCE {
            break;
        }
    }
}

/// The index of the centroid perceptually nearest to `point`.
fn nearest_centroid(point: &ColorPoint, centroids: &[Centroid]) -> usize {
    let mut best = 0usize;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = colorspace::ciede2000(point.lab, centroid.lab);
        if distance < best_distance - DISTANCE_EPSILON {
            best = index;
            best_distance = distance;
        } else if (distance - best_distance).abs() < DISTANCE_EPSILON
            && centroid.population > centroids[best].population
        {
            // Equidistant: the more populous centroid wins; equal populations
            // keep the lower index, which ascending iteration already holds.
            best = index;
        }
    }
    best
}
