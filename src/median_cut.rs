//! Median-cut partitioning of sampled colors into seed clusters.
//!
//! Starts from one box around every [`ColorPoint`] and greedily splits the
//! box with the widest channel range at its population-weighted median,
//! until the requested number of boxes exists or nothing is left to split.
//! Each final box reduces to its population-weighted mean color, which seeds
//! the refinement stage.

use crate::types::{Centroid, ColorPoint};
use ordered_float::OrderedFloat;

/// A working partition of point indices with cached channel bounds.
#[derive(Debug, Clone)]
struct ColorBox {
    /// Indices into the shared point slice. Every point belongs to exactly
    /// one box at any time during splitting.
    indices: Vec<usize>,
    /// Per-channel minima over the member points' mean colors.
    min: [f32; 3],
    /// Per-channel maxima over the member points' mean colors.
    max: [f32; 3],
    /// Total population of the member points.
    population: u64,
    /// Creation sequence number, for the earliest-created tie-break.
    seq: u64,
}

impl ColorBox {
    /// Builds a box around `indices`, computing bounds and population.
    fn new(indices: Vec<usize>, points: &[ColorPoint], seq: u64) -> Self {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        let mut population = 0u64;
        for &index in &indices {
            let point = &points[index];
            for channel in 0..3 {
                min[channel] = min[channel].min(point.srgb[channel]);
                max[channel] = max[channel].max(point.srgb[channel]);
            }
            population += u64::from(point.population);
        }
        Self { indices, min, max, population, seq }
    }

    /// The widest channel range.
    fn range(&self) -> f32 {
        (0..3)
            .map(|channel| self.max[channel] - self.min[channel])
            .fold(0.0, f32::max)
    }

    /// The channel with the widest range.
    fn widest_channel(&self) -> usize {
        (0..3)
            .max_by_key(|&channel| OrderedFloat(self.max[channel] - self.min[channel]))
            .unwrap_or(0)
    }

    /// The population-weighted mean color of the member points.
    fn centroid(&self, points: &[ColorPoint]) -> Centroid {
        let mut sums = [0.0f64; 3];
        for &index in &self.indices {
            let point = &points[index];
            let weight = f64::from(point.population);
            for channel in 0..3 {
                sums[channel] += f64::from(point.srgb[channel]) * weight;
            }
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let mean = sums.map(|sum| (sum / self.population as f64) as f32);
        Centroid::new(mean, self.population)
    }
}

/// Splits `points` into at most `base_count` boxes and reduces each to its
/// population-weighted mean color.
///
/// Splitting stops when enough boxes exist, when no box holds more than one
/// point, or when the selected box cannot be divided: if the weighted-median
/// index degenerates to an empty half, a plain half-length split is tried,
/// and if that is degenerate too the entire loop terminates without trying
/// other boxes.
#[must_use]
pub fn seed_centroids(points: &[ColorPoint], base_count: u16) -> Vec<Centroid> {
    if points.is_empty() || base_count == 0 {
        return Vec::new();
    }

    let mut seq = 0u64;
    let mut boxes = vec![ColorBox::new((0..points.len()).collect(), points, seq)];

    while boxes.len() < usize::from(base_count) {
        // Widest box first; ties go to the more populous, then the earliest
        // created. The comparator is a total order, so max_by is unambiguous.
        let Some((target, _)) = boxes.iter().enumerate().max_by(|(_, a), (_, b)| {
            OrderedFloat(a.range())
                .cmp(&OrderedFloat(b.range()))
                .then(a.population.cmp(&b.population))
                .then(b.seq.cmp(&a.seq))
        }) else {
            break;
        };
        if boxes[target].indices.len() <= 1 {
            break;
        }

        let channel = boxes[target].widest_channel();
        let mut order = boxes[target].indices.clone();
        order.sort_by_key(|&index| OrderedFloat(points[index].srgb[channel]));

        let total = boxes[target].population;
        let mut cut = 0;
        let mut accumulated = 0u64;
        for (position, &index) in order.iter().enumerate() {
            accumulated += u64::from(points[index].population);
            if accumulated * 2 >= total {
                cut = position;
                break;
            }
        }
        if cut == 0 || cut == order.len() {
            cut = order.len() / 2;
            if cut == 0 || cut == order.len() {
                break;
            }
        }

        let upper = order.split_off(cut);
        seq += 1;
        boxes[target] = ColorBox::new(order, points, seq);
        seq += 1;
        boxes.push(ColorBox::new(upper, points, seq));
    }

    boxes.iter().map(|part| part.centroid(points)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn point(rgb: [f32; 3], population: u32) -> ColorPoint {
        ColorPoint::new(rgb, population, 0)
    }

    #[test]
    fn empty_input_seeds_nothing() {
        assert!(seed_centroids(&[], 8).is_empty());
        assert!(seed_centroids(&[point([1.0, 2.0, 3.0], 1)], 0).is_empty());
    }

    #[test]
    fn single_point_seeds_single_centroid() {
        let points = [point([200.0, 50.0, 50.0], 10)];
        let centroids = seed_centroids(&points, 8);

        assert_eq!(centroids.len(), 1);
        assert_eq!(centroids[0].srgb, [200.0, 50.0, 50.0]);
        assert_eq!(centroids[0].population, 10);
    }

    #[test]
    fn well_separated_points_each_get_a_box() {
        let points = [
            point([255.0, 0.0, 0.0], 25),
            point([0.0, 255.0, 0.0], 25),
            point([0.0, 0.0, 255.0], 25),
            point([255.0, 255.0, 0.0], 25),
        ];
        let mut centroids = seed_centroids(&points, 4);

        assert_eq!(centroids.len(), 4);
        centroids.sort_by_key(|c| c.srgb.map(OrderedFloat));
        let colors: Vec<[f32; 3]> = centroids.iter().map(|c| c.srgb).collect();
        assert_eq!(
            colors,
            vec![
                [0.0, 0.0, 255.0],
                [0.0, 255.0, 0.0],
                [255.0, 0.0, 0.0],
                [255.0, 255.0, 0.0],
            ]
        );
    }

    #[test]
    fn never_produces_more_boxes_than_points() {
        let points = [point([0.0, 0.0, 0.0], 1), point([255.0, 255.0, 255.0], 1)];
        let centroids = seed_centroids(&points, 8);
        assert_eq!(centroids.len(), 2);
    }

    #[test]
    fn splits_along_the_widest_channel_at_the_weighted_median() {
        // Red spans 0..=200 while green only spans 0..=40, so the first cut
        // divides along red. The heavy point pulls the median toward it.
        let points = [
            point([0.0, 0.0, 0.0], 90),
            point([100.0, 40.0, 0.0], 5),
            point([200.0, 20.0, 0.0], 5),
        ];
        let centroids = seed_centroids(&points, 2);

        assert_eq!(centroids.len(), 2);
        assert_eq!(centroids[0].srgb, [0.0, 0.0, 0.0]);
        assert_eq!(centroids[0].population, 90);
        assert_eq!(centroids[1].population, 10);
        assert!((centroids[1].srgb[0] - 150.0).abs() < 1e-3);
    }

    #[test]
    fn centroid_is_population_weighted() {
        let points = [point([0.0, 0.0, 0.0], 30), point([10.0, 0.0, 0.0], 10)];
        let centroids = seed_centroids(&points, 1);

        assert_eq!(centroids.len(), 1);
        assert!((centroids[0].srgb[0] - 2.5).abs() < 1e-6);
        assert_eq!(centroids[0].population, 40);
    }

    #[test]
    fn two_point_boxes_still_split() {
        // The weighted median lands on index 0 (degenerate), so the
        // half-length fallback splits 1/1.
        let points = [point([0.0, 0.0, 0.0], 99), point([255.0, 0.0, 0.0], 1)];
        let centroids = seed_centroids(&points, 2);
        assert_eq!(centroids.len(), 2);
    }
}
