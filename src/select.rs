//! Final palette assembly.
//!
//! Orders the refined centroids deterministically, pads from the raw sampled
//! colors when clustering produced too few, and synthesizes a bright variant
//! for every base color by lifting its CIELAB lightness.

use crate::{
    colorspace,
    types::{Centroid, ColorPoint, TerminalPalette},
};
use ordered_float::OrderedFloat;
use palette::Srgb;
use std::cmp::Reverse;

/// Builds the final palette from refined centroids.
///
/// Centroids are ordered by population descending, ties by L* then a* then
/// b* ascending — a total order, so equal-population centroids always come
/// out darkest first. If fewer than `base_count` centroids exist, the raw
/// sampled colors fill the gap (most populous first, exact duplicates
/// skipped). Each base color then gets a bright variant `brightness_delta`
/// higher in L*, and the palette is bases followed by brights.
#[must_use]
pub fn build_palette(
    points: &[ColorPoint],
    mut centroids: Vec<Centroid>,
    base_count: u16,
    brightness_delta: f32,
) -> TerminalPalette {
    if points.is_empty() || base_count == 0 {
        return TerminalPalette::default();
    }

    centroids.sort_by_key(|centroid| {
        (
            Reverse(centroid.population),
            OrderedFloat(centroid.lab.l),
            OrderedFloat(centroid.lab.a),
            OrderedFloat(centroid.lab.b),
        )
    });

    let base_count = usize::from(base_count);
    let mut base: Vec<Srgb<u8>> = centroids
        .iter()
        .take(base_count)
        .map(|centroid| colorspace::srgb_to_u8(centroid.srgb))
        .collect();

    if base.len() < base_count {
        // Stable sort: equal populations stay in bucket-key order.
        let mut by_population: Vec<&ColorPoint> = points.iter().collect();
        by_population.sort_by_key(|point| Reverse(point.population));

        for point in by_population {
            if base.len() >= base_count {
                break;
            }
            let color = colorspace::srgb_to_u8(point.srgb);
            if !base.contains(&color) {
                base.push(color);
            }
        }
    }

    let bright = base
        .iter()
        .map(|&color| brighten(color, brightness_delta))
        .collect();

    TerminalPalette::new(base, bright)
}

/// Synthesizes the bright variant of `color`: its CIELAB lightness is raised
/// by `delta` (capped at 100) and the result converted back to sRGB with
/// channel clamping.
#[must_use]
pub fn brighten(color: Srgb<u8>, delta: f32) -> Srgb<u8> {
    let mut lab = colorspace::lab_from_srgb([
        f32::from(color.red),
        f32::from(color.green),
        f32::from(color.blue),
    ]);
    lab.l = (lab.l + delta).min(100.0);
    colorspace::srgb_from_lab(lab).into_format()
}
