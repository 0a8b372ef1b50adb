//! Pixel sampling and coarse quantization.
//!
//! Scans the (downscaled) image with a row-major stride and bins every
//! sampled pixel into a bucket keyed by its reduced-precision color. Each
//! bucket tracks how many pixels it absorbed, their channel sums, and which
//! cells of a fixed 6x6 spatial grid they came from. The buckets are then
//! reduced to [`ColorPoint`]s ordered by bucket key — the fixed order every
//! downstream sort and tie-break builds on.

use crate::{
    types::{BucketBits, ColorPoint},
    CELL_GRID,
};
use image::{
    imageops::{self, FilterType},
    RgbaImage,
};
use std::{borrow::Cow, collections::HashMap};

/// Aggregate of all sampled pixels sharing one quantized color.
#[derive(Debug, Clone, Copy, Default)]
struct ColorBucket {
    /// Number of sampled pixels binned here.
    population: u32,
    /// Per-channel sums of the binned pixels' 8-bit values.
    sums: [u64; 3],
    /// Bitmask of spatial cells touched.
    cells: u64,
}

/// Downscales `image` so its longest side is at most `max_dimension`,
/// preserving aspect ratio with a minimum of one pixel per side.
///
/// Images already within bounds are returned borrowed; this only ever
/// shrinks, never enlarges. Resampling uses Lanczos3.
#[must_use]
pub fn downscale_to_fit(image: &RgbaImage, max_dimension: u32) -> Cow<'_, RgbaImage> {
    let max_dimension = max_dimension.max(1);
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_dimension || width == 0 || height == 0 {
        return Cow::Borrowed(image);
    }

    #[allow(clippy::cast_possible_truncation)]
    let scaled = |side: u32| {
        ((u64::from(side) * u64::from(max_dimension)) / u64::from(longest)).max(1) as u32
    };
    Cow::Owned(imageops::resize(
        image,
        scaled(width),
        scaled(height),
        FilterType::Lanczos3,
    ))
}

/// Collects the distinct quantized colors of `image`.
///
/// Every row is scanned and every `step`-th column sampled, where
/// `step = max(1, pixels / max_sample_pixels)` — a deterministic stride, not
/// a random sample. Each sampled pixel quantizes to `bucket_bits` significant
/// bits per channel; the three reduced channels concatenate into the bucket
/// key. A zero-area image yields an empty vector, not an error.
#[must_use]
pub fn color_points(
    image: &RgbaImage,
    bucket_bits: BucketBits,
    max_sample_pixels: u32,
) -> Vec<ColorPoint> {
    let (width, height) = image.dimensions();
    let total = u64::from(width) * u64::from(height);
    if total == 0 {
        return Vec::new();
    }

    let step = (total / u64::from(max_sample_pixels.max(1))).max(1);
    let bits = u32::from(bucket_bits.into_inner());
    let shift = 8 - bits;

    let mut buckets: HashMap<u32, ColorBucket> = HashMap::new();
    for y in 0..height {
        let mut x = 0u64;
        while x < u64::from(width) {
            #[allow(clippy::cast_possible_truncation)]
            let column = x as u32;
            let [r, g, b, _] = image.get_pixel(column, y).0;

            let key = (u32::from(r >> shift) << (2 * bits))
                | (u32::from(g >> shift) << bits)
                | u32::from(b >> shift);

            let bucket = buckets.entry(key).or_default();
            bucket.population += 1;
            bucket.sums[0] += u64::from(r);
            bucket.sums[1] += u64::from(g);
            bucket.sums[2] += u64::from(b);
            bucket.cells |= 1u64 << cell_index(column, y, width, height);

            x += step;
        }
    }

    let mut keyed: Vec<(u32, ColorBucket)> = buckets.into_iter().collect();
    keyed.sort_unstable_by_key(|&(key, _)| key);

    keyed
        .into_iter()
        .map(|(_, bucket)| {
            let n = f64::from(bucket.population);
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let mean = bucket.sums.map(|sum| (sum as f64 / n) as f32);
            ColorPoint::new(mean, bucket.population, bucket.cells)
        })
        .collect()
}

/// The spatial cell of pixel `(x, y)` on the fixed 6x6 grid, with both grid
/// indices clamped to the grid bounds.
fn cell_index(x: u32, y: u32, width: u32, height: u32) -> u32 {
    let column = ((u64::from(x) * u64::from(CELL_GRID)) / u64::from(width.max(1))).min(u64::from(CELL_GRID - 1));
    let row = ((u64::from(y) * u64::from(CELL_GRID)) / u64::from(height.max(1))).min(u64::from(CELL_GRID - 1));
    #[allow(clippy::cast_possible_truncation)]
    {
        (row * u64::from(CELL_GRID) + column) as u32
    }
}
