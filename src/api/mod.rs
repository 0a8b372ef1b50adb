//! Contains the types and functions for the high level extraction API.

mod session;

pub use session::{Debounce, PaletteSession, DEFAULT_DEBOUNCE};

use crate::{
    kmeans, median_cut, sample, select,
    types::{BucketBits, TerminalPalette},
};
use image::RgbaImage;

/// Default longest-side bound applied before sampling.
pub const DEFAULT_MAX_DIMENSION: u32 = 500;

/// Default budget of sampled pixels per image.
pub const DEFAULT_MAX_SAMPLE_PIXELS: u32 = 60_000;

/// Default number of base colors (the palette doubles this with brights).
pub const DEFAULT_BASE_COUNT: u16 = 8;

/// Default L* offset applied when synthesizing bright variants.
pub const DEFAULT_BRIGHTNESS_DELTA: f32 = 22.0;

/// A builder struct to configure and run palette extraction.
///
/// Runs the full pipeline: downscale, stride-sample into color buckets,
/// median-cut seeding, CIEDE2000 refinement, and palette assembly. The same
/// configured [`Extractor`] can be reused across wallpapers; extraction is
/// pure and deterministic in its inputs.
///
/// # Examples
/// ```
/// # use termtint::{BucketBits, Extractor};
/// let extractor = Extractor::new()
///     .max_dimension(500)
///     .max_sample_pixels(60_000)
///     .bucket_bits(BucketBits::default())
///     .base_count(8)
///     .brightness_delta(22.0);
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    /// Longest-side bound applied before sampling.
    max_dimension: u32,
    /// Budget of sampled pixels.
    max_sample_pixels: u32,
    /// Significant bits kept per channel when bucketing.
    bucket_bits: BucketBits,
    /// Number of base colors to produce.
    base_count: u16,
    /// L* offset for bright variants.
    brightness_delta: f32,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Creates an [`Extractor`] with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_sample_pixels: DEFAULT_MAX_SAMPLE_PIXELS,
            bucket_bits: BucketBits::default(),
            base_count: DEFAULT_BASE_COUNT,
            brightness_delta: DEFAULT_BRIGHTNESS_DELTA,
        }
    }

    /// Sets the longest-side bound applied before sampling. Zero is treated
    /// as one.
    #[must_use]
    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    /// Sets the sampled-pixel budget. Zero is treated as one.
    #[must_use]
    pub fn max_sample_pixels(mut self, max_sample_pixels: u32) -> Self {
        self.max_sample_pixels = max_sample_pixels.max(1);
        self
    }

    /// Sets how many significant bits each channel keeps when bucketing.
    #[must_use]
    pub fn bucket_bits(mut self, bucket_bits: BucketBits) -> Self {
        self.bucket_bits = bucket_bits;
        self
    }

    /// Sets the number of base colors. Zero is treated as one. The final
    /// palette holds at most twice this many colors.
    #[must_use]
    pub fn base_count(mut self, base_count: u16) -> Self {
        self.base_count = base_count.max(1);
        self
    }

    /// Sets the L* offset for bright variants, clamped into `[0, 100]`.
    #[must_use]
    pub fn brightness_delta(mut self, brightness_delta: f32) -> Self {
        self.brightness_delta = brightness_delta.clamp(0.0, 100.0);
        self
    }

    /// Derives the palette for `image`.
    ///
    /// A zero-area image yields an empty palette — "nothing available",
    /// never an error.
    #[must_use]
    pub fn extract(&self, image: &RgbaImage) -> TerminalPalette {
        let fitted = sample::downscale_to_fit(image, self.max_dimension);
        let points = sample::color_points(&fitted, self.bucket_bits, self.max_sample_pixels);
        if points.is_empty() {
            return TerminalPalette::default();
        }

        let mut centroids = median_cut::seed_centroids(&points, self.base_count);
        kmeans::refine_centroids(&points, &mut centroids);
        select::build_palette(&points, centroids, self.base_count, self.brightness_delta)
    }

    /// Decodes `bytes` and derives the palette. Undecodable input yields an
    /// empty palette.
    #[must_use]
    pub fn extract_bytes(&self, bytes: &[u8]) -> TerminalPalette {
        match image::load_from_memory(bytes) {
            Ok(decoded) => self.extract(&decoded.into_rgba8()),
            Err(_) => TerminalPalette::default(),
        }
    }
}
