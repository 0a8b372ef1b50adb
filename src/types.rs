//! Contains various types needed across the crate.

use crate::colorspace;
use image::{Rgba, RgbaImage};
use palette::{Lab, Srgb};
use std::{
    error::Error,
    fmt::{Debug, Display},
};

/// An error type for when a configuration value falls outside its
/// documented range.
///
/// The inner value is the rejected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OutOfRange<T>(pub T);

impl<T: Display> Display for OutOfRange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "value {} is outside the supported range", self.0)
    }
}

impl<T: Debug + Display> Error for OutOfRange<T> {}

/// The number of significant bits kept per channel when binning sampled
/// pixels into color buckets.
///
/// This is a simple new type wrapper around `u8` with the invariant that the
/// value lies in `2..=6`. More bits keep more distinct colors apart at the
/// cost of larger bucket maps; fewer bits merge similar shades earlier.
///
/// # Examples
/// Use `try_into` or [`BucketBits::from_clamped`] to create [`BucketBits`]:
/// ```
/// # use termtint::{BucketBits, OutOfRange};
/// # fn main() -> Result<(), OutOfRange<u8>> {
/// let bits = BucketBits::try_from(5u8)?;
/// let bits: BucketBits = 5u8.try_into()?;
/// let bits = BucketBits::from_clamped(9); // BucketBits::MAX
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BucketBits(u8);

impl BucketBits {
    /// The minimum supported value, `2`.
    pub const MIN: Self = Self(2);

    /// The maximum supported value, `6`.
    pub const MAX: Self = Self(6);

    /// Gets the inner `u8` value.
    #[must_use]
    pub const fn into_inner(self) -> u8 {
        self.0
    }

    /// Creates a [`BucketBits`] by clamping the given `u8` into `2..=6`.
    #[must_use]
    pub const fn from_clamped(value: u8) -> Self {
        if value < Self::MIN.0 {
            Self::MIN
        } else if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }
}

impl Default for BucketBits {
    fn default() -> Self {
        Self(4)
    }
}

impl From<BucketBits> for u8 {
    fn from(val: BucketBits) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u8> for BucketBits {
    type Error = OutOfRange<u8>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(OutOfRange(value))
        }
    }
}

impl Display for BucketBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// A single distinct quantized color observed during sampling.
///
/// This is the read-only view derived from a color bucket: the bucket's mean
/// sRGB color on a 0-255 scale, how many sampled pixels it absorbed, which
/// spatial cells those pixels came from, and the CIELAB transform of the mean
/// (computed once so the clustering stages never reconvert).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPoint {
    /// Mean sRGB of the originating bucket, each channel in `0.0..=255.0`.
    pub srgb: [f32; 3],
    /// Number of sampled pixels that fell into the bucket.
    pub population: u32,
    /// Bitmask over the 6x6 spatial grid of cells the bucket's pixels touched.
    pub cells: u64,
    /// CIELAB transform of `srgb`. Invariant: always the exact transform of
    /// the mean, never set independently.
    pub lab: Lab,
}

impl ColorPoint {
    /// Creates a point from a bucket's mean color, caching its Lab transform.
    #[must_use]
    pub fn new(srgb: [f32; 3], population: u32, cells: u64) -> Self {
        Self {
            srgb,
            population,
            cells,
            lab: colorspace::lab_from_srgb(srgb),
        }
    }

    /// The number of distinct spatial cells this color was seen in.
    #[must_use]
    pub const fn coverage(&self) -> u32 {
        self.cells.count_ones()
    }
}

/// A population-weighted mean color representing one cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// Weighted mean sRGB, each channel in `0.0..=255.0`.
    pub srgb: [f32; 3],
    /// CIELAB transform of `srgb`, cached like [`ColorPoint::lab`].
    pub lab: Lab,
    /// Total population of the points assigned to this cluster.
    pub population: u64,
}

impl Centroid {
    /// Creates a centroid from a weighted mean color, caching its Lab
    /// transform.
    #[must_use]
    pub fn new(srgb: [f32; 3], population: u64) -> Self {
        Self {
            srgb,
            lab: colorspace::lab_from_srgb(srgb),
            population,
        }
    }
}

/// The ordered color sequence produced by extraction.
///
/// The first half holds the base colors, the second half their bright
/// variants in the same relative order, so index `i` and index
/// `base().len() + i` always form a base/bright pair. An empty palette is a
/// valid value meaning "nothing available", not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalPalette {
    /// Base colors followed by bright variants.
    colors: Vec<Srgb<u8>>,
    /// Number of leading base colors in `colors`.
    base_len: usize,
}

impl TerminalPalette {
    /// Assembles a palette from its base colors and their bright variants.
    pub(crate) fn new(base: Vec<Srgb<u8>>, bright: Vec<Srgb<u8>>) -> Self {
        let base_len = base.len();
        let mut colors = base;
        colors.extend(bright);
        Self { colors, base_len }
    }

    /// All colors, base first, then bright variants.
    #[must_use]
    pub fn colors(&self) -> &[Srgb<u8>] {
        &self.colors
    }

    /// The base colors.
    #[must_use]
    pub fn base(&self) -> &[Srgb<u8>] {
        &self.colors[..self.base_len]
    }

    /// The bright variants, in the same relative order as [`Self::base`].
    #[must_use]
    pub fn bright(&self) -> &[Srgb<u8>] {
        &self.colors[self.base_len..]
    }

    /// Total number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette holds no colors at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors formatted as uppercase `#RRGGBB` strings, in palette order.
    #[must_use]
    pub fn hex(&self) -> Vec<String> {
        self.colors.iter().copied().map(hex_code).collect()
    }

    /// Renders the palette as a grid of solid swatches: one column per base
    /// color, base colors on the top row and bright variants below, each
    /// swatch `cell_size` pixels square.
    ///
    /// Returns `None` for an empty palette or a zero `cell_size`.
    #[must_use]
    pub fn swatch_grid(&self, cell_size: u32) -> Option<RgbaImage> {
        if self.is_empty() || cell_size == 0 {
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let columns = self.base_len as u32;
        let image = RgbaImage::from_fn(columns * cell_size, 2 * cell_size, |x, y| {
            let column = (x / cell_size) as usize;
            let row = (y / cell_size) as usize;
            match self.colors.get(row * self.base_len + column) {
                Some(color) => Rgba([color.red, color.green, color.blue, 0xFF]),
                None => Rgba([0, 0, 0, 0]),
            }
        });

        Some(image)
    }
}

/// Formats a color as an uppercase `#RRGGBB` string.
#[must_use]
pub fn hex_code(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bucket_bits_rejects_out_of_range() {
        assert_eq!(BucketBits::try_from(1), Err(OutOfRange(1)));
        assert_eq!(BucketBits::try_from(7), Err(OutOfRange(7)));
        assert_eq!(BucketBits::try_from(2).unwrap(), BucketBits::MIN);
        assert_eq!(BucketBits::try_from(6).unwrap(), BucketBits::MAX);
    }

    #[test]
    fn bucket_bits_clamps() {
        assert_eq!(BucketBits::from_clamped(0), BucketBits::MIN);
        assert_eq!(BucketBits::from_clamped(4), BucketBits::default());
        assert_eq!(BucketBits::from_clamped(200), BucketBits::MAX);
    }

    #[test]
    fn color_point_caches_exact_lab() {
        let point = ColorPoint::new([255.0, 0.0, 0.0], 1, 0);
        let lab = colorspace::lab_from_srgb([255.0, 0.0, 0.0]);
        assert_eq!(point.lab, lab);
    }

    #[test]
    fn coverage_counts_distinct_cells() {
        let point = ColorPoint::new([0.0, 0.0, 0.0], 4, 0b1011);
        assert_eq!(point.coverage(), 3);
    }

    #[test]
    fn palette_splits_base_and_bright() {
        let base = vec![Srgb::new(1u8, 2, 3), Srgb::new(4u8, 5, 6)];
        let bright = vec![Srgb::new(7u8, 8, 9), Srgb::new(10u8, 11, 12)];
        let palette = TerminalPalette::new(base.clone(), bright.clone());

        assert_eq!(palette.len(), 4);
        assert_eq!(palette.base(), base.as_slice());
        assert_eq!(palette.bright(), bright.as_slice());
    }

    #[test]
    fn empty_palette_is_valid() {
        let palette = TerminalPalette::default();
        assert!(palette.is_empty());
        assert!(palette.base().is_empty());
        assert!(palette.bright().is_empty());
        assert!(palette.hex().is_empty());
        assert_eq!(palette.swatch_grid(8), None);
    }

    #[test]
    fn hex_is_uppercase_rrggbb() {
        assert_eq!(hex_code(Srgb::new(255u8, 0, 171)), "#FF00AB");
        assert_eq!(hex_code(Srgb::new(0u8, 0, 0)), "#000000");
    }

    #[test]
    fn swatch_grid_geometry() {
        let base = vec![Srgb::new(10u8, 20, 30), Srgb::new(40u8, 50, 60)];
        let bright = vec![Srgb::new(70u8, 80, 90), Srgb::new(100u8, 110, 120)];
        let palette = TerminalPalette::new(base, bright);

        let grid = palette.swatch_grid(4).unwrap();
        assert_eq!(grid.dimensions(), (8, 8));
        assert_eq!(grid.get_pixel(0, 0).0, [10, 20, 30, 0xFF]);
        assert_eq!(grid.get_pixel(4, 0).0, [40, 50, 60, 0xFF]);
        assert_eq!(grid.get_pixel(0, 4).0, [70, 80, 90, 0xFF]);
        assert_eq!(grid.get_pixel(7, 7).0, [100, 110, 120, 0xFF]);
    }
}
