//! Perceptual change detection.
//!
//! Before running the extraction pipeline, callers compute a composite
//! signature over the current wallpaper set and compare it with the one they
//! stored last run. The signature combines each wallpaper's path, its
//! modification time when known, and an FNV-1a hash of a small downsampled
//! thumbnail — so it changes when the picture visibly changes, even if the
//! file is rewritten with the same timestamp.

use crate::sample;
use image::RgbaImage;
use std::time::{SystemTime, UNIX_EPOCH};

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;

/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x100000001b3;

/// Longest thumbnail side used for the perceptual hash.
const HASH_DIMENSION: u32 = 64;

/// Plain FNV-1a over a byte slice.
fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hashes a thumbnail of `image` downscaled to at most 64 pixels on its
/// longest side (same aspect-preserving, min-one-pixel policy as sampling).
///
/// The hash covers the thumbnail's dimensions and its raw RGBA bytes.
/// Returns `None` for a zero-area image, which callers treat as
/// always-changed rather than masking a real update.
#[must_use]
pub fn pixel_hash(image: &RgbaImage) -> Option<u64> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let thumb = sample::downscale_to_fit(image, HASH_DIMENSION);
    let (tw, th) = thumb.dimensions();
    let mut dims = [0u8; 8];
    dims[..4].copy_from_slice(&tw.to_le_bytes());
    dims[4..].copy_from_slice(&th.to_le_bytes());

    let combined = fnv1a64(&dims);
    Some((combined ^ fnv1a64(thumb.as_raw())).wrapping_mul(FNV_PRIME))
}

/// One wallpaper contributing to a composite signature.
///
/// Carries the wallpaper path, optionally its decoded pixels, and optionally
/// its modification time. Pixels can also be supplied as encoded bytes;
/// undecodable bytes simply leave the source without pixels, so its entry
/// carries no perceptual hash.
#[derive(Debug, Clone, Default)]
pub struct SignatureSource {
    /// Wallpaper path as reported by the caller.
    path: String,
    /// Decoded pixels, when available.
    image: Option<RgbaImage>,
    /// File modification time, when available.
    mtime: Option<SystemTime>,
}

impl SignatureSource {
    /// Creates a source for `path` with no pixels or modification time.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            image: None,
            mtime: None,
        }
    }

    /// Attaches already-decoded pixels.
    #[must_use]
    pub fn with_image(mut self, image: RgbaImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Decodes and attaches encoded image bytes. Undecodable input leaves
    /// the source without pixels.
    #[must_use]
    pub fn with_bytes(self, bytes: &[u8]) -> Self {
        match image::load_from_memory(bytes) {
            Ok(decoded) => self.with_image(decoded.into_rgba8()),
            Err(_) => self,
        }
    }

    /// Attaches the file modification time.
    #[must_use]
    pub fn with_mtime(mut self, mtime: SystemTime) -> Self {
        self.mtime = Some(mtime);
        self
    }

    /// The wallpaper path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The decoded pixels, if any.
    #[must_use]
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// This source's signature entry: `path|mtime_epoch|px:<hash>` with the
    /// mtime segment dropped when unknown (or before the epoch) and the
    /// `px:` segment dropped when no hash could be produced.
    fn entry(&self) -> String {
        let mut entry = self.path.clone();
        if let Some(epoch) = self
            .mtime
            .and_then(|mtime| mtime.duration_since(UNIX_EPOCH).ok())
        {
            entry.push_str(&format!("|{}", epoch.as_secs()));
        }
        if let Some(hash) = self.image.as_ref().and_then(pixel_hash) {
            entry.push_str(&format!("|px:{hash:016x}"));
        }
        entry
    }
}

/// Computes the composite change-detection signature for `sources`.
///
/// Entries are joined by `;` in input order. Equality with a previously
/// stored signature is the sole change-detection predicate; the caller owns
/// the stored value and the comparison.
#[must_use]
pub fn signature(sources: &[SignatureSource]) -> String {
    sources
        .iter()
        .map(SignatureSource::entry)
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use std::time::Duration;

    fn mtime(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn fnv1a64_matches_known_vectors() {
        // Published FNV-1a test vectors.
        assert_eq!(fnv1a64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a64(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1a64(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn hash_is_stable_across_calls() {
        let image = gradient_image(100, 80);
        assert_eq!(pixel_hash(&image), pixel_hash(&image));
    }

    #[test]
    fn hash_tracks_pixel_content() {
        let red = solid_image(50, 50, [255, 0, 0]);
        let blue = solid_image(50, 50, [0, 0, 255]);
        assert_ne!(pixel_hash(&red), pixel_hash(&blue));
    }

    #[test]
    fn hash_tracks_dimensions() {
        let wide = solid_image(200, 100, [128, 128, 128]);
        let tall = solid_image(100, 200, [128, 128, 128]);
        assert_ne!(pixel_hash(&wide), pixel_hash(&tall));
    }

    #[test]
    fn zero_area_image_has_no_hash() {
        assert_eq!(pixel_hash(&RgbaImage::new(0, 0)), None);
    }

    #[test]
    fn entry_formats_with_all_segments() {
        let image = solid_image(10, 10, [1, 2, 3]);
        let hash = pixel_hash(&image).unwrap();
        let source = SignatureSource::new("/Library/Desktop Pictures/a.png")
            .with_image(image)
            .with_mtime(mtime(1_700_000_000));

        assert_eq!(
            source.entry(),
            format!("/Library/Desktop Pictures/a.png|1700000000|px:{hash:016x}")
        );
    }

    #[test]
    fn entry_without_mtime_drops_the_segment() {
        let image = solid_image(10, 10, [1, 2, 3]);
        let hash = pixel_hash(&image).unwrap();
        let source = SignatureSource::new("a.png").with_image(image);
        assert_eq!(source.entry(), format!("a.png|px:{hash:016x}"));
    }

    #[test]
    fn entry_without_pixels_drops_the_hash() {
        let source = SignatureSource::new("missing.png").with_mtime(mtime(42));
        assert_eq!(source.entry(), "missing.png|42");
    }

    #[test]
    fn undecodable_bytes_leave_no_hash() {
        let source = SignatureSource::new("junk.png").with_bytes(b"this is not an image");
        assert_eq!(source.entry(), "junk.png");
    }

    #[test]
    fn composite_joins_in_input_order() {
        let sources = [
            SignatureSource::new("one.png").with_mtime(mtime(1)),
            SignatureSource::new("two.png").with_mtime(mtime(2)),
        ];
        assert_eq!(signature(&sources), "one.png|1;two.png|2");
    }

    #[test]
    fn signature_is_stable_for_unchanged_sources() {
        let build = || {
            vec![SignatureSource::new("w.png")
                .with_image(gradient_image(120, 90))
                .with_mtime(mtime(1_700_000_000))]
        };
        assert_eq!(signature(&build()), signature(&build()));
    }

    #[test]
    fn signature_changes_with_pixels_even_at_constant_mtime() {
        let at = mtime(1_700_000_000);
        let before = vec![SignatureSource::new("w.png")
            .with_image(solid_image(50, 50, [10, 10, 10]))
            .with_mtime(at)];
        let after = vec![SignatureSource::new("w.png")
            .with_image(solid_image(50, 50, [10, 10, 11]))
            .with_mtime(at)];
        assert_ne!(signature(&before), signature(&after));
    }
}
