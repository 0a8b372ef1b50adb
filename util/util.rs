#![allow(dead_code)]

use image::{Rgba, RgbaImage};

/// A two-axis gradient with a diagonal color sweep, touching many buckets.
pub fn gradient_wallpaper(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = ((u64::from(x) * 255) / u64::from(width.max(1))) as u8;
        let g = ((u64::from(y) * 255) / u64::from(height.max(1))) as u8;
        let b = ((u64::from(x + y) * 255) / u64::from((width + height).max(1))) as u8;
        Rgba([r, g, b, 0xFF])
    })
}

/// Four solid quadrants, the degenerate best case for bucketing.
pub fn quadrant_wallpaper(width: u32, height: u32) -> RgbaImage {
    const COLORS: [[u8; 3]; 4] = [[0xFF, 0, 0], [0, 0xFF, 0], [0, 0, 0xFF], [0xFF, 0xFF, 0]];
    RgbaImage::from_fn(width, height, |x, y| {
        let right = usize::from(x >= width / 2);
        let bottom = usize::from(y >= height / 2);
        let [r, g, b] = COLORS[bottom * 2 + right];
        Rgba([r, g, b, 0xFF])
    })
}

/// Deterministic pseudo-random Lab-range triples for distance benches.
pub fn lab_grid(samples: usize) -> Vec<(f32, f32, f32)> {
    (0..samples)
        .map(|i| {
            let i = i as f32;
            (
                (i * 37.0) % 100.0,
                ((i * 53.0) % 256.0) - 128.0,
                ((i * 71.0) % 256.0) - 128.0,
            )
        })
        .collect()
}
