//! Perceptual color space support: CIELAB conversion for the 0-255 mean
//! scale used by the sampler, and the CIEDE2000 color difference.
//!
//! Conversions go through [`palette`]'s sRGB D65 chain (gamma expansion,
//! linear RGB to XYZ, XYZ to L*a*b* against the D65 reference white).
//! CIEDE2000 is implemented here in full per CIE Technical Report 142-2001,
//! since `palette` does not ship it.

use palette::{FromColor, IntoColor, Lab, Srgb};
use std::f64::consts::PI;

/// `25^7`, the chroma normalizer shared by the G factor and rotation term.
const POW7_25: f64 = 6103515625.0;

/// Converts a mean sRGB triple on the 0-255 scale to CIELAB (D65).
#[must_use]
pub fn lab_from_srgb(srgb: [f32; 3]) -> Lab {
    let srgb = Srgb::new(srgb[0] / 255.0, srgb[1] / 255.0, srgb[2] / 255.0);
    srgb.into_color()
}

/// Converts CIELAB back to sRGB, clamping each channel to `[0, 1]`.
///
/// Out-of-gamut results (common after lightness boosts) clamp rather than
/// producing invalid channel values.
#[must_use]
pub fn srgb_from_lab(lab: Lab) -> Srgb<f32> {
    let srgb = Srgb::from_color(lab);
    Srgb::new(
        srgb.red.clamp(0.0, 1.0),
        srgb.green.clamp(0.0, 1.0),
        srgb.blue.clamp(0.0, 1.0),
    )
}

/// Rounds a mean sRGB triple on the 0-255 scale to an 8-bit color.
#[must_use]
pub fn srgb_to_u8(srgb: [f32; 3]) -> Srgb<u8> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let quantize = |c: f32| c.round().clamp(0.0, 255.0) as u8;
    Srgb::new(quantize(srgb[0]), quantize(srgb[1]), quantize(srgb[2]))
}

/// The CIEDE2000 color difference between two CIELAB colors.
///
/// Implements the full formula from CIE Technical Report 142-2001 with unit
/// parametric factors: the G chroma compensation, rotated `a'`, hue angles
/// normalized to `[0, 360)`, the hue weighting term `T`, the blue-region
/// rotation term, and the `SL`/`SC`/`SH` scale factors. Arithmetic runs in
/// `f64` so the result is numerically symmetric in its arguments.
#[must_use]
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    let (l1, a1, b1) = (f64::from(lab1.l), f64::from(lab1.a), f64::from(lab1.b));
    let (l2, a2, b2) = (f64::from(lab2.l), f64::from(lab2.a), f64::from(lab2.b));

    // G compensation from the mean of the unadjusted chromas.
    let chroma_mean = (a1.hypot(b1) + a2.hypot(b2)) / 2.0;
    let chroma_mean7 = chroma_mean.powi(7);
    let g = 0.5 * (1.0 - (chroma_mean7 / (chroma_mean7 + POW7_25)).sqrt());

    let a1p = a1 * (1.0 + g);
    let a2p = a2 * (1.0 + g);
    let c1p = a1p.hypot(b1);
    let c2p = a2p.hypot(b2);
    let h1p = hue_degrees(a1p, b1);
    let h2p = hue_degrees(a2p, b2);

    let delta_l = l2 - l1;
    let delta_c = c2p - c1p;

    // Hue difference collapses to zero when either chroma vanishes.
    let delta_h_angle = if c1p * c2p == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff > 180.0 {
            diff - 360.0
        } else if diff < -180.0 {
            diff + 360.0
        } else {
            diff
        }
    };
    let delta_h = 2.0 * (c1p * c2p).sqrt() * (delta_h_angle.to_radians() / 2.0).sin();

    let l_mean = (l1 + l2) / 2.0;
    let c_mean = (c1p + c2p) / 2.0;

    // Mean hue, with the wraparound branch for pairs more than 180° apart.
    let h_mean = if c1p * c2p == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let h_mean_rad = h_mean.to_radians();
    let t = 1.0 - 0.17 * (h_mean_rad - PI / 6.0).cos()
        + 0.24 * (2.0 * h_mean_rad).cos()
        + 0.32 * (3.0 * h_mean_rad + PI / 30.0).cos()
        - 0.20 * (4.0 * h_mean_rad - 63.0_f64.to_radians()).cos();

    let l_mean_sq = (l_mean - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l_mean_sq / (20.0 + l_mean_sq).sqrt();
    let sc = 1.0 + 0.045 * c_mean;
    let sh = 1.0 + 0.015 * c_mean * t;

    let c_mean7 = c_mean.powi(7);
    let rc = 2.0 * (c_mean7 / (c_mean7 + POW7_25)).sqrt();
    let theta = 30.0 * (-((h_mean - 275.0) / 25.0).powi(2)).exp();
    let rt = -(2.0 * theta.to_radians()).sin() * rc;

    let tl = delta_l / sl;
    let tc = delta_c / sc;
    let th = delta_h / sh;

    (tl * tl + tc * tc + th * th + rt * tc * th).sqrt()
}

/// The hue angle of `(a, b)` in degrees, normalized to `[0, 360)`.
fn hue_degrees(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let hue = b.atan2(a).to_degrees();
    if hue < 0.0 {
        hue + 360.0
    } else {
        hue
    }
}
