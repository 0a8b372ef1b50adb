//! A library for deriving terminal color schemes from wallpaper images.
//!
//! `termtint` reduces an arbitrary bitmap to a fixed, visually representative
//! palette of 8 base colors plus 8 "bright" variants, deterministically and
//! cheaply enough to rerun on every wallpaper change. Clustering happens under
//! the CIEDE2000 perceptual distance in CIELAB space, so the chosen colors
//! track what the image actually looks like rather than raw channel averages.
//!
//! The crate also computes a perceptual change signature per wallpaper
//! (a small hash of a downsampled thumbnail plus file metadata) so callers can
//! skip the whole pipeline when nothing visible changed.
//!
//! # High-Level API
//! The [`Extractor`] builder runs the full pipeline:
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use termtint::Extractor;
//!
//! let img = image::open("wallpaper.png")?.into_rgba8();
//! let palette = Extractor::new()
//!     .base_count(8)
//!     .brightness_delta(22.0)
//!     .extract(&img);
//!
//! for hex in palette.hex() {
//!     println!("{hex}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! To recompute only when a wallpaper set visibly changes, wrap the extractor
//! in a [`PaletteSession`] and feed it [`SignatureSource`]s.
//!
//! The low-level stages ([`sample`], [`median_cut`], [`kmeans`], [`select`],
//! [`signature`], [`colorspace`]) are public for callers that want to run or
//! test them individually.

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::excessive_precision
)]

pub mod colorspace;
pub mod kmeans;
pub mod median_cut;
pub mod sample;
pub mod select;
pub mod signature;

mod types;

#[cfg(feature = "pipelines")]
mod api;

pub use signature::{pixel_hash, signature, SignatureSource};
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The spatial coverage grid is `CELL_GRID`x`CELL_GRID` cells over the image.
pub(crate) const CELL_GRID: u32 = 6;
