//! Change-gated recomputation.
//!
//! A [`PaletteSession`] remembers the composite signature and palette of the
//! last completed run; feeding it the current wallpaper sources either
//! short-circuits (signature unchanged) or reruns extraction and swaps the
//! cache atomically. [`Debounce`] coalesces trigger bursts so a flurry of
//! wallpaper-change notifications schedules a single run.

use super::Extractor;
use crate::{
    signature::{signature, SignatureSource},
    types::TerminalPalette,
};
use std::time::{Duration, Instant};

/// Default coalescing window between a trigger and the run it schedules.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Caches the last composite signature and palette so unchanged wallpaper
/// sets skip the extraction pipeline entirely.
///
/// The session itself performs no I/O and holds no locks; callers are
/// expected to serialize runs (one session, one run at a time), which also
/// covers the cached state.
#[derive(Debug, Clone, Default)]
pub struct PaletteSession {
    /// The configured pipeline to run on change.
    extractor: Extractor,
    /// Signature cached by the last completed run.
    last_signature: Option<String>,
    /// Palette cached by the last completed run.
    last_palette: Option<TerminalPalette>,
}

impl PaletteSession {
    /// Creates a session around a configured [`Extractor`].
    #[must_use]
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor,
            last_signature: None,
            last_palette: None,
        }
    }

    /// The palette from the last completed run, if any.
    #[must_use]
    pub fn palette(&self) -> Option<&TerminalPalette> {
        self.last_palette.as_ref()
    }

    /// The signature cached by the last completed run, if any.
    #[must_use]
    pub fn last_signature(&self) -> Option<&str> {
        self.last_signature.as_deref()
    }

    /// Computes the composite signature for `sources` and reruns extraction
    /// when it differs from the cached one.
    ///
    /// Returns the freshly derived palette, or `None` when the signature is
    /// unchanged (the cached palette is left untouched). Extraction runs on
    /// the first source carrying pixels; with none, the fresh palette is
    /// empty — "nothing available", which callers should treat as "skip this
    /// update". The cache is only written after extraction completes, so a
    /// partial run is never observable.
    pub fn refresh(&mut self, sources: &[SignatureSource]) -> Option<&TerminalPalette> {
        let current = signature(sources);
        if self.last_signature.as_deref() == Some(current.as_str()) {
            return None;
        }

        let palette = sources
            .iter()
            .find_map(SignatureSource::image)
            .map_or_else(TerminalPalette::default, |image| {
                self.extractor.extract(image)
            });

        self.last_signature = Some(current);
        self.last_palette = Some(palette);
        self.last_palette.as_ref()
    }
}

/// Coalesces bursts of triggers into a single pending run.
///
/// Every trigger restarts the window — a new trigger supersedes the pending
/// one, it never preempts a run already started. Pure time arithmetic; the
/// caller supplies the clock and decides when to poll [`Debounce::fire`].
#[derive(Debug, Clone)]
pub struct Debounce {
    /// Quiet period required after the last trigger.
    window: Duration,
    /// When the pending run becomes due, if one is pending.
    deadline: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debounce {
    /// Creates a debouncer with the given coalescing window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    /// Registers a trigger at `now`, superseding any pending deadline.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether a run is pending.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the pending deadline once it has passed. Returns `true`
    /// exactly once per coalesced burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn source(path: &str, rgb: [u8; 3], mtime_secs: u64) -> SignatureSource {
        SignatureSource::new(path)
            .with_image(solid_image(40, 40, rgb))
            .with_mtime(UNIX_EPOCH + Duration::from_secs(mtime_secs))
    }

    #[test]
    fn first_refresh_always_runs() {
        let mut session = PaletteSession::new(Extractor::new());
        let palette = session.refresh(&[source("a.png", [200, 30, 30], 1)]).cloned();
        assert!(palette.is_some());
        assert!(!palette.unwrap().is_empty());
        assert!(session.last_signature().is_some());
    }

    #[test]
    fn unchanged_sources_are_a_no_op() {
        let mut session = PaletteSession::new(Extractor::new());
        let sources = [source("a.png", [200, 30, 30], 1)];

        let first = session.refresh(&sources).cloned();
        assert!(session.refresh(&sources).is_none());
        assert_eq!(session.palette().cloned(), first);
    }

    #[test]
    fn changed_pixels_rerun_extraction() {
        let mut session = PaletteSession::new(Extractor::new());
        session.refresh(&[source("a.png", [200, 30, 30], 1)]);
        let before = session.palette().cloned();

        let after = session.refresh(&[source("a.png", [30, 30, 200], 1)]).cloned();
        assert!(after.is_some());
        assert_ne!(session.palette().cloned(), before);
    }

    #[test]
    fn pixelless_sources_always_rerun_and_yield_empty() {
        let mut session = PaletteSession::new(Extractor::new());
        let sources = [SignatureSource::new("gone.png")];

        let palette = session.refresh(&sources).cloned().unwrap();
        assert!(palette.is_empty());
        // The signature still caches, so an identical set short-circuits.
        assert!(session.refresh(&sources).is_none());
    }

    #[test]
    fn extraction_uses_the_first_source_with_pixels() {
        let mut session = PaletteSession::new(Extractor::new());
        let sources = [
            SignatureSource::new("missing.png"),
            source("b.png", [10, 200, 10], 2),
        ];

        let palette = session.refresh(&sources).unwrap();
        assert_eq!(palette.base()[0], palette::Srgb::new(10u8, 200, 10));
    }

    #[test]
    fn debounce_coalesces_bursts() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(600));

        debounce.trigger(start);
        debounce.trigger(start + Duration::from_millis(200));
        debounce.trigger(start + Duration::from_millis(400));

        // Still inside the window of the last trigger.
        assert!(!debounce.fire(start + Duration::from_millis(900)));
        // One window after the last trigger: fires exactly once.
        assert!(debounce.fire(start + Duration::from_millis(1_000)));
        assert!(!debounce.fire(start + Duration::from_millis(2_000)));
        assert!(!debounce.pending());
    }

    #[test]
    fn debounce_without_trigger_never_fires() {
        let mut debounce = Debounce::default();
        assert!(!debounce.pending());
        assert!(!debounce.fire(Instant::now()));
    }
}
