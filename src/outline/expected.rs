//! Expected-Heights Predictor
//!
//! Answers "which headings would be pinned if the view were scrolled so that
//! heading `i` is the last pinned entry". The sticky block is measured off
//! screen with that set before the real scroll happens, so the final scroll
//! offset already accounts for the new block height.

use crate::model::{DisplayMode, Heading, PinnedHeading};
use crate::outline::reducer::{attach_indents, reduce, truncate};

/// Predictor bound to one outline snapshot and the current mode/limit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpectedHeadings {
    outline: Vec<Heading>,
    max: usize,
    mode: DisplayMode,
}

impl ExpectedHeadings {
    /// Bind a predictor to an outline.
    pub fn new(outline: Vec<Heading>, max: usize, mode: DisplayMode) -> Self {
        Self { outline, max, mode }
    }

    /// Pinned set once `target` has just been scrolled past.
    ///
    /// Equivalent to a live reduction at `offset + 1` of the target heading
    /// when heading offsets are distinct. Unknown indices give an empty set.
    pub fn at(&self, target: usize) -> Vec<PinnedHeading> {
        let Some(heading) = self.outline.get(target) else {
            return Vec::new();
        };
        // Cut by index rather than offset so headings sharing the target's
        // offset but following it in the document are never included.
        let candidates = &self.outline[..=target];
        let threshold = heading.offset.saturating_add(1);
        attach_indents(truncate(
            reduce(candidates, threshold, self.mode),
            self.max,
        ))
    }

    /// Outline the predictor was built from.
    pub fn outline(&self) -> &[Heading] {
        &self.outline
    }
}

/// Build a predictor for `outline`, returned as a plain function of the target index.
pub fn expected_headings(
    outline: Vec<Heading>,
    max: usize,
    mode: DisplayMode,
) -> impl Fn(usize) -> Vec<PinnedHeading> {
    let predictor = ExpectedHeadings::new(outline, max, mode);
    move |target| predictor.at(target)
}
