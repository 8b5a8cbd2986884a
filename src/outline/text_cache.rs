//! Heading-Text Cache
//!
//! Memoizes the host's heading-text-to-display-text transform for the
//! lifetime of the owning synchroniser. No eviction: a changed heading is a
//! new key, and entries for removed headings are dead memory only.

use std::collections::HashMap;
use tracing::trace;

/// Host transform from raw heading markup to display text.
pub trait DisplayTextRenderer {
    /// Render `raw` to the text shown in the sticky block.
    fn render_display_text(&self, raw: &str) -> String;
}

impl<F> DisplayTextRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render_display_text(&self, raw: &str) -> String {
        self(raw)
    }
}

/// Append-only map from raw heading text to display text.
#[derive(Debug, Clone, Default)]
pub struct HeadingTextCache {
    entries: HashMap<String, String>,
    misses: u64,
}

impl HeadingTextCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display text for `raw`, rendering and storing it on first use.
    pub fn get_or_render<R>(&mut self, raw: &str, renderer: &R) -> String
    where
        R: DisplayTextRenderer + ?Sized,
    {
        if let Some(text) = self.entries.get(raw) {
            return text.clone();
        }
        self.misses += 1;
        trace!(raw, "rendering heading text");
        let text = renderer.render_display_text(raw);
        self.entries.insert(raw.to_string(), text.clone());
        text
    }

    /// Number of cached headings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times the renderer was invoked.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
