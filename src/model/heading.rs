//! Heading outline types.
//!
//! A [`Heading`] is produced fresh on every outline fetch and never mutated
//! afterwards; the next fetch supersedes the whole outline. [`PinnedHeading`]
//! carries the derived indent level and is rebuilt whenever the pinned set
//! changes.

use std::fmt;

/// Heading nesting depth, 1 (`#`) through 6 (`######`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

/// Error returned when a heading level is outside `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("heading level must be between 1 and 6 (got {0})")]
pub struct InvalidHeadingLevel(pub u8);

impl HeadingLevel {
    /// Shallowest level.
    pub const H1: Self = Self(1);
    /// Level 2.
    pub const H2: Self = Self(2);
    /// Level 3.
    pub const H3: Self = Self(3);
    /// Level 4.
    pub const H4: Self = Self(4);
    /// Level 5.
    pub const H5: Self = Self(5);
    /// Deepest level.
    pub const H6: Self = Self(6);

    /// Smart constructor that validates `1..=6`.
    pub fn new(level: u8) -> Result<Self, InvalidHeadingLevel> {
        if (1..=6).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InvalidHeadingLevel(level))
        }
    }

    /// Get the raw level.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

/// Location of a heading in the source text, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourcePosition {
    /// Source line.
    pub line: usize,
    /// Column within the line.
    pub col: usize,
}

impl SourcePosition {
    /// Create a new position.
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// One heading as supplied by the host, before caching and indexing.
///
/// `offset` is the heading's vertical position inside the view's content,
/// measured in the same unit as the view's scroll position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    /// Nesting depth.
    pub level: HeadingLevel,
    /// Raw heading text, markup included.
    pub text: String,
    /// Where the heading starts in the source.
    pub start: SourcePosition,
    /// Vertical position in the view.
    pub offset: usize,
}

/// A heading in a document's flat outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Position in the flat outline.
    pub index: usize,
    /// Nesting depth.
    pub level: HeadingLevel,
    /// Raw heading text.
    pub text: String,
    /// Rendered title, served from the heading-text cache.
    pub display_text: String,
    /// Vertical position in the view.
    pub offset: usize,
    /// Source location used for jump-to.
    pub start: SourcePosition,
}

impl Heading {
    /// Build a heading from a host outline item.
    pub fn from_item(index: usize, item: OutlineItem, display_text: String) -> Self {
        Self {
            index,
            level: item.level,
            text: item.text,
            display_text,
            offset: item.offset,
            start: item.start,
        }
    }
}

/// A heading currently shown in the sticky block.
///
/// `indent_level` is derived from the pinned set, never from the raw level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedHeading {
    /// The pinned heading.
    pub heading: Heading,
    /// Rendering depth, 0-based.
    pub indent_level: usize,
}

impl PinnedHeading {
    /// Position of the heading in the flat outline.
    pub fn index(&self) -> usize {
        self.heading.index
    }

    /// Nesting depth of the heading.
    pub fn level(&self) -> HeadingLevel {
        self.heading.level
    }
}
