//! Pure heading-visibility computation.
//!
//! No I/O: everything here maps an outline snapshot, a scroll threshold and
//! the display settings to the headings that should be pinned.

pub mod expected;
pub mod indent;
pub mod reducer;
pub mod text_cache;

pub use expected::{expected_headings, ExpectedHeadings};
pub use indent::calc_indent_levels;
pub use reducer::{attach_indents, pin, reduce, truncate};
pub use text_cache::{DisplayTextRenderer, HeadingTextCache};

/// Build an outline from `(level, text, offset)` triples.
#[cfg(test)]
pub(crate) fn test_outline(rows: &[(u8, &str, usize)]) -> Vec<crate::model::Heading> {
    use crate::model::{Heading, HeadingLevel, SourcePosition};

    rows.iter()
        .enumerate()
        .map(|(index, &(level, text, offset))| Heading {
            index,
            level: HeadingLevel::new(level).unwrap(),
            text: text.to_string(),
            display_text: text.to_string(),
            offset,
            start: SourcePosition::new(index, 0),
        })
        .collect()
}
