//! Outline Reducer
//!
//! Derives the pinned heading set from a flat outline and a scroll threshold.
//!
//! # Algorithm
//!
//! Candidates are the headings whose offset is strictly before the threshold,
//! walked in document order against a stack of open sections:
//!
//! - a top-level heading closes everything before it, siblings included;
//! - every entry deeper than the incoming heading is closed and dropped;
//! - an entry at the same level is replaced. `Concise` drops it, `Default`
//!   keeps it below the newcomer as a preceding sibling;
//! - the incoming heading is pushed as the open entry at its level.
//!
//! Kept siblings are shown only beside ancestors: siblings at the level of
//! the deepest open heading (the current section) are dropped at the end.
//!
//! Output order is document order, which keeps levels non-decreasing.

use crate::model::{DisplayMode, Heading, HeadingLevel, PinnedHeading};
use crate::outline::indent::calc_indent_levels;

/// Stack entry during the reduction walk.
struct Slot<'a> {
    heading: &'a Heading,
    /// Replaced by a later heading at the same level.
    sibling: bool,
}

/// Reduce an outline to the pinned set, before truncation.
///
/// Only headings with `offset < threshold` are considered.
pub fn reduce(outline: &[Heading], threshold: usize, mode: DisplayMode) -> Vec<Heading> {
    let mut stack: Vec<Slot<'_>> = Vec::new();

    for heading in outline.iter().filter(|h| h.offset < threshold) {
        if heading.level == HeadingLevel::H1 {
            stack.clear();
        }
        while stack
            .last()
            .is_some_and(|top| top.heading.level > heading.level)
        {
            stack.pop();
        }

        if let Some(top) = stack.last_mut() {
            if !top.sibling && top.heading.level == heading.level {
                match mode {
                    DisplayMode::Default => top.sibling = true,
                    DisplayMode::Concise => {
                        stack.pop();
                    }
                }
            }
        }

        stack.push(Slot {
            heading,
            sibling: false,
        });
    }

    let current_level = stack
        .iter()
        .rev()
        .find(|slot| !slot.sibling)
        .map(|slot| slot.heading.level);

    stack
        .into_iter()
        .filter(|slot| !(slot.sibling && Some(slot.heading.level) == current_level))
        .map(|slot| slot.heading.clone())
        .collect()
}

/// Keep the last `max` headings, dropping the earliest ancestors first.
///
/// `max == 0` means unlimited.
pub fn truncate(mut headings: Vec<Heading>, max: usize) -> Vec<Heading> {
    if max > 0 && headings.len() > max {
        headings.drain(..headings.len() - max);
    }
    headings
}

/// Reduce, truncate and indent in one pass, as live rendering does.
pub fn pin(
    outline: &[Heading],
    threshold: usize,
    mode: DisplayMode,
    max: usize,
) -> Vec<PinnedHeading> {
    attach_indents(truncate(reduce(outline, threshold, mode), max))
}

/// Pair each heading with its indent level.
pub fn attach_indents(headings: Vec<Heading>) -> Vec<PinnedHeading> {
    let levels: Vec<HeadingLevel> = headings.iter().map(|h| h.level).collect();
    let indents = calc_indent_levels(&levels);
    headings
        .into_iter()
        .zip(indents)
        .map(|(heading, indent_level)| PinnedHeading {
            heading,
            indent_level,
        })
        .collect()
}
