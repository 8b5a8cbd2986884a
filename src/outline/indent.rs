//! Indent Calculator
//!
//! Indentation follows the nesting actually observed in the pinned set, not
//! the raw heading level: `H1 → H3` with no `H2` in between is a single step.

use crate::model::HeadingLevel;

/// Compute the indent depth of each heading, same length as the input.
///
/// The first item sits at depth 0. A deeper item goes one step in, an equal
/// item stays, a shallower item steps out once per open section it leaves
/// (never below 0).
pub fn calc_indent_levels(levels: &[HeadingLevel]) -> Vec<usize> {
    // Open sections: (level, indent)
    let mut open: Vec<(HeadingLevel, usize)> = Vec::with_capacity(levels.len());
    let mut indents = Vec::with_capacity(levels.len());

    for &level in levels {
        while open.last().is_some_and(|&(top, _)| top > level) {
            open.pop();
        }

        let indent = match open.last() {
            Some(&(top, indent)) if top == level => {
                open.pop();
                indent
            }
            Some(&(_, indent)) => indent + 1,
            None => 0,
        };

        open.push((level, indent));
        indents.push(indent);
    }

    indents
}
