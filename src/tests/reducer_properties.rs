//! Property-based tests for the outline reducer, indent calculator and
//! expected-heights predictor.
//!
//! Outlines are generated with strictly increasing offsets, the shape every
//! host produces for a single document.

use crate::model::{DisplayMode, Heading, HeadingLevel, SourcePosition};
use crate::outline::{calc_indent_levels, pin, reduce, truncate, ExpectedHeadings};
use proptest::prelude::*;

// ===== Arbitrary Strategies =====

fn arb_mode() -> impl Strategy<Value = DisplayMode> {
    prop_oneof![Just(DisplayMode::Default), Just(DisplayMode::Concise)]
}

/// Outline of up to 40 headings, each 1-8 rows after the previous one.
fn arb_outline() -> impl Strategy<Value = Vec<Heading>> {
    prop::collection::vec((1u8..=6, 1usize..=8), 0..40).prop_map(|shape| {
        let mut offset = 0;
        shape.into_iter()
            .enumerate()
            .map(|(index, (level, gap))| {
                offset += gap;
                Heading {
                    index,
                    level: HeadingLevel::new(level).unwrap(),
                    text: format!("h{index}"),
                    display_text: format!("h{index}"),
                    offset,
                    start: SourcePosition::new(offset, 0),
                }
            })
            .collect()
    })
}

fn arb_levels() -> impl Strategy<Value = Vec<HeadingLevel>> {
    prop::collection::vec(1u8..=6, 0..30)
        .prop_map(|raw| raw.into_iter().map(|l| HeadingLevel::new(l).unwrap()).collect())
}

fn indices(headings: &[Heading]) -> Vec<usize> {
    headings.iter().map(|h| h.index).collect()
}

// ===== Properties =====

proptest! {
    #[test]
    fn concise_pins_one_heading_per_level_above_threshold(
        outline in arb_outline(),
        threshold in 0usize..400,
    ) {
        let pinned = reduce(&outline, threshold, DisplayMode::Concise);
        for heading in &pinned {
            prop_assert!(heading.offset < threshold);
        }
        for pair in pinned.windows(2) {
            prop_assert!(pair[0].level < pair[1].level, "{:?}", indices(&pinned));
        }
    }

    #[test]
    fn default_mode_contains_the_concise_chain(
        outline in arb_outline(),
        threshold in 0usize..400,
    ) {
        let full = indices(&reduce(&outline, threshold, DisplayMode::Default));
        let chain = indices(&reduce(&outline, threshold, DisplayMode::Concise));
        for index in &chain {
            prop_assert!(full.contains(index), "{chain:?} not in {full:?}");
        }
        // Both end on the same current heading
        prop_assert_eq!(full.last(), chain.last());
    }

    #[test]
    fn at_most_one_top_level_heading_is_pinned(
        outline in arb_outline(),
        threshold in 0usize..400,
        mode in arb_mode(),
    ) {
        let pinned = reduce(&outline, threshold, mode);
        let top_level = pinned.iter().filter(|h| h.level == HeadingLevel::H1).count();
        prop_assert!(top_level <= 1, "{:?}", indices(&pinned));
    }

    #[test]
    fn pinned_set_keeps_document_order(
        outline in arb_outline(),
        threshold in 0usize..400,
        mode in arb_mode(),
    ) {
        let pinned = indices(&reduce(&outline, threshold, mode));
        prop_assert!(pinned.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn indent_starts_at_zero_and_steps_by_at_most_one(levels in arb_levels()) {
        let indents = calc_indent_levels(&levels);
        prop_assert_eq!(indents.len(), levels.len());
        if let Some(first) = indents.first() {
            prop_assert_eq!(*first, 0);
        }
        for pair in indents.windows(2) {
            prop_assert!(pair[1] <= pair[0] + 1);
        }
    }

    #[test]
    fn truncation_keeps_the_last_entries(
        outline in arb_outline(),
        threshold in 0usize..400,
        mode in arb_mode(),
        max in 1usize..6,
    ) {
        let full = reduce(&outline, threshold, mode);
        let cut = truncate(full.clone(), max);
        prop_assert!(cut.len() <= max);
        prop_assert_eq!(&cut[..], &full[full.len() - cut.len()..]);

        let pinned: Vec<Heading> = pin(&outline, threshold, mode, max)
            .into_iter()
            .map(|p| p.heading)
            .collect();
        prop_assert_eq!(pinned, cut);
    }

    #[test]
    fn prediction_matches_live_reduction_at_target(
        outline in arb_outline(),
        mode in arb_mode(),
        max in 0usize..5,
    ) {
        let predictor = ExpectedHeadings::new(outline.clone(), max, mode);
        for (target, heading) in outline.iter().enumerate() {
            let predicted = predictor.at(target);
            prop_assert_eq!(
                predicted.last().map(|p| p.index()),
                Some(target),
                "target must be the last pinned entry"
            );
            prop_assert_eq!(predicted, pin(&outline, heading.offset + 1, mode, max));
        }
    }
}

// ===== Scenarios =====

fn scenario(rows: &[(u8, &str, usize)]) -> Vec<Heading> {
    crate::outline::test_outline(rows)
}

fn texts_and_indents(outline: &[Heading], threshold: usize, max: usize) -> Vec<(String, usize)> {
    pin(outline, threshold, DisplayMode::Default, max)
        .into_iter()
        .map(|p| (p.heading.text, p.indent_level))
        .collect()
}

#[test]
fn nested_chain_is_fully_pinned() {
    let outline = scenario(&[(1, "A", 0), (2, "B", 10), (3, "C", 20)]);
    assert_eq!(
        texts_and_indents(&outline, 25, 0),
        vec![("A".into(), 0), ("B".into(), 1), ("C".into(), 2)]
    );
}

#[test]
fn max_two_reindents_the_truncated_set() {
    let outline = scenario(&[(1, "A", 0), (2, "B", 10), (3, "C", 20)]);
    assert_eq!(
        texts_and_indents(&outline, 25, 2),
        vec![("B".into(), 0), ("C".into(), 1)]
    );
}

#[test]
fn skipped_level_is_one_indent_step() {
    let outline = scenario(&[(1, "A", 0), (3, "C", 10)]);
    assert_eq!(
        texts_and_indents(&outline, 15, 0),
        vec![("A".into(), 0), ("C".into(), 1)]
    );
}

#[test]
fn later_top_level_heading_replaces_the_chain() {
    let outline = scenario(&[(1, "A", 0), (2, "B", 10), (1, "D", 20)]);
    assert_eq!(texts_and_indents(&outline, 25, 0), vec![("D".into(), 0)]);
}
