//! Property-based tests for the text engine
//!
//! These tests check the structural guarantees the layout relies on:
//! - intervals cover a line window exactly, in order, without overlaps
//! - segmented runs reconstruct the visible text of a line
//! - balancing a line twice changes nothing

use folio_render::text::{
    balance, intervals, segment, strip_markers, Interval, LineWindow, ScriptRange, StyleTag,
};
use folio_render::ClipPolicy;
use proptest::prelude::*;

const MARKERS: [&str; 8] = [
    "#sub#", "#/sub#", "#sup#", "#/sup#", "#strong#", "#/strong#", "#i#", "#/i#",
];

/// Generate plain text that cannot form markers with its neighbours
fn plain_text_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9 ]{0,6}"
}

/// Generate a flat, well-formed marked line
fn marked_line_strategy() -> impl Strategy<Value = String> {
    let piece = (plain_text_strategy(), 0usize..5).prop_map(|(text, kind)| match kind {
        0 => format!("#sub#{text}#/sub#"),
        1 => format!("#sup#{text}#/sup#"),
        2 => format!("#strong#{text}#/strong#"),
        3 => format!("#i#{text}#/i#"),
        _ => text,
    });
    prop::collection::vec(piece, 0..6).prop_map(|pieces| pieces.concat())
}

/// Generate a line using every marker at most once, in any order
fn loose_line_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::subsequence(MARKERS.to_vec(), 0..=MARKERS.len()).prop_shuffle(),
        prop::collection::vec(plain_text_strategy(), MARKERS.len() + 1),
    )
        .prop_map(|(markers, texts)| {
            let mut line = String::new();
            for (text, marker) in texts.iter().zip(markers.iter()) {
                line.push_str(text);
                line.push_str(marker);
            }
            line.push_str(&texts[markers.len()]);
            line
        })
}

/// Generate a window and disjoint script ranges around it
fn window_strategy() -> impl Strategy<Value = (usize, usize, Vec<(ScriptRange, bool)>)> {
    (
        0usize..40,
        0usize..30,
        prop::collection::vec((0usize..8, 1usize..8, any::<bool>()), 0..8),
    )
        .prop_map(|(from, len, spans)| {
            let mut cursor = 0;
            let ranges = spans
                .into_iter()
                .map(|(gap, width, is_superscript)| {
                    let start = cursor + gap;
                    cursor = start + width;
                    (ScriptRange::new(start, cursor), is_superscript)
                })
                .collect();
            (from, len, ranges)
        })
}

fn check_coverage(result: &[Interval], from: usize, to: usize) -> Result<(), TestCaseError> {
    prop_assert!(!result.is_empty());
    prop_assert_eq!(result[0].start, from);
    prop_assert_eq!(result[result.len() - 1].end, to);
    for pair in result.windows(2) {
        prop_assert_eq!(pair[0].end, pair[1].start);
        prop_assert!(!pair[0].is_empty());
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_intervals_cover_window((from, len, ranges) in window_strategy(), clip in any::<bool>()) {
        let text = "x".repeat(len);
        let window = LineWindow::new(from, &text);
        let superscript: Vec<ScriptRange> =
            ranges.iter().filter(|(_, sup)| *sup).map(|(range, _)| *range).collect();
        let subscript: Vec<ScriptRange> =
            ranges.iter().filter(|(_, sup)| !*sup).map(|(range, _)| *range).collect();
        let policy = if clip { ClipPolicy::ClipToWindow } else { ClipPolicy::Legacy };

        let result = intervals(&window, &superscript, &subscript, policy).unwrap();
        check_coverage(&result, from, from + len)?;

        for interval in &result {
            prop_assert!(window.slice(interval).is_ok());
        }
    }

    #[test]
    fn test_runs_reconstruct_visible_text(line in marked_line_strategy()) {
        let runs = segment(&line).unwrap();
        let joined: String = runs.iter().map(|run| run.text).collect();
        prop_assert_eq!(joined, strip_markers(&line));
        prop_assert!(runs.iter().all(|run| !run.text.is_empty()));
    }

    #[test]
    fn test_marked_runs_keep_their_style(text in "[A-Z]{1,6}") {
        let line = format!("#sup#{text}#/sup#");
        let runs = segment(&line).unwrap();
        prop_assert_eq!(runs.len(), 1);
        prop_assert_eq!(runs[0].style, StyleTag::Superscript);
        prop_assert_eq!(runs[0].text, text.as_str());
    }

    #[test]
    fn test_balance_is_idempotent(line in loose_line_strategy()) {
        let once = balance(&line);
        prop_assert_eq!(balance(&once), once);
    }

    #[test]
    fn test_balance_keeps_well_formed_lines(line in marked_line_strategy()) {
        let balanced = balance(&line);
        prop_assert_eq!(strip_markers(&balanced), strip_markers(&line));
    }
}
