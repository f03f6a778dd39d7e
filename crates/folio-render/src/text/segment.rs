//! Decomposition of a marked-up line into styled runs.

use crate::error::{RenderError, RenderResult};

use super::markup::StyleTag;

/// A contiguous piece of a line drawn with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<'a> {
    /// The visible text of the run, without markers.
    pub text: &'a str,
    /// The style of the run.
    pub style: StyleTag,
}

impl<'a> Run<'a> {
    /// Create a new run.
    pub fn new(text: &'a str, style: StyleTag) -> Self {
        Self { text, style }
    }

    /// Create a run of plain text.
    pub fn normal(text: &'a str) -> Self {
        Self::new(text, StyleTag::Normal)
    }
}

/// Styles compared when two end markers are found at the same offset.
///
/// The first style in this list wins the tie.
pub fn end_marker_priority() -> [StyleTag; 4] {
    [
        StyleTag::Superscript,
        StyleTag::Subscript,
        StyleTag::Icon,
        StyleTag::Bold,
    ]
}

/// Find the earliest end marker in `text`.
fn earliest_end(text: &str) -> Option<(usize, StyleTag)> {
    let mut earliest: Option<(usize, StyleTag)> = None;
    for tag in end_marker_priority() {
        let Some(end) = tag.end_marker() else {
            continue;
        };
        if let Some(pos) = text.find(end) {
            if earliest.is_none_or(|(best, _)| pos < best) {
                earliest = Some((pos, tag));
            }
        }
    }
    earliest
}

/// Split a balanced line into styled runs, in reading order.
///
/// The line is consumed span by span: the earliest end marker decides the
/// style, and the first start marker of that style opens the span. Text before
/// the start marker is emitted as a `Normal` run. A missing start marker means
/// the span starts at the beginning of the remaining text. Empty runs are not
/// emitted.
///
/// # Errors
///
/// Returns [`RenderError::MalformedMarkup`] if the start marker of the span
/// does not end before its end marker begins.
pub fn segment(line: &str) -> RenderResult<Vec<Run<'_>>> {
    let mut runs = Vec::new();
    let mut rest = line;

    while let Some((end, style)) = earliest_end(rest) {
        let Some((start_marker, end_marker)) = style.markers() else {
            break;
        };

        let (start, content_start) = match rest.find(start_marker) {
            Some(start) => (start, start + start_marker.len()),
            None => (0, 0),
        };

        if content_start > end {
            return Err(RenderError::MalformedMarkup {
                line: rest.to_string(),
                start,
                marker_len: start_marker.len(),
            });
        }

        if start > 0 {
            runs.push(Run::normal(&rest[..start]));
        }

        let content = &rest[content_start..end];
        if !content.is_empty() {
            runs.push(Run::new(content, style));
        }

        rest = &rest[end + end_marker.len()..];
    }

    if !rest.is_empty() {
        runs.push(Run::normal(rest));
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::balance::balance;
    use crate::text::markup::strip_markers;

    fn pairs<'a>(runs: &[Run<'a>]) -> Vec<(&'a str, StyleTag)> {
        runs.iter().map(|run| (run.text, run.style)).collect()
    }

    #[test]
    fn test_superscript_at_end() {
        let runs = segment("E=mc#sup#2#/sup#").unwrap();
        assert_eq!(
            pairs(&runs),
            vec![("E=mc", StyleTag::Normal), ("2", StyleTag::Superscript)]
        );
    }

    #[test]
    fn test_wrapped_subscript() {
        let balanced = balance("Water is H#sub#2");
        assert_eq!(balanced, "Water is H#sub#2#/sub#");

        let runs = segment(&balanced).unwrap();
        assert_eq!(
            pairs(&runs),
            vec![("Water is H", StyleTag::Normal), ("2", StyleTag::Subscript)]
        );
    }

    #[test]
    fn test_mixed_styles_in_order() {
        let runs = segment("#strong#Note:#/strong# H#sub#2#/sub#O #i#\u{e001}#/i# x#sup#n#/sup# end")
            .unwrap();
        assert_eq!(
            pairs(&runs),
            vec![
                ("Note:", StyleTag::Bold),
                (" H", StyleTag::Normal),
                ("2", StyleTag::Subscript),
                ("O ", StyleTag::Normal),
                ("\u{e001}", StyleTag::Icon),
                (" x", StyleTag::Normal),
                ("n", StyleTag::Superscript),
                (" end", StyleTag::Normal),
            ]
        );
    }

    #[test]
    fn test_plain_line_is_single_run() {
        let runs = segment("no markup here").unwrap();
        assert_eq!(pairs(&runs), vec![("no markup here", StyleTag::Normal)]);
        assert!(segment("").unwrap().is_empty());
    }

    #[test]
    fn test_empty_pair_yields_no_runs() {
        assert!(segment("#sub##/sub#").unwrap().is_empty());
        assert!(segment(&balance("#sub#")).unwrap().is_empty());
    }

    #[test]
    fn test_missing_start_marker_starts_at_rest() {
        let runs = segment("abc#/sub# def #sup#x#/sup#").unwrap();
        assert_eq!(
            pairs(&runs),
            vec![
                ("abc", StyleTag::Subscript),
                (" def ", StyleTag::Normal),
                ("x", StyleTag::Superscript),
            ]
        );
    }

    #[test]
    fn test_start_after_end_is_malformed() {
        let err = segment("a#/sub# b #sub#c#/sub#").unwrap_err();
        match err {
            RenderError::MalformedMarkup {
                line,
                start,
                marker_len,
            } => {
                assert_eq!(line, "a#/sub# b #sub#c#/sub#");
                assert_eq!(start, 10);
                assert_eq!(marker_len, "#sub#".len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_start_marker_overlapping_end_is_malformed() {
        let err = segment("#sub#/sub#").unwrap_err();
        assert!(matches!(
            err,
            RenderError::MalformedMarkup { start: 0, marker_len: 5, .. }
        ));

        let err = segment("ok #i#/i# x").unwrap_err();
        assert!(matches!(err, RenderError::MalformedMarkup { start: 3, .. }));
    }

    #[test]
    fn test_tie_break_priority() {
        assert_eq!(
            end_marker_priority(),
            [
                StyleTag::Superscript,
                StyleTag::Subscript,
                StyleTag::Icon,
                StyleTag::Bold,
            ]
        );
        assert_eq!(earliest_end("x#/strong#y#/i#"), Some((1, StyleTag::Bold)));
        assert_eq!(earliest_end("x#/i#y#/strong#"), Some((1, StyleTag::Icon)));
        assert_eq!(earliest_end("plain"), None);
    }

    #[test]
    fn test_reconstructs_visible_text() {
        let line = "#strong#A#/strong#b#sub#c#/sub#d#sup#e#/sup##i#f#/i#g";
        let runs = segment(line).unwrap();
        let joined: String = runs.iter().map(|run| run.text).collect();
        assert_eq!(joined, strip_markers(line));
    }
}
