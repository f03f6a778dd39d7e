//! Repair of style spans severed by line wrapping.
//!
//! Word wrapping knows nothing about markers, so a span such as
//! `H#sub#2#/sub#O` may end up with its start marker on one line and its end
//! marker on the next. Each wrapped line is balanced on its own: a line that
//! only opens spans gets them closed at its end, and a line that only closes
//! spans gets them opened at its start.

use std::sync::LazyLock;

use regex::Regex;

use super::markup::{contains_end_marker, contains_start_marker, StyleTag};

/// A start marker immediately followed by its own end marker, with nothing
/// but whitespace in between.
static EMPTY_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = StyleTag::MARKED
        .iter()
        .filter_map(|tag| tag.markers())
        .map(|(start, end)| format!(r"{}\s*{}", regex::escape(start), regex::escape(end)))
        .collect();
    Regex::new(&alternatives.join("|")).expect("empty pair pattern is valid")
});

/// Order in which missing markers are inserted.
///
/// Each style present gets exactly one marker in this order, regardless of
/// where its spans sit in the line. Mixed unterminated spans on one line are
/// therefore not closed in nesting order.
pub fn balancing_order() -> [StyleTag; 4] {
    StyleTag::MARKED
}

/// Balance the markers of a single wrapped line.
///
/// - Only start markers: the end marker of each style present is appended.
/// - Only end markers: the start marker of each style present is prepended.
/// - Both or neither: the line is returned unchanged.
///
/// After an insertion, empty spans (a start marker directly followed by its
/// end marker, whitespace allowed) are removed entirely.
pub fn balance(line: &str) -> String {
    let has_start = contains_start_marker(line);
    let has_end = contains_end_marker(line);

    let balanced = if has_start && !has_end {
        let mut balanced = line.to_string();
        for (start, end) in balancing_order().iter().filter_map(|tag| tag.markers()) {
            if line.contains(start) {
                balanced.push_str(end);
            }
        }
        balanced
    } else if has_end && !has_start {
        let mut prefix = String::new();
        for (start, end) in balancing_order().iter().filter_map(|tag| tag.markers()) {
            if line.contains(end) {
                prefix.push_str(start);
            }
        }
        prefix + line
    } else {
        return line.to_string();
    };

    EMPTY_PAIR.replace_all(&balanced, "").into_owned()
}

/// Balance every line of a wrapped paragraph.
pub fn balance_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().map(|line| balance(line.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closes_unterminated_span() {
        assert_eq!(balance("Water is H#sub#2"), "Water is H#sub#2#/sub#");
    }

    #[test]
    fn test_opens_unopened_span() {
        assert_eq!(balance("2#/sub#O is water"), "#sub#2#/sub#O is water");
    }

    #[test]
    fn test_balanced_and_plain_lines_unchanged() {
        assert_eq!(balance("E=mc#sup#2#/sup#"), "E=mc#sup#2#/sup#");
        assert_eq!(balance("plain text"), "plain text");
        assert_eq!(balance(""), "");
    }

    #[test]
    fn test_removes_empty_span_created_by_wrap() {
        assert_eq!(balance("the end #strong#"), "the end ");
        assert_eq!(balance("#sub#  "), "");
        assert_eq!(balance("#/i# rest"), " rest");
    }

    #[test]
    fn test_multiple_types_use_fixed_order() {
        // Bold is opened first but closed last: one end marker per style, in
        // subscript, superscript, bold, icon order.
        assert_eq!(
            balance("#strong#a #sup#b"),
            "#strong#a #sup#b#/sup##/strong#"
        );
        assert_eq!(balance("x#/i# y#/sub#"), "#sub##i#x#/i# y#/sub#");
    }

    #[test]
    fn test_idempotent() {
        for line in [
            "Water is H#sub#2",
            "2#/sub#O",
            "#strong#a #sup#b",
            "E=mc#sup#2#/sup#",
            "plain",
            "#sub#",
        ] {
            let once = balance(line);
            assert_eq!(balance(&once), once, "balancing {line:?} twice");
        }
    }

    #[test]
    fn test_balance_lines() {
        let lines = balance_lines(["a #strong#b", "c#/strong# d"]);
        assert_eq!(lines, vec!["a #strong#b#/strong#", "#strong#c#/strong# d"]);
    }
}
