//! Inline style markers.
//!
//! Paragraph text carries flat, non-nesting style spans delimited by textual
//! markers:
//!
//! | style       | start       | end          |
//! |-------------|-------------|--------------|
//! | subscript   | `#sub#`     | `#/sub#`     |
//! | superscript | `#sup#`     | `#/sup#`     |
//! | bold        | `#strong#`  | `#/strong#`  |
//! | icon        | `#i#`       | `#/i#`       |
//!
//! Text outside any span is [`StyleTag::Normal`].

use std::sync::LazyLock;

use regex::Regex;

/// Style of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleTag {
    /// Plain text in the primary font.
    #[default]
    Normal,
    /// Text in the bold font.
    Bold,
    /// Reduced-size text on the baseline.
    Subscript,
    /// Reduced-size text raised above the baseline.
    Superscript,
    /// A glyph from the icon font, in the accent color.
    Icon,
}

impl StyleTag {
    /// All styles that have markers, in canonical order.
    pub const MARKED: [StyleTag; 4] = [
        StyleTag::Subscript,
        StyleTag::Superscript,
        StyleTag::Bold,
        StyleTag::Icon,
    ];

    /// The start and end markers of this style, or `None` for `Normal`.
    pub const fn markers(self) -> Option<(&'static str, &'static str)> {
        match self {
            StyleTag::Normal => None,
            StyleTag::Bold => Some(("#strong#", "#/strong#")),
            StyleTag::Subscript => Some(("#sub#", "#/sub#")),
            StyleTag::Superscript => Some(("#sup#", "#/sup#")),
            StyleTag::Icon => Some(("#i#", "#/i#")),
        }
    }

    /// The start marker of this style.
    pub fn start_marker(self) -> Option<&'static str> {
        self.markers().map(|(start, _)| start)
    }

    /// The end marker of this style.
    pub fn end_marker(self) -> Option<&'static str> {
        self.markers().map(|(_, end)| end)
    }
}

static ANY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#/?(?:sub|sup|strong|i)#").expect("marker pattern is valid")
});

/// Whether `line` contains the start marker of any style.
pub fn contains_start_marker(line: &str) -> bool {
    StyleTag::MARKED
        .iter()
        .filter_map(|tag| tag.start_marker())
        .any(|marker| line.contains(marker))
}

/// Whether `line` contains the end marker of any style.
pub fn contains_end_marker(line: &str) -> bool {
    StyleTag::MARKED
        .iter()
        .filter_map(|tag| tag.end_marker())
        .any(|marker| line.contains(marker))
}

/// Remove every marker from `line`, leaving the visible text.
pub fn strip_markers(line: &str) -> String {
    ANY_MARKER.replace_all(line, "").into_owned()
}
