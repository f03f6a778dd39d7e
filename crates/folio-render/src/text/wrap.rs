//! Breaking paragraphs into width-constrained lines.

use unicode_segmentation::UnicodeSegmentation;

use super::font::FontHandle;
use super::markup::strip_markers;
use super::metrics::FontMetrics;

/// Breaks text into lines that fit a width.
pub trait LineWrapper {
    /// Wrap one paragraph segment (without hard line breaks) into lines.
    ///
    /// Markers count as zero-width text, and may end up split across lines;
    /// the balancer repairs that afterwards.
    fn wrap_lines(&self, text: &str, font: &FontHandle, font_size: f32, width: f32) -> Vec<String>;
}

/// Split `text` at hard line breaks (`\n` or `\r\n`) and wrap every segment.
///
/// Empty segments at the end of the text are dropped, so a trailing line
/// break adds no line. Empty text still yields one segment.
pub fn wrap_paragraph<W: LineWrapper + ?Sized>(
    wrapper: &W,
    text: &str,
    font: &FontHandle,
    font_size: f32,
    width: f32,
) -> Vec<String> {
    hard_lines(text)
        .into_iter()
        .flat_map(|segment| wrapper.wrap_lines(segment, font, font_size, width))
        .collect()
}

/// Split `text` at `\r?\n`, without trailing empty segments.
fn hard_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return vec![text];
    }

    let mut segments: Vec<&str> = text
        .split_inclusive('\n')
        .map(|segment| match segment.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => segment,
        })
        .collect();
    while segments.last().is_some_and(|segment| segment.is_empty()) {
        segments.pop();
    }
    segments
}

/// Greedy word wrapper.
///
/// Lines break only where whitespace is followed by a word, so markers are
/// never cut in half. Whitespace stays attached to the end of the preceding
/// line, which keeps the concatenation of all lines equal to the input. A word
/// wider than the frame gets a line of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyWrapper<M> {
    metrics: M,
}

impl<M: FontMetrics> GreedyWrapper<M> {
    /// Create a wrapper measuring with `metrics`.
    pub fn new(metrics: M) -> Self {
        Self { metrics }
    }

    fn visible_width(&self, text: &str, font: &FontHandle, font_size: f32) -> f32 {
        self.metrics
            .text_width(strip_markers(text).trim_end(), font, font_size)
    }
}

/// Split `text` into words, each carrying its trailing whitespace.
fn break_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut after_space = false;

    for (idx, segment) in text.split_word_bound_indices() {
        let is_space = segment.chars().all(char::is_whitespace);
        if after_space && !is_space {
            chunks.push(&text[start..idx]);
            start = idx;
        }
        after_space = is_space;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

impl<M: FontMetrics> LineWrapper for GreedyWrapper<M> {
    fn wrap_lines(&self, text: &str, font: &FontHandle, font_size: f32, width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();

        for chunk in break_chunks(text) {
            if !line.is_empty() {
                let candidate = format!("{line}{chunk}");
                if self.visible_width(&candidate, font, font_size) > width {
                    lines.push(std::mem::take(&mut line));
                }
            }
            line.push_str(chunk);
        }

        if !line.is_empty() || lines.is_empty() {
            lines.push(line);
        }
        lines
    }
}
