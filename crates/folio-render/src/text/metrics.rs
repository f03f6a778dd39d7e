//! Font metrics and horizontal alignment.

use super::font::FontHandle;
use super::markup::strip_markers;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlign {
    /// Left-aligned text.
    #[default]
    Left,
    /// Center-aligned text.
    Center,
    /// Right-aligned text.
    Right,
    /// Justified text (stretched to fill width).
    Justified,
}

/// Measurements of text set in a font.
pub trait FontMetrics {
    /// Height of a line of text, without extra spacing.
    fn content_height(&self, font: &FontHandle, font_size: f32) -> f32;

    /// Advance width of `text`.
    fn text_width(&self, text: &str, font: &FontHandle, font_size: f32) -> f32;
}

impl<M: FontMetrics + ?Sized> FontMetrics for &M {
    fn content_height(&self, font: &FontHandle, font_size: f32) -> f32 {
        (**self).content_height(font, font_size)
    }

    fn text_width(&self, text: &str, font: &FontHandle, font_size: f32) -> f32 {
        (**self).text_width(text, font, font_size)
    }
}

/// Computes where a line starts relative to the left edge of its frame.
pub trait Aligner {
    /// Horizontal offset of `line` within a frame of `width`.
    fn alignment_shift(
        &self,
        line: &str,
        font: &FontHandle,
        font_size: f32,
        width: f32,
        align: HorizontalAlign,
    ) -> f32;
}

/// Fixed-pitch metrics: every character has the same advance.
///
/// Deterministic and font-independent, which makes it suitable for tests and
/// for sizing text before real fonts are available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Advance of one character, as a fraction of the font size.
    pub advance_ratio: f32,
    /// Line content height, as a fraction of the font size.
    pub height_ratio: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance_ratio: 0.5,
            height_ratio: 1.2,
        }
    }
}

impl MonospaceMetrics {
    /// Create metrics with the given ratios.
    pub fn new(advance_ratio: f32, height_ratio: f32) -> Self {
        Self {
            advance_ratio,
            height_ratio,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn content_height(&self, _font: &FontHandle, font_size: f32) -> f32 {
        font_size * self.height_ratio
    }

    fn text_width(&self, text: &str, _font: &FontHandle, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.advance_ratio
    }
}

/// Aligns lines using the width of their visible text, trailing whitespace
/// excluded.
///
/// Justified lines start at the left edge; stretching them is left to the
/// drawing sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricAligner<M> {
    metrics: M,
}

impl<M: FontMetrics> MetricAligner<M> {
    /// Create an aligner measuring with `metrics`.
    pub fn new(metrics: M) -> Self {
        Self { metrics }
    }
}

impl<M: FontMetrics> Aligner for MetricAligner<M> {
    fn alignment_shift(
        &self,
        line: &str,
        font: &FontHandle,
        font_size: f32,
        width: f32,
        align: HorizontalAlign,
    ) -> f32 {
        let visible = strip_markers(line);
        let text_width = self.metrics.text_width(visible.trim_end(), font, font_size);
        match align {
            HorizontalAlign::Left | HorizontalAlign::Justified => 0.0,
            HorizontalAlign::Right => width - text_width,
            HorizontalAlign::Center => (width - text_width) / 2.0,
        }
    }
}
