//! Line layout: from wrapped lines to positioned draw calls.
//!
//! Each wrapped line is balanced, placed on its own baseline, shifted for
//! alignment, and split into styled pieces:
//!
//! - lines carrying explicit markers are split by the [run segmenter](super::segment),
//! - all other lines are split by the [interval algebra](super::intervals)
//!   using the paragraph's script ranges.
//!
//! Pieces are drawn left to right, each one starting where the previous one's
//! rendered width ended.
//!
//! # Example
//!
//! ```
//! use folio_render::text::{
//!     FontHandle, FontSet, LayoutParams, LineLayout, MetricAligner, MonospaceMetrics,
//!     RecordingSink, StyleMapping,
//! };
//! use folio_render::Point;
//!
//! let metrics = MonospaceMetrics::default();
//! let aligner = MetricAligner::new(metrics);
//! let layout = LineLayout::new(&metrics, &aligner, StyleMapping::default());
//!
//! let font = FontHandle::new("Helvetica");
//! let fonts = FontSet { primary: font.clone(), bold: font.clone(), icon: font };
//! let params = LayoutParams::new(&fonts, 12.0, Point::new(50.0, 700.0), 200.0);
//!
//! let mut sink = RecordingSink::new(metrics);
//! let lines = vec!["E=mc#sup#2#/sup#".to_string()];
//! let last_baseline = layout.render(&lines, &params, &mut sink).unwrap();
//!
//! assert_eq!(sink.ops().len(), 2);
//! assert!(last_baseline < 700.0);
//! ```

use tracing::{trace, trace_span};

use folio_core::logging::{span_names, targets};
use folio_core::{ClipPolicy, TextConfig};

use crate::error::RenderResult;
use crate::types::{Color, Point};

use super::balance::balance;
use super::font::{FontHandle, FontSet};
use super::intervals::{intervals, LineWindow, ScriptRange};
use super::markup::{contains_end_marker, StyleTag};
use super::metrics::{Aligner, FontMetrics, HorizontalAlign};
use super::segment::segment;

/// Receives draw calls for a page.
pub trait DrawSink {
    /// Draw `text` with its baseline starting at `position` and return the
    /// advance width of what was drawn.
    fn draw_run(
        &mut self,
        text: &str,
        font: &FontHandle,
        font_size: f32,
        position: Point,
        color: Option<Color>,
    ) -> f32;
}

/// A draw call captured by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub text: String,
    pub font: FontHandle,
    pub font_size: f32,
    pub position: Point,
    pub color: Option<Color>,
}

/// A sink that records draw calls instead of rendering them.
///
/// Widths are measured with the supplied metrics.
#[derive(Debug, Clone)]
pub struct RecordingSink<M> {
    metrics: M,
    ops: Vec<DrawOp>,
}

impl<M: FontMetrics> RecordingSink<M> {
    /// Create an empty recording sink.
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            ops: Vec::new(),
        }
    }

    /// The recorded draw calls, in issue order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded draw calls, leaving the sink empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl<M: FontMetrics> DrawSink for RecordingSink<M> {
    fn draw_run(
        &mut self,
        text: &str,
        font: &FontHandle,
        font_size: f32,
        position: Point,
        color: Option<Color>,
    ) -> f32 {
        self.ops.push(DrawOp {
            text: text.to_string(),
            font: font.clone(),
            font_size,
            position,
            color,
        });
        self.metrics.text_width(text, font, font_size)
    }
}

/// How a run of a given style is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    pub font: FontHandle,
    pub font_size: f32,
    /// Added to the line baseline.
    pub baseline_offset: f32,
    /// Replaces the sink's current color when set.
    pub color: Option<Color>,
}

/// Mapping from [`StyleTag`] to drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleMapping {
    pub subscript_divisor: f32,
    pub superscript_divisor: f32,
    pub icon_size_delta: f32,
    pub icon_color: Color,
}

impl Default for StyleMapping {
    fn default() -> Self {
        Self {
            subscript_divisor: 2.4,
            superscript_divisor: 2.2,
            icon_size_delta: 2.0,
            icon_color: Color::ICON_ACCENT,
        }
    }
}

impl StyleMapping {
    /// Build the mapping described by a configuration.
    pub fn from_config(config: &TextConfig) -> Self {
        Self {
            subscript_divisor: config.subscript_divisor,
            superscript_divisor: config.superscript_divisor,
            icon_size_delta: config.icon_size_delta,
            icon_color: Color::from(config.icon_rgba8()),
        }
    }

    /// Drawing parameters of `style`.
    ///
    /// `content_height` is the line content height of the primary font at
    /// `font_size`; superscripts are raised by half of it.
    pub fn params(&self, style: StyleTag, fonts: &FontSet, font_size: f32, content_height: f32) -> RunParams {
        let (font, font_size, baseline_offset, color) = match style {
            StyleTag::Normal => (&fonts.primary, font_size, 0.0, None),
            StyleTag::Bold => (&fonts.bold, font_size, 0.0, None),
            StyleTag::Subscript => (&fonts.primary, font_size / self.subscript_divisor, 0.0, None),
            StyleTag::Superscript => (
                &fonts.primary,
                font_size / self.superscript_divisor,
                content_height / 2.0,
                None,
            ),
            StyleTag::Icon => (
                &fonts.icon,
                font_size + self.icon_size_delta,
                0.0,
                Some(self.icon_color),
            ),
        };
        RunParams {
            font: font.clone(),
            font_size,
            baseline_offset,
            color,
        }
    }
}

/// Inputs of one paragraph layout.
#[derive(Debug, Clone)]
pub struct LayoutParams<'a> {
    pub fonts: &'a FontSet,
    pub font_size: f32,
    /// Top-left corner of the text block.
    pub origin: Point,
    /// Extra space between lines.
    pub line_spacing: f32,
    /// Width of the frame the lines are aligned in.
    pub width: f32,
    pub align: HorizontalAlign,
    /// Superscript ranges, in paragraph byte offsets.
    pub superscript: &'a [ScriptRange],
    /// Subscript ranges, in paragraph byte offsets.
    pub subscript: &'a [ScriptRange],
}

impl<'a> LayoutParams<'a> {
    /// Left-aligned layout without line spacing or script ranges.
    pub fn new(fonts: &'a FontSet, font_size: f32, origin: Point, width: f32) -> Self {
        Self {
            fonts,
            font_size,
            origin,
            line_spacing: 0.0,
            width,
            align: HorizontalAlign::Left,
            superscript: &[],
            subscript: &[],
        }
    }

    /// Set the extra space between lines.
    pub fn line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set horizontal alignment.
    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the script ranges of the paragraph.
    pub fn scripts(mut self, superscript: &'a [ScriptRange], subscript: &'a [ScriptRange]) -> Self {
        self.superscript = superscript;
        self.subscript = subscript;
        self
    }
}

/// Progress through a paragraph, threaded from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    /// Baseline of the most recently laid out line.
    pub baseline: f32,
    /// Index of the next line.
    pub line_index: usize,
    /// Paragraph offset where the next line's window starts.
    pub window_from: usize,
}

impl LayoutState {
    /// State before the first line of a block starting at `origin_y`.
    pub fn new(origin_y: f32) -> Self {
        Self {
            baseline: origin_y,
            line_index: 0,
            window_from: 0,
        }
    }
}

/// Lays out wrapped lines and issues their draw calls.
pub struct LineLayout<'a> {
    metrics: &'a dyn FontMetrics,
    aligner: &'a dyn Aligner,
    mapping: StyleMapping,
    clip_policy: ClipPolicy,
}

impl<'a> LineLayout<'a> {
    /// Create a layout with the legacy clip policy.
    pub fn new(metrics: &'a dyn FontMetrics, aligner: &'a dyn Aligner, mapping: StyleMapping) -> Self {
        Self {
            metrics,
            aligner,
            mapping,
            clip_policy: ClipPolicy::Legacy,
        }
    }

    /// Set how script ranges running past a line are clipped.
    pub fn clip_policy(mut self, policy: ClipPolicy) -> Self {
        self.clip_policy = policy;
        self
    }

    /// Lay out and draw `lines`, as produced by the line wrapper.
    ///
    /// Line `i` sits on baseline `origin.y - (line_height * (i + 1) - line_spacing)`
    /// where `line_height` is the content height plus the line spacing.
    /// Returns the baseline of the last line, or `origin.y` if there are no
    /// lines.
    ///
    /// # Errors
    ///
    /// Malformed markup or script ranges abort the layout. Lines drawn before
    /// the failing one stay drawn.
    pub fn render<S: AsRef<str>>(
        &self,
        lines: &[S],
        params: &LayoutParams<'_>,
        sink: &mut dyn DrawSink,
    ) -> RenderResult<f32> {
        let _span = trace_span!(span_names::LAYOUT_LINES, lines = lines.len()).entered();

        let content_height = self.metrics.content_height(&params.fonts.primary, params.font_size);
        let line_height = content_height + params.line_spacing;

        let state = lines.iter().try_fold(LayoutState::new(params.origin.y), |state, line| {
            self.render_line(state, line.as_ref(), params, content_height, line_height, &mut *sink)
        })?;
        Ok(state.baseline)
    }

    fn render_line(
        &self,
        state: LayoutState,
        wrapped: &str,
        params: &LayoutParams<'_>,
        content_height: f32,
        line_height: f32,
        sink: &mut dyn DrawSink,
    ) -> RenderResult<LayoutState> {
        let line = balance(wrapped);
        let baseline =
            params.origin.y - (line_height * (state.line_index + 1) as f32 - params.line_spacing);
        let shift = self.aligner.alignment_shift(
            &line,
            &params.fonts.primary,
            params.font_size,
            params.width,
            params.align,
        );

        let pieces: Vec<(&str, StyleTag)> = if contains_end_marker(&line) {
            trace!(target: targets::LAYOUT, line = state.line_index, "segmenting marked line");
            segment(&line)?
                .into_iter()
                .map(|run| (run.text, run.style))
                .collect()
        } else {
            let window = LineWindow::new(state.window_from, &line);
            trace!(
                target: targets::LAYOUT,
                line = state.line_index,
                from = window.from,
                to = window.to,
                "splitting line by script ranges"
            );
            intervals(&window, params.superscript, params.subscript, self.clip_policy)?
                .iter()
                .map(|interval| window.slice(interval).map(|text| (text, interval.style)))
                .collect::<RenderResult<_>>()?
        };

        let start_x = params.origin.x + shift;
        let end_x = pieces.into_iter().fold(start_x, |cursor, (text, style)| {
            let run = self.mapping.params(style, params.fonts, params.font_size, content_height);
            let position = Point::new(cursor, baseline + run.baseline_offset);
            cursor + sink.draw_run(text, &run.font, run.font_size, position, run.color)
        });
        trace!(
            target: targets::LAYOUT,
            line = state.line_index,
            baseline,
            width = end_x - start_x,
            "line drawn"
        );

        Ok(LayoutState {
            baseline,
            line_index: state.line_index + 1,
            window_from: state.window_from + wrapped.len(),
        })
    }
}
