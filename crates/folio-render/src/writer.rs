//! The paragraph writer.
//!
//! [`TextWriter`] ties the text engine to its collaborators: it resolves the
//! paragraph fonts, wraps the extracted text into lines, handles page
//! placeholders and hands the lines to [`LineLayout`].

use serde_json::Value;
use tracing::{debug, debug_span, trace, warn};

use folio_core::logging::{span_names, targets};
use folio_core::TextConfig;

use crate::error::RenderResult;
use crate::pages::{
    ExpressionEvaluator, PageCountData, PageData, PageId, PageNumberData, PageNumberLinkData,
    PageRecorder,
};
use crate::text::{
    wrap_paragraph, Aligner, DocumentId, DrawSink, FontCache, FontKey, FontMetrics, FontResolver,
    FontSet, FontSource, HorizontalAlign, LayoutParams, LineLayout, LineWrapper, ScriptRange,
    StyleMapping,
};
use crate::types::Point;

/// Paragraph text as produced by text extraction.
///
/// Script ranges are byte ranges into `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub superscript_ranges: Vec<ScriptRange>,
    pub subscript_ranges: Vec<ScriptRange>,
}

impl ExtractedText {
    /// Text without script ranges.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the superscript ranges.
    pub fn superscript(mut self, ranges: impl IntoIterator<Item = ScriptRange>) -> Self {
        self.superscript_ranges = ranges.into_iter().collect();
        self
    }

    /// Set the subscript ranges.
    pub fn subscript(mut self, ranges: impl IntoIterator<Item = ScriptRange>) -> Self {
        self.subscript_ranges = ranges.into_iter().collect();
        self
    }
}

/// What a paragraph stands for on its page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParagraphRole {
    /// Ordinary text.
    #[default]
    Body,
    /// Placeholder for the current page number. Draws nothing.
    PageNumber,
    /// Placeholder for the document's page count. Draws nothing.
    PageCount,
    /// Text marking its page as the target of page-number links.
    PageAnchor {
        condition: Option<String>,
        var: Option<String>,
        value: String,
    },
    /// Text linking to an anchored page.
    PageNumberLink {
        value: String,
        document_link: bool,
        /// Expression for the link text of document links.
        message: Option<String>,
    },
}

/// A paragraph to write.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub extracted: ExtractedText,
    pub font: FontSource,
    pub bold_font: FontSource,
    pub font_size: f32,
    pub line_spacing: f32,
    pub align: HorizontalAlign,
    pub job_id: String,
    pub document: DocumentId,
    pub page: PageId,
    pub role: ParagraphRole,
    /// Data context for anchor and link expressions.
    pub data: Value,
}

impl Paragraph {
    /// A left-aligned body paragraph on the first page of the default
    /// document.
    pub fn new(extracted: ExtractedText, font: FontSource, bold_font: FontSource, font_size: f32) -> Self {
        Self {
            extracted,
            font,
            bold_font,
            font_size,
            line_spacing: 0.0,
            align: HorizontalAlign::Left,
            job_id: String::new(),
            document: DocumentId::default(),
            page: PageId::default(),
            role: ParagraphRole::Body,
            data: Value::Null,
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

    /// Set the job, document and page the paragraph belongs to.
    pub fn placement(mut self, job_id: impl Into<String>, document: DocumentId, page: PageId) -> Self {
        self.job_id = job_id.into();
        self.document = document;
        self.page = page;
        self
    }

    /// Set the paragraph role.
    pub fn role(mut self, role: ParagraphRole) -> Self {
        self.role = role;
        self
    }

    /// Set the expression data context.
    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Where on the page a paragraph goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Origin of the next line of the page layout.
    pub origin: Point,
    pub width: f32,
}

impl Frame {
    /// Create a new frame.
    pub fn new(origin: Point, width: f32) -> Self {
        Self { origin, width }
    }
}

/// The services a [`TextWriter`] relies on.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub wrapper: &'a dyn LineWrapper,
    pub metrics: &'a dyn FontMetrics,
    pub aligner: &'a dyn Aligner,
    pub resolver: &'a dyn FontResolver,
    pub evaluator: &'a dyn ExpressionEvaluator,
    pub fonts: &'a FontCache,
}

/// Writes paragraphs onto a drawing sink.
pub struct TextWriter<'a> {
    config: TextConfig,
    services: Collaborators<'a>,
}

impl<'a> TextWriter<'a> {
    /// Create a writer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Config`](crate::RenderError::Config) if the
    /// configuration is invalid.
    pub fn new(config: TextConfig, services: Collaborators<'a>) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self { config, services })
    }

    /// Write `paragraph` into `frame` and return the baseline of its last
    /// line.
    ///
    /// Page-number and page-count placeholders draw nothing: they record
    /// their position with `pages` and return `0`. Anchors and page-number
    /// links record themselves and are then drawn like body text.
    ///
    /// # Errors
    ///
    /// Fails if a font cannot be resolved, or if the paragraph carries
    /// malformed markup or script ranges. Nothing is recorded in that case,
    /// but lines drawn before the failure stay drawn.
    pub fn write(
        &self,
        paragraph: &Paragraph,
        frame: Frame,
        sink: &mut dyn DrawSink,
        pages: &mut dyn PageRecorder,
    ) -> RenderResult<f32> {
        let _span = debug_span!(
            span_names::WRITE_PARAGRAPH,
            job = %paragraph.job_id,
            page = paragraph.page.0
        )
        .entered();

        self.write_inner(paragraph, frame, sink, pages)
            .inspect_err(|err| warn!(target: targets::WRITER, error = %err, "paragraph write failed"))
    }

    fn write_inner(
        &self,
        paragraph: &Paragraph,
        frame: Frame,
        sink: &mut dyn DrawSink,
        pages: &mut dyn PageRecorder,
    ) -> RenderResult<f32> {
        let fonts = self.resolve_fonts(paragraph)?;
        let lines = wrap_paragraph(
            self.services.wrapper,
            &paragraph.extracted.text,
            &fonts.primary,
            paragraph.font_size,
            frame.width,
        );

        match &paragraph.role {
            ParagraphRole::PageNumber => {
                trace!(target: targets::WRITER, "page number placeholder");
                pages.record_page_number(PageData {
                    origin: frame.origin,
                    page: paragraph.page,
                    width: frame.width,
                });
                return Ok(0.0);
            }
            ParagraphRole::PageCount => {
                trace!(target: targets::WRITER, "page count placeholder");
                pages.record_page_count(PageCountData {
                    origin: frame.origin,
                    document: paragraph.document,
                    page: paragraph.page,
                    width: frame.width,
                });
                return Ok(0.0);
            }
            ParagraphRole::PageAnchor { condition, var, value } => {
                let evaluator = self.services.evaluator;
                if evaluator.condition(condition.as_deref(), var.as_deref(), &paragraph.data) {
                    pages.record_anchor(PageNumberData {
                        page: paragraph.page,
                        text_value: evaluator.evaluate(value, &paragraph.data),
                    });
                } else {
                    trace!(target: targets::WRITER, "anchor condition does not hold");
                }
            }
            ParagraphRole::PageNumberLink {
                value,
                document_link,
                message,
            } => {
                let evaluator = self.services.evaluator;
                let message = message
                    .as_deref()
                    .filter(|_| *document_link)
                    .map(|message| evaluator.evaluate(message, &paragraph.data));
                debug!(target: targets::WRITER, value = %value, "page number link");
                pages.record_link(PageNumberLinkData {
                    origin: frame.origin,
                    page: paragraph.page,
                    width: frame.width,
                    text_value: evaluator.evaluate(value, &paragraph.data),
                    reference_value: value.clone(),
                    message,
                });
            }
            ParagraphRole::Body => {}
        }

        let layout = LineLayout::new(
            self.services.metrics,
            self.services.aligner,
            StyleMapping::from_config(&self.config),
        )
        .clip_policy(self.config.clip_policy);

        let params = LayoutParams::new(&fonts, paragraph.font_size, frame.origin, frame.width)
            .line_spacing(paragraph.line_spacing)
            .align(paragraph.align)
            .scripts(
                &paragraph.extracted.superscript_ranges,
                &paragraph.extracted.subscript_ranges,
            );

        trace!(target: targets::WRITER, lines = lines.len(), "laying out paragraph");
        layout.render(&lines, &params, sink)
    }

    fn resolve_fonts(&self, paragraph: &Paragraph) -> RenderResult<FontSet> {
        let resolver = self.services.resolver;
        let primary = resolver.resolve(&paragraph.font, &paragraph.job_id, paragraph.document)?;
        let bold = resolver.resolve(&paragraph.bold_font, &paragraph.job_id, paragraph.document)?;

        let icon_font = &self.config.icon_font;
        let key = FontKey::new(icon_font.path.as_str(), icon_font.family.as_str(), paragraph.document);
        let icon = self.services.fonts.get_or_load(key, |key| {
            let source = FontSource::external(key.path.as_str(), key.family.as_str());
            resolver.resolve(&source, &paragraph.job_id, paragraph.document)
        })?;

        Ok(FontSet { primary, bold, icon })
    }
}
