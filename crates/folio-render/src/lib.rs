//! Annotated rich-text paragraph writer for Folio.
//!
//! This crate lays out paragraphs of annotated text onto paginated drawing
//! surfaces. Paragraph text carries inline style markers (bold, subscript,
//! superscript, icon) and may come with externally supplied subscript and
//! superscript ranges; the writer turns it into positioned, styled draw calls.
//!
//! Wrapping, measuring, font loading and drawing are delegated to
//! collaborators behind traits, so the crate works with any backend. Simple
//! implementations of each ship with the crate for tests and prototyping.
//!
//! # Writing a Paragraph
//!
//! ```
//! use folio_render::pages::{JsonPathEvaluator, RecordingPages};
//! use folio_render::text::{
//!     FontCache, FontSource, GreedyWrapper, MetricAligner, MonospaceMetrics,
//!     NamedFontResolver, RecordingSink,
//! };
//! use folio_render::{Collaborators, ExtractedText, Frame, Paragraph, Point, TextConfig, TextWriter};
//!
//! # fn main() -> folio_render::RenderResult<()> {
//! let metrics = MonospaceMetrics::default();
//! let wrapper = GreedyWrapper::new(metrics);
//! let aligner = MetricAligner::new(metrics);
//! let config = TextConfig::default();
//! let cache = FontCache::from_config(&config);
//!
//! let writer = TextWriter::new(
//!     config,
//!     Collaborators {
//!         wrapper: &wrapper,
//!         metrics: &metrics,
//!         aligner: &aligner,
//!         resolver: &NamedFontResolver,
//!         evaluator: &JsonPathEvaluator,
//!         fonts: &cache,
//!     },
//! )?;
//!
//! let paragraph = Paragraph::new(
//!     ExtractedText::new("Water is H#sub#2#/sub#O"),
//!     FontSource::id("Helvetica"),
//!     FontSource::id("Helvetica-Bold"),
//!     12.0,
//! );
//!
//! let mut sink = RecordingSink::new(metrics);
//! let mut pages = RecordingPages::new();
//! let frame = Frame::new(Point::new(50.0, 700.0), 400.0);
//! let baseline = writer.write(&paragraph, frame, &mut sink, &mut pages)?;
//!
//! assert_eq!(sink.ops().len(), 3);
//! assert!(baseline < 700.0);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod pages;
pub mod text;
mod types;
mod writer;

pub use error::{RenderError, RenderResult};
pub use types::{Color, Point};
pub use writer::{Collaborators, ExtractedText, Frame, Paragraph, ParagraphRole, TextWriter};

// Re-export configuration types used when building a writer
pub use folio_core::{ClipPolicy, TextConfig};
