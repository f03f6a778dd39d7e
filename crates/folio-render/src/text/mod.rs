//! Text layout subsystem for Folio.
//!
//! This module turns wrapped paragraph lines into positioned, styled draw
//! calls. Styling comes from two sources:
//!
//! - inline markers such as `#sub#…#/sub#`, `#sup#…#/sup#`,
//!   `#strong#…#/strong#` and `#i#…#/i#`,
//! - superscript and subscript byte ranges attached to the paragraph text.
//!
//! # Marker Handling
//!
//! Wrapping can split a marked span over two lines. [`balance`] closes and
//! reopens such spans so every line is self-contained, and [`segment`] then
//! splits a line into styled [`Run`]s:
//!
//! ```
//! use folio_render::text::{balance, segment, StyleTag};
//!
//! let line = balance("H#sub#2");
//! assert_eq!(line, "H#sub#2#/sub#");
//!
//! let runs = segment(&line).unwrap();
//! assert_eq!(runs[0].text, "H");
//! assert_eq!(runs[1].style, StyleTag::Subscript);
//! ```
//!
//! # Script Ranges
//!
//! Lines without markers are split by [`intervals`] using the ranges that fall
//! inside the line's [`LineWindow`]:
//!
//! ```
//! use folio_render::text::{intervals, LineWindow, ScriptRange, StyleTag};
//! use folio_render::ClipPolicy;
//!
//! let window = LineWindow::new(0, "x2 + y2");
//! let sup = [ScriptRange::new(1, 2), ScriptRange::new(6, 7)];
//! let parts = intervals(&window, &sup, &[], ClipPolicy::Legacy).unwrap();
//!
//! let styles: Vec<_> = parts.iter().map(|interval| interval.style).collect();
//! assert_eq!(
//!     styles,
//!     [StyleTag::Normal, StyleTag::Superscript, StyleTag::Normal, StyleTag::Superscript]
//! );
//! ```

mod balance;
mod font;
mod intervals;
mod layout;
mod markup;
mod metrics;
mod segment;
mod wrap;

pub use balance::{balance, balance_lines, balancing_order};
pub use font::{
    DocumentId, FontCache, FontHandle, FontKey, FontResolver, FontSet, FontSource,
    NamedFontResolver,
};
pub use intervals::{clip_to_window, intervals, Interval, LineWindow, ScriptRange};
pub use layout::{
    DrawOp, DrawSink, LayoutParams, LayoutState, LineLayout, RecordingSink, RunParams,
    StyleMapping,
};
pub use markup::{contains_end_marker, contains_start_marker, strip_markers, StyleTag};
pub use metrics::{Aligner, FontMetrics, HorizontalAlign, MetricAligner, MonospaceMetrics};
pub use segment::{end_marker_priority, segment, Run};
pub use wrap::{wrap_paragraph, GreedyWrapper, LineWrapper};
