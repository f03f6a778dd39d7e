//! Logging facilities for Folio.
//!
//! Folio uses the `tracing` crate for instrumentation. Library code never
//! installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("folio_render::layout=trace")
//!         .init();
//! }
//! ```
//!
//! The constants below name the targets and spans emitted by each subsystem so
//! filters do not have to hard-code module paths.

/// Span names used throughout Folio for tracing.
pub mod span_names {
    /// One paragraph write, from font resolution to the final baseline.
    pub const WRITE_PARAGRAPH: &str = "folio::write_paragraph";
    /// The per-line layout loop.
    pub const LAYOUT_LINES: &str = "folio::layout_lines";
}

/// Target names for log filtering.
pub mod targets {
    /// Configuration loading.
    pub const CONFIG: &str = "folio_core::config";
    /// Paragraph writer and placeholder dispatch.
    pub const WRITER: &str = "folio_render::writer";
    /// Line layout, run and interval dispatch.
    pub const LAYOUT: &str = "folio_render::layout";
    /// Font resolution and the icon font cache.
    pub const FONT: &str = "folio_render::font";
    /// Page bookkeeping records.
    pub const PAGES: &str = "folio_render::pages";
}
