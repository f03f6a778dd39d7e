//! Core systems for Folio.
//!
//! This crate provides the foundational pieces shared by the Folio paragraph
//! writer:
//!
//! - **Configuration**: [`TextConfig`], loaded from TOML, controls the script
//!   size divisors, the icon font and accent color, and how script ranges are
//!   clipped to wrapped lines
//! - **Logging**: target and span names used with the `tracing` crate
//!
//! # Configuration Example
//!
//! ```
//! use folio_core::{ClipPolicy, TextConfig};
//!
//! let config = TextConfig::from_toml_str(r#"
//! subscript_divisor = 2.5
//! clip_policy = "clip-to-window"
//! "#).unwrap();
//!
//! assert_eq!(config.subscript_divisor, 2.5);
//! assert_eq!(config.superscript_divisor, 2.2);
//! assert_eq!(config.clip_policy, ClipPolicy::ClipToWindow);
//! ```

pub mod config;
mod error;
pub mod logging;

pub use config::{ClipPolicy, IconFontConfig, TextConfig};
pub use error::{ConfigError, Result};
