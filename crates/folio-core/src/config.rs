//! Text rendering configuration.
//!
//! [`TextConfig`] holds the tunables of the paragraph writer. Every field has a
//! default, so a TOML file only needs to name the values it overrides:
//!
//! ```toml
//! subscript_divisor = 2.4
//! superscript_divisor = 2.2
//! icon_size_delta = 2.0
//! icon_color = "#E6633A"
//! clip_policy = "legacy"
//! default_font = "Helvetica-Bold"
//!
//! [icon_font]
//! path = "fonts/icons.ttf"
//! family = "icons"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::logging::targets;

/// How script ranges that run past the end of a wrapped line are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipPolicy {
    /// Ranges that start inside a line but end after it are dropped for that
    /// line.
    #[default]
    Legacy,
    /// Ranges that end after a line are clipped to the line's end.
    ClipToWindow,
}

/// Location of the icon font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconFontConfig {
    /// Path of the font file.
    pub path: String,
    /// Family name registered for the font.
    pub family: String,
}

impl Default for IconFontConfig {
    fn default() -> Self {
        Self {
            path: "fonts/icons.ttf".to_string(),
            family: "icons".to_string(),
        }
    }
}

/// Configuration for the paragraph writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Subscript runs are drawn at `font_size / subscript_divisor`.
    pub subscript_divisor: f32,
    /// Superscript runs are drawn at `font_size / superscript_divisor`.
    pub superscript_divisor: f32,
    /// Icon runs are drawn at `font_size + icon_size_delta`.
    pub icon_size_delta: f32,
    /// Accent color of icon runs, as `#RRGGBB` or `#RRGGBBAA`.
    pub icon_color: String,
    /// Icon font location.
    pub icon_font: IconFontConfig,
    /// Clipping of script ranges against line windows.
    pub clip_policy: ClipPolicy,
    /// Font id installed as the default entry of the font cache.
    pub default_font: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            subscript_divisor: 2.4,
            superscript_divisor: 2.2,
            icon_size_delta: 2.0,
            icon_color: "#E6633A".to_string(),
            icon_font: IconFontConfig::default(),
            clip_policy: ClipPolicy::Legacy,
            default_font: "Helvetica-Bold".to_string(),
        }
    }
}

impl TextConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|source| ConfigError::Parse { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: Self = toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;

        debug!(
            target: targets::CONFIG,
            path = %path.display(),
            clip_policy = ?config.clip_policy,
            "loaded text configuration"
        );
        Ok(config)
    }

    /// Set the clip policy.
    pub fn clip_policy(mut self, policy: ClipPolicy) -> Self {
        self.clip_policy = policy;
        self
    }

    /// Set the icon font location.
    pub fn icon_font(mut self, path: impl Into<String>, family: impl Into<String>) -> Self {
        self.icon_font = IconFontConfig {
            path: path.into(),
            family: family.into(),
        };
        self
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        positive("subscript_divisor", self.subscript_divisor)?;
        positive("superscript_divisor", self.superscript_divisor)?;
        if !self.icon_size_delta.is_finite() {
            return Err(ConfigError::invalid_value(
                "icon_size_delta",
                "must be a finite number",
            ));
        }
        if parse_hex_color(&self.icon_color).is_none() {
            return Err(ConfigError::invalid_value(
                "icon_color",
                format!("'{}' is not a #RRGGBB or #RRGGBBAA color", self.icon_color),
            ));
        }
        if self.icon_font.path.is_empty() {
            return Err(ConfigError::invalid_value("icon_font.path", "must not be empty"));
        }
        Ok(())
    }

    /// The icon color as 8-bit RGBA components.
    ///
    /// Falls back to the default accent if the configured value is malformed;
    /// [`validate`](Self::validate) reports that case.
    pub fn icon_rgba8(&self) -> [u8; 4] {
        parse_hex_color(&self.icon_color).unwrap_or([230, 99, 58, 255])
    }
}

fn positive(key: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(key, format!("must be positive, got {value}")))
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA`.
fn parse_hex_color(hex: &str) -> Option<[u8; 4]> {
    let hex = hex.strip_prefix('#')?;
    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}
