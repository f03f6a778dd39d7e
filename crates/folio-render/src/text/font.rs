//! Font handles, resolution and the icon font cache.
//!
//! Fonts are opaque to the layout code: it only passes [`FontHandle`]s between
//! the metrics collaborator and the drawing sink. Acquiring the bytes behind a
//! handle is the job of a [`FontResolver`] supplied by the embedding
//! application.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use folio_core::logging::targets;
use folio_core::TextConfig;

use crate::error::{RenderError, RenderResult};

/// Identifier of the document a font is embedded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DocumentId(pub u64);

/// A resolved font.
///
/// Cloning is cheap; handles compare equal when they name the same font.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FontHandle {
    name: Arc<str>,
}

impl FontHandle {
    /// Create a handle for the font with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// The font name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FontHandle").field(&self.name).finish()
    }
}

/// Where a paragraph font comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontSource {
    /// Location of a font file supplied with the job, if any.
    pub external_uri: Option<String>,
    /// Logical id of the font.
    pub font_id: String,
}

impl FontSource {
    /// A font known by id only.
    pub fn id(font_id: impl Into<String>) -> Self {
        Self {
            external_uri: None,
            font_id: font_id.into(),
        }
    }

    /// A font loaded from an external location.
    pub fn external(uri: impl Into<String>, font_id: impl Into<String>) -> Self {
        Self {
            external_uri: Some(uri.into()),
            font_id: font_id.into(),
        }
    }
}

/// Resolves paragraph fonts.
pub trait FontResolver {
    /// Resolve the font described by `source` for a job and document.
    ///
    /// # Errors
    ///
    /// Implementations return [`RenderError::MissingFont`] when the font cannot
    /// be found or loaded.
    fn resolve(&self, source: &FontSource, job_id: &str, document: DocumentId) -> RenderResult<FontHandle>;
}

/// Key of an entry in the [`FontCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub path: String,
    pub family: String,
    pub document: Option<DocumentId>,
}

impl FontKey {
    /// Key of a font loaded for a specific document.
    pub fn new(path: impl Into<String>, family: impl Into<String>, document: DocumentId) -> Self {
        Self {
            path: path.into(),
            family: family.into(),
            document: Some(document),
        }
    }

    /// Key of the document-independent default entry.
    pub fn default_entry(family: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            family: family.into(),
            document: None,
        }
    }
}

/// Process-wide cache of loaded fonts.
///
/// A cache is created once at startup with its default entry installed, then
/// shared by reference with every writer that needs it. Lookups take a read
/// lock; loading takes the write lock and runs the loader at most once per
/// key.
#[derive(Debug)]
pub struct FontCache {
    default_key: FontKey,
    entries: RwLock<HashMap<FontKey, FontHandle>>,
}

impl FontCache {
    /// Create a cache with `default_font` installed as the default entry.
    pub fn new(default_font: FontHandle) -> Self {
        let default_key = FontKey::default_entry(default_font.name());
        let mut entries = HashMap::new();
        entries.insert(default_key.clone(), default_font);
        Self {
            default_key,
            entries: RwLock::new(entries),
        }
    }

    /// Create a cache whose default entry is the configured default font.
    pub fn from_config(config: &TextConfig) -> Self {
        Self::new(FontHandle::new(config.default_font.as_str()))
    }

    /// The default font.
    pub fn default_font(&self) -> FontHandle {
        self.entries
            .read()
            .get(&self.default_key)
            .cloned()
            .unwrap_or_else(|| FontHandle::new(self.default_key.family.as_str()))
    }

    /// Look up a font without loading it.
    pub fn get(&self, key: &FontKey) -> Option<FontHandle> {
        self.entries.read().get(key).cloned()
    }

    /// Look up a font, loading and caching it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; nothing is cached in that case.
    pub fn get_or_load<F>(&self, key: FontKey, load: F) -> RenderResult<FontHandle>
    where
        F: FnOnce(&FontKey) -> RenderResult<FontHandle>,
    {
        if let Some(font) = self.get(&key) {
            trace!(target: targets::FONT, family = %key.family, "font cache hit");
            return Ok(font);
        }

        let mut entries = self.entries.write();
        // Another caller may have loaded it between the two locks.
        if let Some(font) = entries.get(&key) {
            return Ok(font.clone());
        }

        let font = load(&key)?;
        debug!(
            target: targets::FONT,
            path = %key.path,
            family = %key.family,
            "loaded font into cache"
        );
        entries.insert(key, font.clone());
        Ok(font)
    }

    /// Number of cached fonts, the default entry included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache holds no fonts.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// A resolver that accepts every font id as-is.
///
/// Useful when fonts are looked up by name downstream, for instance by a sink
/// that embeds standard fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedFontResolver;

impl FontResolver for NamedFontResolver {
    fn resolve(&self, source: &FontSource, _job_id: &str, _document: DocumentId) -> RenderResult<FontHandle> {
        if source.font_id.is_empty() {
            return Err(RenderError::missing_font("", "font id is empty"));
        }
        Ok(FontHandle::new(source.font_id.as_str()))
    }
}

/// The three fonts used to render a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSet {
    pub primary: FontHandle,
    pub bold: FontHandle,
    pub icon: FontHandle,
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_default_entry_installed() {
        let cache = FontCache::new(FontHandle::new("Helvetica-Bold"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.default_font().name(), "Helvetica-Bold");
        assert!(cache.get(&FontKey::default_entry("Helvetica-Bold")).is_some());
    }

    #[test]
    fn test_default_entry_from_config() {
        let config = TextConfig {
            default_font: "Courier".to_string(),
            ..TextConfig::default()
        };
        let cache = FontCache::from_config(&config);
        assert_eq!(cache.default_font().name(), "Courier");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_loads_once_per_key() {
        let cache = FontCache::new(FontHandle::new("Helvetica-Bold"));
        let loads = Cell::new(0);
        let key = FontKey::new("fonts/icons.ttf", "icons", DocumentId(1));

        for _ in 0..3 {
            let font = cache
                .get_or_load(key.clone(), |key| {
                    loads.set(loads.get() + 1);
                    Ok(FontHandle::new(key.family.as_str()))
                })
                .unwrap();
            assert_eq!(font.name(), "icons");
        }
        assert_eq!(loads.get(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_documents_have_separate_entries() {
        let cache = FontCache::new(FontHandle::new("Helvetica-Bold"));
        let load = |key: &FontKey| Ok(FontHandle::new(format!("{}-{:?}", key.family, key.document)));

        let a = cache.get_or_load(FontKey::new("p", "icons", DocumentId(1)), load).unwrap();
        let b = cache.get_or_load(FontKey::new("p", "icons", DocumentId(2)), load).unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = FontCache::new(FontHandle::new("Helvetica-Bold"));
        let key = FontKey::new("missing.ttf", "icons", DocumentId(1));

        let err = cache
            .get_or_load(key.clone(), |_| Err(RenderError::missing_font("icons", "not found")))
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingFont { .. }));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_named_resolver() {
        let resolver = NamedFontResolver;
        let font = resolver
            .resolve(&FontSource::id("Times-Roman"), "job", DocumentId::default())
            .unwrap();
        assert_eq!(font.name(), "Times-Roman");
        assert!(resolver.resolve(&FontSource::id(""), "job", DocumentId::default()).is_err());
    }
}
