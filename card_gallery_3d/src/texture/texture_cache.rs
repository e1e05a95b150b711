/// Texture load cache keyed by URL and quality tier.

use rustc_hash::FxHashMap;
use super::texture_manager::TextureLoad;
use super::texture_quality::TextureQuality;

/// Cache key: one load per (url, quality)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub url: String,
    pub quality: TextureQuality,
}

impl TextureKey {
    pub fn new(url: impl Into<String>, quality: TextureQuality) -> Self {
        Self { url: url.into(), quality }
    }
}

/// Storage for in-flight and completed loads.
///
/// Injectable so hosts can share a cache across gallery instances or bound
/// its size.
pub trait TextureCache {
    fn get(&self, key: &TextureKey) -> Option<TextureLoad>;
    fn insert(&mut self, key: TextureKey, load: TextureLoad);
    fn remove(&mut self, key: &TextureKey) -> Option<TextureLoad>;
    fn clear(&mut self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory cache
#[derive(Default)]
pub struct InMemoryTextureCache {
    entries: FxHashMap<TextureKey, TextureLoad>,
}

impl InMemoryTextureCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextureCache for InMemoryTextureCache {
    fn get(&self, key: &TextureKey) -> Option<TextureLoad> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: TextureKey, load: TextureLoad) {
        self.entries.insert(key, load);
    }

    fn remove(&mut self, key: &TextureKey) -> Option<TextureLoad> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
