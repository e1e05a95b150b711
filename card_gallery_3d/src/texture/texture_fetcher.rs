/// Source of encoded card images.
///
/// The gallery treats image URLs as opaque; the host decides how they are
/// resolved (HTTP, CDN cache, bundled assets).

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};

/// Resolves an image URL to encoded bytes (PNG, JPEG, ...)
pub trait TextureFetcher {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Vec<u8>>>;
}

/// Fetcher serving pre-registered images from memory
#[derive(Default)]
pub struct MemoryTextureFetcher {
    images: FxHashMap<String, Vec<u8>>,
}

impl MemoryTextureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(url.into(), bytes);
    }
}

impl TextureFetcher for MemoryTextureFetcher {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Vec<u8>>> {
        let result = self.images.get(url).cloned().ok_or_else(|| Error::TextureLoadFailed {
            url: url.to_string(),
            reason: "not found".to_string(),
        });
        future::ready(result).boxed_local()
    }
}
