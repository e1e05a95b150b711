//! Texture module
//!
//! Card-face texture loading: quality tiers, image preparation, the load
//! cache, and the prioritised loader.

pub mod texture_quality;
pub mod texture_cache;
pub mod texture_fetcher;
pub mod texture_manager;

pub use texture_quality::{
    build_texture_desc, mip_level_count, prepare_texture, target_dimensions,
    QualityParams, TextureQuality,
};
pub use texture_cache::{InMemoryTextureCache, TextureCache, TextureKey};
pub use texture_fetcher::{MemoryTextureFetcher, TextureFetcher};
pub use texture_manager::{
    CardTexture, LoadOptions, TextureLoad, TextureManager, TextureManagerConfig, TexturePriority,
};
