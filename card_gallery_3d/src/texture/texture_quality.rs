/// Texture quality tiers and CPU-side image preparation.
///
/// A tier bounds the uploaded texel dimensions, decides whether a mip chain
/// is generated, and sets the anisotropic filtering level.

use image::imageops::FilterType;
use image::DynamicImage;
use crate::error::{Error, Result};
use crate::graphics_device::{TextureDesc, TextureFormat};
use crate::lod::LodLevel;

/// Resolution tier of a card-face texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureQuality {
    High,
    Medium,
    Low,
}

/// Concrete parameters of a quality tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityParams {
    /// Scale applied to the source dimensions
    pub scale: f32,
    /// Upper bound of the largest uploaded dimension
    pub max_dimension: u32,
    pub generate_mipmaps: bool,
    pub anisotropy: u8,
}

impl TextureQuality {
    /// Tier used by a card at the given LOD
    pub fn for_lod(lod: LodLevel) -> Self {
        match lod {
            LodLevel::High => TextureQuality::High,
            LodLevel::Medium => TextureQuality::Medium,
            LodLevel::Low => TextureQuality::Low,
        }
    }

    pub fn params(&self) -> QualityParams {
        match self {
            TextureQuality::High => QualityParams {
                scale: 1.0,
                max_dimension: 1024,
                generate_mipmaps: true,
                anisotropy: 16,
            },
            TextureQuality::Medium => QualityParams {
                scale: 0.5,
                max_dimension: 512,
                generate_mipmaps: true,
                anisotropy: 4,
            },
            TextureQuality::Low => QualityParams {
                scale: 0.25,
                max_dimension: 256,
                generate_mipmaps: false,
                anisotropy: 1,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextureQuality::High => "high",
            TextureQuality::Medium => "medium",
            TextureQuality::Low => "low",
        }
    }
}

/// Target dimensions for a source image at a tier.
///
/// Scales first, then clamps the largest side to `max_dimension` (and the
/// device limit) keeping the aspect ratio. Never returns a zero dimension.
///
/// Each side floors at 1 texel, so lower tiers are strictly smaller only
/// for sources whose smaller side is at least 3 px. Below that Medium and
/// Low both collapse to 1x1 and cost the same.
pub fn target_dimensions(width: u32, height: u32, quality: TextureQuality, device_max: u32) -> (u32, u32) {
    let params = quality.params();
    let limit = if device_max > 0 { params.max_dimension.min(device_max) } else { params.max_dimension };

    let mut w = (width as f32 * params.scale).round().max(1.0);
    let mut h = (height as f32 * params.scale).round().max(1.0);
    let limit = limit as f32;
    if w >= h && w > limit {
        h = (h * limit / w).floor().max(1.0);
        w = limit;
    } else if h > w && h > limit {
        w = (w * limit / h).floor().max(1.0);
        h = limit;
    }
    (w as u32, h as u32)
}

/// Number of levels in a full mip chain down to 1x1
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Decode encoded image bytes and build the upload descriptor for a tier
pub fn prepare_texture(
    url: &str,
    bytes: &[u8],
    quality: TextureQuality,
    device_max: u32,
) -> Result<TextureDesc> {
    let source = image::load_from_memory(bytes).map_err(|e| Error::TextureDecodeFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(build_texture_desc(url, &source, quality, device_max))
}

/// Resize a decoded image to a tier and append its mip chain
pub fn build_texture_desc(
    url: &str,
    source: &DynamicImage,
    quality: TextureQuality,
    device_max: u32,
) -> TextureDesc {
    let params = quality.params();
    let (width, height) = target_dimensions(source.width(), source.height(), quality, device_max);

    let base = if (width, height) == (source.width(), source.height()) {
        source.clone()
    } else {
        source.resize_exact(width, height, FilterType::Triangle)
    };

    let mip_levels = if params.generate_mipmaps { mip_level_count(width, height) } else { 1 };
    let mut data = base.to_rgba8().into_raw();

    let mut level = base;
    for _ in 1..mip_levels {
        let w = (level.width() / 2).max(1);
        let h = (level.height() / 2).max(1);
        level = level.resize_exact(w, h, FilterType::Triangle);
        data.extend_from_slice(level.to_rgba8().as_raw());
    }

    TextureDesc {
        label: format!("texture:{}:{}", quality.as_str(), url),
        width,
        height,
        format: TextureFormat::R8G8B8A8_SRGB,
        mip_levels,
        anisotropy: params.anisotropy,
        data,
    }
}

#[cfg(test)]
#[path = "texture_quality_tests.rs"]
mod tests;
