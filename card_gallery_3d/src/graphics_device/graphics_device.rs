/// GraphicsDevice trait - factory for GPU resources and frame presentation

use std::sync::Arc;
use bitflags::bitflags;
use crate::error::Result;
use super::resources::{
    Geometry, Material, Texture,
    GeometryDesc, MaterialDesc, TextureDesc,
};
use super::frame::SceneFrame;

bitflags! {
    /// Features reported by the runtime hosting the gallery
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceFeatures: u32 {
        /// Hardware-accelerated 3D rendering is available
        const GRAPHICS_3D    = 1 << 0;
        /// Phone/tablet class device (tighter CPU and memory budgets)
        const MOBILE         = 1 << 1;
        /// Primary input is touch
        const TOUCH          = 1 << 2;
        /// User asked the platform to reduce motion
        const REDUCED_MOTION = 1 << 3;
    }
}

/// Capabilities of the device the gallery runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub features: DeviceFeatures,
    /// Largest texture dimension the backend accepts
    pub max_texture_size: u32,
    /// Viewport size in physical pixels
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl DeviceCapabilities {
    /// Desktop browser with 3D support
    pub fn desktop() -> Self {
        Self {
            features: DeviceFeatures::GRAPHICS_3D,
            max_texture_size: 4096,
            viewport_width: 1920,
            viewport_height: 1080,
        }
    }

    /// Phone with 3D support
    pub fn mobile() -> Self {
        Self {
            features: DeviceFeatures::GRAPHICS_3D | DeviceFeatures::MOBILE | DeviceFeatures::TOUCH,
            max_texture_size: 2048,
            viewport_width: 390,
            viewport_height: 844,
        }
    }

    /// Runtime without any 3D support
    pub fn without_3d() -> Self {
        Self {
            features: DeviceFeatures::empty(),
            max_texture_size: 0,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }

    pub fn supports_3d(&self) -> bool {
        self.features.contains(DeviceFeatures::GRAPHICS_3D)
    }

    pub fn is_mobile(&self) -> bool {
        self.features.contains(DeviceFeatures::MOBILE)
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.features.contains(DeviceFeatures::REDUCED_MOTION)
    }

    /// Viewport width / height (1.0 for a degenerate viewport)
    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport_height == 0 {
            1.0
        } else {
            self.viewport_width as f32 / self.viewport_height as f32
        }
    }
}

/// Graphics backend trait
///
/// Central factory interface for GPU resources. Implemented by the hosting
/// application's backend (WebGL/WebGPU bridge, native renderer, mock).
///
/// Every created handle must be released exactly once through
/// `GpuResource::release`; the gallery routes all releases through its
/// resource manager.
pub trait GraphicsDevice: Send + Sync {
    /// Capabilities of the runtime
    fn capabilities(&self) -> DeviceCapabilities;

    /// Upload a vertex/index buffer pair
    fn create_geometry(&mut self, desc: GeometryDesc) -> Result<Arc<dyn Geometry>>;

    /// Create a material (shading parameters + optional texture)
    fn create_material(&mut self, desc: MaterialDesc) -> Result<Arc<dyn Material>>;

    /// Upload a texture with its full mip chain
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Draw and present one composed frame
    fn present(&mut self, frame: &SceneFrame) -> Result<()>;
}
