/// GPU resource handles and their descriptors

use std::sync::Arc;
use bytemuck::{Pod, Zeroable};

/// Backend-assigned resource identifier (unique per device)
pub type ResourceId = u64;

/// Kind of GPU-resident object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
}

/// Common behavior of every GPU handle
pub trait GpuResource: Send + Sync {
    /// Backend identifier
    fn id(&self) -> ResourceId;

    /// Approximate GPU memory held by this resource
    fn byte_size(&self) -> u64;

    /// Free the GPU memory. Called exactly once by the resource manager.
    fn release(&self);

    /// Whether `release` has already run
    fn is_released(&self) -> bool;
}

/// Vertex + index buffers
pub trait Geometry: GpuResource {
    fn label(&self) -> &str;
    fn vertex_count(&self) -> u32;
    fn index_count(&self) -> u32;
}

/// Shading parameters, optionally sampling a texture
pub trait Material: GpuResource {
    fn label(&self) -> &str;

    /// Bind a texture (or clear it).
    ///
    /// Returns `false` without binding anything when the material has
    /// already been released: late texture arrivals are inert.
    fn set_texture(&self, texture: Option<Arc<dyn Texture>>) -> bool;

    /// Identifier of the bound texture, if any
    fn texture_id(&self) -> Option<ResourceId>;
}

/// Sampled image with a mip chain
pub trait Texture: GpuResource {
    fn info(&self) -> &TextureInfo;
}

// ===== VERTEX FORMAT =====

/// Interleaved card vertex (position, normal, uv)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CardVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl CardVertex {
    pub const STRIDE: u32 = std::mem::size_of::<CardVertex>() as u32;
}

// ===== DESCRIPTORS =====

/// Descriptor for uploading geometry
#[derive(Debug, Clone)]
pub struct GeometryDesc {
    /// Debug label (e.g. "card:42:high")
    pub label: String,
    /// Interleaved `CardVertex` bytes
    pub vertex_data: Vec<u8>,
    pub vertex_count: u32,
    pub indices: Vec<u16>,
}

impl GeometryDesc {
    /// Build a descriptor from typed vertices
    pub fn from_vertices(label: impl Into<String>, vertices: &[CardVertex], indices: Vec<u16>) -> Self {
        Self {
            label: label.into(),
            vertex_data: bytemuck::cast_slice(vertices).to_vec(),
            vertex_count: vertices.len() as u32,
            indices,
        }
    }

    /// GPU bytes this geometry will occupy
    pub fn byte_size(&self) -> u64 {
        (self.vertex_data.len() + self.indices.len() * std::mem::size_of::<u16>()) as u64
    }
}

/// Descriptor for creating a material
#[derive(Clone)]
pub struct MaterialDesc {
    pub label: String,
    /// Linear RGBA
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
    pub texture: Option<Arc<dyn Texture>>,
}

impl std::fmt::Debug for MaterialDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialDesc")
            .field("label", &self.label)
            .field("base_color", &self.base_color)
            .field("emissive", &self.emissive)
            .field("metalness", &self.metalness)
            .field("roughness", &self.roughness)
            .field("double_sided", &self.double_sided)
            .field("texture", &self.texture.as_ref().map(|t| t.id()))
            .finish()
    }
}

/// Pixel format of card textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
}

impl TextureFormat {
    pub fn bytes_per_pixel(&self) -> u32 {
        4
    }
}

/// Descriptor for uploading a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Number of mip levels contained in `data` (1 = base level only)
    pub mip_levels: u32,
    /// Maximum anisotropic filtering samples (1 = disabled)
    pub anisotropy: u8,
    /// Mip levels concatenated, largest first
    pub data: Vec<u8>,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub mip_levels: u32,
    pub anisotropy: u8,
    pub byte_size: u64,
}

impl TextureInfo {
    pub fn from_desc(desc: &TextureDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            mip_levels: desc.mip_levels,
            anisotropy: desc.anisotropy,
            byte_size: desc.data.len() as u64,
        }
    }
}
