/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every created resource is kept so tests can inspect release counts,
/// texture bindings, and presented frames.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use super::graphics_device::{GraphicsDevice, DeviceCapabilities};
use super::resources::{
    GpuResource, Geometry, Material, Texture, ResourceId,
    GeometryDesc, MaterialDesc, TextureDesc, TextureInfo,
};
use super::frame::SceneFrame;

// ============================================================================
// Mock resources
// ============================================================================

/// Shared bookkeeping of every mock resource
#[derive(Debug)]
pub struct MockResourceCore {
    pub id: ResourceId,
    pub byte_size: u64,
    release_count: AtomicU32,
}

impl MockResourceCore {
    fn new(id: ResourceId, byte_size: u64) -> Self {
        Self { id, byte_size, release_count: AtomicU32::new(0) }
    }

    /// How many times `release` ran (must end up exactly 1)
    pub fn release_count(&self) -> u32 {
        self.release_count.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockGeometry {
    pub core: MockResourceCore,
    pub label: String,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GpuResource for MockGeometry {
    fn id(&self) -> ResourceId { self.core.id }
    fn byte_size(&self) -> u64 { self.core.byte_size }
    fn release(&self) { self.core.release_count.fetch_add(1, Ordering::SeqCst); }
    fn is_released(&self) -> bool { self.core.release_count() > 0 }
}

impl Geometry for MockGeometry {
    fn label(&self) -> &str { &self.label }
    fn vertex_count(&self) -> u32 { self.vertex_count }
    fn index_count(&self) -> u32 { self.index_count }
}

pub struct MockMaterial {
    pub core: MockResourceCore,
    pub label: String,
    pub base_color: [f32; 4],
    texture: Mutex<Option<Arc<dyn Texture>>>,
}

impl GpuResource for MockMaterial {
    fn id(&self) -> ResourceId { self.core.id }
    fn byte_size(&self) -> u64 { self.core.byte_size }
    fn release(&self) {
        self.core.release_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut texture) = self.texture.lock() {
            *texture = None;
        }
    }
    fn is_released(&self) -> bool { self.core.release_count() > 0 }
}

impl Material for MockMaterial {
    fn label(&self) -> &str { &self.label }

    fn set_texture(&self, texture: Option<Arc<dyn Texture>>) -> bool {
        if self.is_released() {
            return false;
        }
        match self.texture.lock() {
            Ok(mut slot) => {
                *slot = texture;
                true
            }
            Err(_) => false,
        }
    }

    fn texture_id(&self) -> Option<ResourceId> {
        self.texture.lock().ok().and_then(|slot| slot.as_ref().map(|t| t.id()))
    }
}

#[derive(Debug)]
pub struct MockTexture {
    pub core: MockResourceCore,
    pub label: String,
    pub info: TextureInfo,
}

impl GpuResource for MockTexture {
    fn id(&self) -> ResourceId { self.core.id }
    fn byte_size(&self) -> u64 { self.core.byte_size }
    fn release(&self) { self.core.release_count.fetch_add(1, Ordering::SeqCst); }
    fn is_released(&self) -> bool { self.core.release_count() > 0 }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo { &self.info }
}

// ============================================================================
// Mock device
// ============================================================================

pub struct MockGraphicsDevice {
    pub capabilities: DeviceCapabilities,
    pub geometries: Vec<Arc<MockGeometry>>,
    pub materials: Vec<Arc<MockMaterial>>,
    pub textures: Vec<Arc<MockTexture>>,
    pub presented_frames: Vec<SceneFrame>,
    /// Resource creation fails for any label containing one of these
    pub fail_labels: Vec<String>,
    /// Next `present` call fails (then resets)
    pub fail_next_present: bool,
    next_id: ResourceId,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCapabilities::desktop())
    }

    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            geometries: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            presented_frames: Vec::new(),
            fail_labels: Vec::new(),
            fail_next_present: false,
            next_id: 1,
        }
    }

    /// Total number of resources ever created
    pub fn created_count(&self) -> usize {
        self.geometries.len() + self.materials.len() + self.textures.len()
    }

    /// Release counts of every resource ever created
    pub fn release_counts(&self) -> Vec<u32> {
        self.geometries.iter().map(|g| g.core.release_count())
            .chain(self.materials.iter().map(|m| m.core.release_count()))
            .chain(self.textures.iter().map(|t| t.core.release_count()))
            .collect()
    }

    /// Number of resources not yet released
    pub fn live_count(&self) -> usize {
        self.release_counts().iter().filter(|&&c| c == 0).count()
    }

    pub fn last_frame(&self) -> Option<&SceneFrame> {
        self.presented_frames.last()
    }

    fn allocate_id(&mut self) -> ResourceId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_label(&self, label: &str) -> Result<()> {
        if self.fail_labels.iter().any(|f| label.contains(f.as_str())) {
            return Err(Error::BackendError(format!("Mock failure creating '{}'", label)));
        }
        Ok(())
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn create_geometry(&mut self, desc: GeometryDesc) -> Result<Arc<dyn Geometry>> {
        self.check_label(&desc.label)?;
        let geometry = Arc::new(MockGeometry {
            core: MockResourceCore::new(self.allocate_id(), desc.byte_size()),
            vertex_count: desc.vertex_count,
            index_count: desc.indices.len() as u32,
            label: desc.label,
        });
        self.geometries.push(geometry.clone());
        Ok(geometry)
    }

    fn create_material(&mut self, desc: MaterialDesc) -> Result<Arc<dyn Material>> {
        self.check_label(&desc.label)?;
        let material = Arc::new(MockMaterial {
            core: MockResourceCore::new(self.allocate_id(), 256),
            base_color: desc.base_color,
            texture: Mutex::new(desc.texture),
            label: desc.label,
        });
        self.materials.push(material.clone());
        Ok(material)
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        self.check_label(&desc.label)?;
        let info = TextureInfo::from_desc(&desc);
        let texture = Arc::new(MockTexture {
            core: MockResourceCore::new(self.allocate_id(), info.byte_size),
            info,
            label: desc.label,
        });
        self.textures.push(texture.clone());
        Ok(texture)
    }

    fn present(&mut self, frame: &SceneFrame) -> Result<()> {
        if self.fail_next_present {
            self.fail_next_present = false;
            return Err(Error::RenderFailed("Mock present failure".to_string()));
        }
        self.presented_frames.push(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
