/// Resource manager - arena of GPU objects created during a gallery session.
///
/// Every geometry, material, and texture handed out by the graphics device
/// passes through here. Handles are released exactly once: either when a
/// card supersedes them (`release`) or on teardown (`dispose_all`, `Drop`).

use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::graphics_device::{Geometry, Material, Texture, GpuResource, ResourceId, ResourceKind};
use crate::{gallery_debug, gallery_info, gallery_trace};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key of a tracked resource inside the arena
    pub struct TrackedKey;
}

// ===== TRACKED RESOURCE =====

/// A GPU handle registered with the resource manager
#[derive(Clone)]
pub enum TrackedResource {
    Geometry(Arc<dyn Geometry>),
    Material(Arc<dyn Material>),
    Texture(Arc<dyn Texture>),
}

impl TrackedResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            TrackedResource::Geometry(_) => ResourceKind::Geometry,
            TrackedResource::Material(_) => ResourceKind::Material,
            TrackedResource::Texture(_) => ResourceKind::Texture,
        }
    }

    fn handle(&self) -> &dyn GpuResource {
        match self {
            TrackedResource::Geometry(g) => g.as_ref(),
            TrackedResource::Material(m) => m.as_ref(),
            TrackedResource::Texture(t) => t.as_ref(),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.handle().id()
    }

    pub fn byte_size(&self) -> u64 {
        self.handle().byte_size()
    }

    /// Release unless something else already did. Returns true if released now.
    fn release(&self) -> bool {
        let handle = self.handle();
        if handle.is_released() {
            return false;
        }
        handle.release();
        true
    }
}

impl std::fmt::Debug for TrackedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}(#{})", self.kind(), self.id())
    }
}

// ===== STATISTICS =====

/// Snapshot of what the manager currently holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
    pub geometry_bytes: u64,
    pub material_bytes: u64,
    pub texture_bytes: u64,
    /// Releases performed since the manager was created
    pub total_releases: u64,
}

impl ResourceStats {
    pub fn tracked_count(&self) -> usize {
        self.geometries + self.materials + self.textures
    }

    pub fn tracked_bytes(&self) -> u64 {
        self.geometry_bytes + self.material_bytes + self.texture_bytes
    }
}

// ===== RESOURCE MANAGER =====

/// Arena of GPU resources with scoped release
pub struct ResourceManager {
    resources: SlotMap<TrackedKey, TrackedResource>,
    /// Backend id -> arena key (tracking the same handle twice is a no-op)
    by_id: FxHashMap<ResourceId, TrackedKey>,
    /// Incremented by every `dispose_all`; async work from an older
    /// generation must not publish into this manager
    generation: u64,
    total_releases: u64,
}

impl ResourceManager {
    /// Create a new empty resource manager
    pub fn new() -> Self {
        Self {
            resources: SlotMap::with_key(),
            by_id: FxHashMap::default(),
            generation: 0,
            total_releases: 0,
        }
    }

    // ===== TRACKING =====

    /// Register a geometry and hand it back
    pub fn track_geometry(&mut self, geometry: Arc<dyn Geometry>) -> Arc<dyn Geometry> {
        self.track(TrackedResource::Geometry(geometry.clone()));
        geometry
    }

    /// Register a material and hand it back
    pub fn track_material(&mut self, material: Arc<dyn Material>) -> Arc<dyn Material> {
        self.track(TrackedResource::Material(material.clone()));
        material
    }

    /// Register a texture and hand it back
    pub fn track_texture(&mut self, texture: Arc<dyn Texture>) -> Arc<dyn Texture> {
        self.track(TrackedResource::Texture(texture.clone()));
        texture
    }

    fn track(&mut self, resource: TrackedResource) {
        let id = resource.id();
        if self.by_id.contains_key(&id) {
            return;
        }
        gallery_trace!("gallery3d::ResourceManager", "Tracking {:?} ({} bytes)", resource, resource.byte_size());
        let key = self.resources.insert(resource);
        self.by_id.insert(id, key);
    }

    // ===== RELEASE =====

    /// Release one superseded resource.
    ///
    /// Returns false if the id is not tracked (already released or never
    /// registered).
    pub fn release(&mut self, id: ResourceId) -> bool {
        let Some(key) = self.by_id.remove(&id) else {
            return false;
        };
        match self.resources.remove(key) {
            Some(resource) => {
                if resource.release() {
                    self.total_releases += 1;
                }
                true
            }
            None => false,
        }
    }

    /// Release every tracked resource and clear the registry.
    ///
    /// Idempotent: a second call finds nothing to release. Handles already
    /// released elsewhere are skipped. Returns the number of releases
    /// performed.
    pub fn dispose_all(&mut self) -> usize {
        let mut released = 0;
        for (_, resource) in self.resources.drain() {
            if resource.release() {
                released += 1;
            }
        }
        self.by_id.clear();
        self.total_releases += released as u64;
        self.generation += 1;

        if released > 0 {
            gallery_info!("gallery3d::ResourceManager", "Disposed {} GPU resources", released);
        } else {
            gallery_debug!("gallery3d::ResourceManager", "dispose_all: nothing to release");
        }
        released
    }

    // ===== QUERIES =====

    /// Current disposal generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_tracked(&self, id: ResourceId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn tracked_count(&self) -> usize {
        self.resources.len()
    }

    pub fn tracked_bytes(&self) -> u64 {
        self.resources.values().map(|r| r.byte_size()).sum()
    }

    pub fn stats(&self) -> ResourceStats {
        let mut stats = ResourceStats {
            total_releases: self.total_releases,
            ..ResourceStats::default()
        };
        for resource in self.resources.values() {
            let bytes = resource.byte_size();
            match resource.kind() {
                ResourceKind::Geometry => {
                    stats.geometries += 1;
                    stats.geometry_bytes += bytes;
                }
                ResourceKind::Material => {
                    stats.materials += 1;
                    stats.material_bytes += bytes;
                }
                ResourceKind::Texture => {
                    stats.textures += 1;
                    stats.texture_bytes += bytes;
                }
            }
        }
        stats
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        if !self.resources.is_empty() {
            self.dispose_all();
        }
    }
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
