/// Gallery card - one card render unit.
///
/// Owns the card's GPU geometry and material (through the resource
/// manager), follows LOD changes, applies the card-face texture when it
/// arrives, and animates selection.

use std::sync::{Arc, Mutex};
use glam::{EulerRot, Mat4, Quat, Vec3};
use crate::card::{CardEntity, CardId};
use crate::error::{Error, Result};
use crate::graphics_device::{
    CardDrawItem, Geometry, GeometryDesc, GraphicsDevice, GpuResource, Material, MaterialDesc,
    ResourceId, RingDrawItem,
};
use crate::layout::{CardPosition, CARD_HEIGHT, CARD_WIDTH};
use crate::lod::{LodAssignment, LodLevel};
use crate::resource::ResourceManager;
use crate::texture::{LoadOptions, TextureKey, TextureLoad, TextureManager, TextureQuality};
use crate::{gallery_debug, gallery_err, gallery_trace};
use super::card_mesh::{build_card_mesh, build_ring_mesh, card_segments, ring_segments};
use super::spring::Spring;

pub const SELECTED_SCALE: f32 = 1.15;
pub const SELECTED_LIFT: f32 = 0.5;
const RING_COLOR: [f32; 4] = [1.0, 0.84, 0.35, 1.0];

/// Shared services a card needs while syncing
pub struct CardRenderContext<'a> {
    pub device: &'a Arc<Mutex<dyn GraphicsDevice>>,
    pub resources: &'a Arc<Mutex<ResourceManager>>,
    pub textures: &'a mut TextureManager,
    /// Skip easing (platform reduced-motion or accessibility mode)
    pub reduced_motion: bool,
}

/// Where the card-face texture stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    /// Card has no image
    Untextured,
    /// Load requested, nothing bound yet
    Pending,
    /// Texture bound to the material
    Applied(ResourceId),
    /// Load failed; card renders untextured
    Failed,
}

/// GPU objects of one LOD-dependent mesh
struct MeshSlot {
    lod: LodLevel,
    geometry: Arc<dyn Geometry>,
}

pub struct GalleryCard {
    card: CardEntity,
    position: Vec3,
    rotation: Vec3,
    body: Option<MeshSlot>,
    material: Option<Arc<dyn Material>>,
    ring: Option<MeshSlot>,
    ring_material: Option<Arc<dyn Material>>,
    texture_state: TextureState,
    requested_quality: Option<TextureQuality>,
    pending_texture: Option<TextureLoad>,
    /// Texture request currently bound to the material
    applied_texture: Option<TextureKey>,
    scale: Spring,
    lift: Spring,
}

impl GalleryCard {
    pub fn new(placement: &CardPosition) -> Self {
        let texture_state = if placement.card.image_url.is_some() {
            TextureState::Pending
        } else {
            TextureState::Untextured
        };
        Self {
            card: placement.card.clone(),
            position: placement.position,
            rotation: placement.rotation,
            body: None,
            material: None,
            ring: None,
            ring_material: None,
            texture_state,
            requested_quality: None,
            pending_texture: None,
            applied_texture: None,
            scale: Spring::new(1.0),
            lift: Spring::new(0.0),
        }
    }

    pub fn id(&self) -> &CardId {
        &self.card.id
    }

    pub fn card(&self) -> &CardEntity {
        &self.card
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move to a new layout slot (layout mode or filter changed)
    pub fn set_placement(&mut self, placement: &CardPosition) {
        self.position = placement.position;
        self.rotation = placement.rotation;
    }

    pub fn texture_state(&self) -> TextureState {
        self.texture_state
    }

    /// LOD of the current body geometry, if any was built
    pub fn current_lod(&self) -> Option<LodLevel> {
        self.body.as_ref().map(|slot| slot.lod)
    }

    /// Radius of a sphere enclosing the (possibly scaled) card
    pub fn bounding_radius(&self) -> f32 {
        0.5 * (CARD_WIDTH * CARD_WIDTH + CARD_HEIGHT * CARD_HEIGHT).sqrt() * self.scale.value.max(1.0)
    }

    /// Center of the bounding sphere, including the selection lift
    pub fn bounding_center(&self) -> Vec3 {
        self.position + Vec3::Y * self.lift.value
    }

    /// Bring GPU state in line with the LOD assignment and selection, and
    /// produce this frame's draw item.
    ///
    /// Returns `Ok(None)` without allocating anything when the card is
    /// culled. Errors are per card; the caller decides what to do with them.
    pub fn sync(
        &mut self,
        ctx: &mut CardRenderContext<'_>,
        assignment: &LodAssignment,
        selected: bool,
        dt: f32,
    ) -> Result<Option<CardDrawItem>> {
        self.animate(selected, dt, ctx.reduced_motion);

        if !assignment.should_render {
            return Ok(None);
        }
        let lod = assignment.lod_level;

        self.ensure_body(ctx, lod)?;
        let material = self.ensure_material(ctx)?;
        self.update_texture(ctx, lod, &material);

        let ring = if selected {
            Some(self.ensure_ring(ctx, lod)?)
        } else {
            None
        };

        let geometry = match &self.body {
            Some(slot) => slot.geometry.id(),
            None => return Err(Error::InvalidResource(format!("Card '{}' has no geometry", self.card.id))),
        };

        Ok(Some(CardDrawItem {
            card_id: self.card.id.clone(),
            geometry,
            material: material.id(),
            texture: material.texture_id(),
            transform: self.transform(),
            lod,
            selected,
            ring,
        }))
    }

    /// Release this card's geometry and materials (card removed from the set).
    ///
    /// Texture requests are given up separately with `release_textures`,
    /// outside the resource manager lock.
    pub fn release(&mut self, resources: &mut ResourceManager) {
        let ids: Vec<ResourceId> = [
            self.body.take().map(|s| s.geometry.id()),
            self.material.take().map(|m| m.id()),
            self.ring.take().map(|s| s.geometry.id()),
            self.ring_material.take().map(|m| m.id()),
        ]
        .into_iter()
        .flatten()
        .collect();
        for id in ids {
            resources.release(id);
        }
    }

    /// Give up this card's texture requests.
    ///
    /// Textures are shared through the texture cache; one still requested
    /// by another card stays alive.
    pub fn release_textures(&mut self, textures: &mut TextureManager) {
        if let Some(load) = self.pending_texture.take() {
            textures.release_texture(load.key());
        }
        if let Some(key) = self.applied_texture.take() {
            textures.release_texture(&key);
        }
        self.requested_quality = None;
    }

    // ===== INTERNAL =====

    fn animate(&mut self, selected: bool, dt: f32, reduced_motion: bool) {
        self.scale.set_target(if selected { SELECTED_SCALE } else { 1.0 });
        self.lift.set_target(if selected { SELECTED_LIFT } else { 0.0 });
        if reduced_motion {
            self.scale.snap();
            self.lift.snap();
        } else {
            self.scale.step(dt);
            self.lift.step(dt);
        }
    }

    fn transform(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z);
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale.value),
            rotation,
            self.position + Vec3::Y * self.lift.value,
        )
    }

    /// Build body geometry for `lod`, releasing the superseded one
    fn ensure_body(&mut self, ctx: &mut CardRenderContext<'_>, lod: LodLevel) -> Result<()> {
        if self.body.as_ref().map(|s| s.lod) == Some(lod) {
            return Ok(());
        }
        let label = format!("card:{}:{}", self.card.id, lod.as_str());
        let geometry = create_geometry(ctx, build_card_mesh(label, card_segments(lod)))?;
        if let Some(old) = self.body.replace(MeshSlot { lod, geometry }) {
            release(ctx, old.geometry.id())?;
            gallery_trace!("gallery3d::GalleryCard", "Card '{}' switched to {} LOD", self.card.id, lod.as_str());
        }
        Ok(())
    }

    fn ensure_ring(&mut self, ctx: &mut CardRenderContext<'_>, lod: LodLevel) -> Result<RingDrawItem> {
        if self.ring.as_ref().map(|s| s.lod) != Some(lod) {
            let label = format!("ring:{}:{}", self.card.id, lod.as_str());
            let geometry = create_geometry(ctx, build_ring_mesh(label, ring_segments(lod)))?;
            if let Some(old) = self.ring.replace(MeshSlot { lod, geometry }) {
                release(ctx, old.geometry.id())?;
            }
        }
        let material = match &self.ring_material {
            Some(material) => material.clone(),
            None => {
                let material = create_material(ctx, MaterialDesc {
                    label: format!("ring:{}", self.card.id),
                    base_color: RING_COLOR,
                    emissive: [RING_COLOR[0] * 0.6, RING_COLOR[1] * 0.6, RING_COLOR[2] * 0.6],
                    metalness: 0.8,
                    roughness: 0.2,
                    double_sided: false,
                    texture: None,
                })?;
                self.ring_material = Some(material.clone());
                material
            }
        };
        let geometry = match &self.ring {
            Some(slot) => slot.geometry.id(),
            None => return Err(Error::InvalidResource(format!("Card '{}' has no ring geometry", self.card.id))),
        };

        let base = self.position + Vec3::Y * (self.lift.value - CARD_HEIGHT * 0.5 - 0.3);
        Ok(RingDrawItem {
            geometry,
            material: material.id(),
            transform: Mat4::from_translation(base),
        })
    }

    fn ensure_material(&mut self, ctx: &mut CardRenderContext<'_>) -> Result<Arc<dyn Material>> {
        if let Some(material) = &self.material {
            return Ok(material.clone());
        }
        let tint = self.card.rarity.tint();
        let material = create_material(ctx, MaterialDesc {
            label: format!("card:{}", self.card.id),
            base_color: tint,
            emissive: [tint[0] * 0.05, tint[1] * 0.05, tint[2] * 0.05],
            metalness: 0.1,
            roughness: 0.55,
            double_sided: true,
            texture: None,
        })?;
        self.material = Some(material.clone());
        Ok(material)
    }

    /// Request the texture for the current LOD and bind it once it arrives
    fn update_texture(&mut self, ctx: &mut CardRenderContext<'_>, lod: LodLevel, material: &Arc<dyn Material>) {
        let Some(url) = self.card.image_url.clone() else {
            return;
        };

        let quality = TextureQuality::for_lod(lod);
        if self.requested_quality != Some(quality) {
            let load = ctx.textures.load_texture(&url, quality, LoadOptions::for_lod(lod));
            if let Some(superseded) = self.pending_texture.replace(load) {
                ctx.textures.release_texture(superseded.key());
            }
            self.requested_quality = Some(quality);
        }

        let Some(result) = self.pending_texture.as_ref().and_then(|load| load.try_result()) else {
            return;
        };
        let Some(key) = self.pending_texture.take().map(|load| load.key().clone()) else {
            return;
        };

        match result {
            Ok(texture) => {
                // A disposed material refuses the binding: late arrival is inert
                if material.set_texture(Some(texture.texture.clone())) {
                    self.texture_state = TextureState::Applied(texture.id());
                    // The previous tier is unbound now
                    if let Some(previous) = self.applied_texture.replace(key) {
                        ctx.textures.release_texture(&previous);
                    }
                } else {
                    ctx.textures.release_texture(&key);
                }
            }
            Err(Error::LoadCancelled(_)) => {
                // Manager was cleared; its earlier requests are gone too. Ask again next frame.
                self.applied_texture = None;
                self.requested_quality = None;
            }
            Err(err) => {
                gallery_debug!("gallery3d::GalleryCard", "Card '{}' renders untextured: {}", self.card.id, err);
                ctx.textures.release_texture(&key);
                if !matches!(self.texture_state, TextureState::Applied(_)) {
                    self.texture_state = TextureState::Failed;
                }
            }
        }
    }
}

fn create_geometry(ctx: &CardRenderContext<'_>, desc: GeometryDesc) -> Result<Arc<dyn Geometry>> {
    let geometry = ctx.device
        .lock()
        .map_err(|_| gallery_err!("gallery3d::GalleryCard", "Graphics device lock poisoned"))?
        .create_geometry(desc)?;
    Ok(ctx.resources
        .lock()
        .map_err(|_| gallery_err!("gallery3d::GalleryCard", "Resource manager lock poisoned"))?
        .track_geometry(geometry))
}

fn create_material(ctx: &CardRenderContext<'_>, desc: MaterialDesc) -> Result<Arc<dyn Material>> {
    let material = ctx.device
        .lock()
        .map_err(|_| gallery_err!("gallery3d::GalleryCard", "Graphics device lock poisoned"))?
        .create_material(desc)?;
    Ok(ctx.resources
        .lock()
        .map_err(|_| gallery_err!("gallery3d::GalleryCard", "Resource manager lock poisoned"))?
        .track_material(material))
}

fn release(ctx: &CardRenderContext<'_>, id: ResourceId) -> Result<()> {
    ctx.resources
        .lock()
        .map_err(|_| gallery_err!("gallery3d::GalleryCard", "Resource manager lock poisoned"))?
        .release(id);
    Ok(())
}

#[cfg(test)]
#[path = "gallery_card_tests.rs"]
mod tests;
