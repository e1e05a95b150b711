/// Composed frame handed to the backend for drawing

use glam::{Mat4, Vec3};
use crate::card::CardId;
use crate::canvas::EnvironmentSettings;
use crate::lod::LodLevel;
use super::resources::ResourceId;

/// Selection ring drawn under a selected card
#[derive(Debug, Clone, PartialEq)]
pub struct RingDrawItem {
    pub geometry: ResourceId,
    pub material: ResourceId,
    pub transform: Mat4,
}

/// One card to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct CardDrawItem {
    pub card_id: CardId,
    pub geometry: ResourceId,
    pub material: ResourceId,
    /// Texture bound to the material (`None` = untextured)
    pub texture: Option<ResourceId>,
    pub transform: Mat4,
    pub lod: LodLevel,
    pub selected: bool,
    pub ring: Option<RingDrawItem>,
}

/// Overlay drawn on top of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOverlay {
    /// Progressive loading in progress (0.0..=1.0)
    LoadingProgress(f32),
}

/// Everything the backend needs to draw one frame
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub frame_index: u64,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub environment: EnvironmentSettings,
    pub cards: Vec<CardDrawItem>,
    pub overlay: Option<FrameOverlay>,
}

impl SceneFrame {
    /// Number of cards drawn with a texture bound
    pub fn textured_count(&self) -> usize {
        self.cards.iter().filter(|c| c.texture.is_some()).count()
    }

    /// Draw item of a card, if it is drawn this frame
    pub fn card(&self, id: &CardId) -> Option<&CardDrawItem> {
        self.cards.iter().find(|c| &c.card_id == id)
    }
}
