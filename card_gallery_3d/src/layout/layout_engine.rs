/// Layout engine - maps a card list and a layout mode to positions.
///
/// Every mode guarantees one position per card, in input order, with no two
/// cards sharing coordinates:
/// - Circular: distinct angles on a ring of non-zero radius
/// - GalleryWall / Grid: distinct lattice cells
/// - Spiral: strictly increasing height per index

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::card::CardEntity;
use crate::error::Error;

/// Card face width in world units
pub const CARD_WIDTH: f32 = 2.5;
/// Card face height in world units
pub const CARD_HEIGHT: f32 = 3.5;

/// Ring never shrinks below this radius, even for tiny collections
const MIN_RING_RADIUS: f32 = 8.0;
/// Arc length reserved per card on the ring
const RING_SPACING: f32 = 3.2;

const WALL_SPACING_X: f32 = 3.2;
const WALL_SPACING_Y: f32 = 4.2;
/// Target columns/rows ratio of the wall
const WALL_ASPECT: f32 = 1.6;

const SPIRAL_BASE_RADIUS: f32 = 6.0;
const SPIRAL_RADIUS_STEP: f32 = 0.25;
const SPIRAL_ANGLE_STEP: f32 = 0.6;
const SPIRAL_HEIGHT_STEP: f32 = 0.35;

const GRID_SPACING_X: f32 = 4.0;
const GRID_SPACING_Y: f32 = 5.0;
const GRID_SPACING_Z: f32 = 4.0;

/// Arrangement of cards in the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Evenly spaced on a ring around the viewer; radius scales with card count
    Circular,
    /// Rows and columns on a vertical plane
    GalleryWall,
    /// Helix with increasing radius and height per index
    Spiral,
    /// Regular 3D lattice
    Grid,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 4] = [
        LayoutMode::Circular,
        LayoutMode::GalleryWall,
        LayoutMode::Spiral,
        LayoutMode::Grid,
    ];

    /// Preference string of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Circular => "circular",
            LayoutMode::GalleryWall => "gallery_wall",
            LayoutMode::Spiral => "spiral",
            LayoutMode::Grid => "grid",
        }
    }
}

impl Default for LayoutMode {
    fn default() -> Self {
        LayoutMode::Circular
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circular" => Ok(LayoutMode::Circular),
            "gallery_wall" => Ok(LayoutMode::GalleryWall),
            "spiral" => Ok(LayoutMode::Spiral),
            "grid" => Ok(LayoutMode::Grid),
            other => Err(Error::InvalidConfig(format!("Unknown layout type '{}'", other))),
        }
    }
}

/// Placement of one card
#[derive(Debug, Clone, PartialEq)]
pub struct CardPosition {
    pub card: CardEntity,
    /// World-space center of the card
    pub position: Vec3,
    /// Euler rotation (XYZ, radians)
    pub rotation: Vec3,
}

/// Axis-aligned bounds of a layout, used to frame the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl LayoutBounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the sphere enclosing the bounds
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }
}

/// Compute positions for every card.
///
/// Always a full recomputation; callers replace their previous positions
/// wholesale so stale placements never mix with a new layout.
pub fn compute_layout(cards: &[CardEntity], mode: LayoutMode) -> Vec<CardPosition> {
    let count = cards.len();
    cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let (position, rotation) = match mode {
                LayoutMode::Circular => circular(index, count),
                LayoutMode::GalleryWall => gallery_wall(index, count),
                LayoutMode::Spiral => spiral(index, count),
                LayoutMode::Grid => grid(index, count),
            };
            CardPosition { card: card.clone(), position, rotation }
        })
        .collect()
}

/// Bounds of a set of positions (`None` when empty)
pub fn layout_bounds(positions: &[CardPosition]) -> Option<LayoutBounds> {
    let first = positions.first()?.position;
    let (min, max) = positions.iter().fold((first, first), |(min, max), p| {
        (min.min(p.position), max.max(p.position))
    });
    Some(LayoutBounds { min, max })
}

/// Y rotation turning a card's +Z face toward the vertical axis through the origin
fn facing_center(position: Vec3) -> f32 {
    (-position.x).atan2(-position.z)
}

fn ring_radius(count: usize) -> f32 {
    (count as f32 * RING_SPACING / TAU).max(MIN_RING_RADIUS)
}

fn circular(index: usize, count: usize) -> (Vec3, Vec3) {
    let radius = ring_radius(count);
    let angle = index as f32 * TAU / count as f32;
    let position = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
    (position, Vec3::new(0.0, facing_center(position), 0.0))
}

/// Smallest column count whose square covers `count * WALL_ASPECT`
fn wall_columns(count: usize) -> usize {
    let target = (count as f32 * WALL_ASPECT).ceil() as usize;
    let mut columns = 1;
    while columns * columns < target {
        columns += 1;
    }
    columns.min(count.max(1))
}

fn gallery_wall(index: usize, count: usize) -> (Vec3, Vec3) {
    let columns = wall_columns(count);
    let rows = count.div_ceil(columns);
    let column = index % columns;
    let row = index / columns;

    let x = (column as f32 - (columns as f32 - 1.0) * 0.5) * WALL_SPACING_X;
    let y = ((rows as f32 - 1.0) * 0.5 - row as f32) * WALL_SPACING_Y;
    (Vec3::new(x, y, 0.0), Vec3::ZERO)
}

fn spiral(index: usize, count: usize) -> (Vec3, Vec3) {
    let i = index as f32;
    let angle = i * SPIRAL_ANGLE_STEP;
    let radius = SPIRAL_BASE_RADIUS + i * SPIRAL_RADIUS_STEP;
    let height = (i - (count as f32 - 1.0) * 0.5) * SPIRAL_HEIGHT_STEP;
    let position = Vec3::new(radius * angle.cos(), height, radius * angle.sin());
    // Slight forward tilt so upper turns face down toward the viewer
    let tilt = -(height / (radius + 1.0)).atan() * 0.25;
    (position, Vec3::new(tilt, facing_center(position), 0.0))
}

/// Smallest lattice side whose cube holds `count` cells
fn grid_side(count: usize) -> usize {
    let mut side = 1;
    while side * side * side < count {
        side += 1;
    }
    side
}

fn grid(index: usize, count: usize) -> (Vec3, Vec3) {
    let side = grid_side(count);
    let half = (side as f32 - 1.0) * 0.5;
    let x = index % side;
    let y = (index / side) % side;
    let z = index / (side * side);
    let position = Vec3::new(
        (x as f32 - half) * GRID_SPACING_X,
        (y as f32 - half) * GRID_SPACING_Y,
        (z as f32 - half) * GRID_SPACING_Z,
    );
    // Face the camera side (+Z) with a touch of alternating yaw for depth cues
    let yaw = if (x + z) % 2 == 0 { 0.0 } else { PI / 36.0 };
    (position, Vec3::new(0.0, yaw, 0.0))
}

#[cfg(test)]
#[path = "layout_engine_tests.rs"]
mod tests;
