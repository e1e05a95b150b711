//! Gallery card module
//!
//! Per-card geometry, material, texture binding, and selection animation.

pub mod card_mesh;
pub mod gallery_card;
pub mod spring;

pub use card_mesh::{build_card_mesh, build_ring_mesh, card_segments, ring_segments};
pub use gallery_card::{CardRenderContext, GalleryCard, TextureState, SELECTED_LIFT, SELECTED_SCALE};
pub use spring::Spring;
