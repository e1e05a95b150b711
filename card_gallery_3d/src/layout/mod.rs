//! Layout module - card placement in 3D space.
//!
//! Pure functions only: the same cards in the same order with the same mode
//! always produce the same positions.

mod layout_engine;

pub use layout_engine::{
    compute_layout, layout_bounds,
    CardPosition, LayoutBounds, LayoutMode,
    CARD_WIDTH, CARD_HEIGHT,
};
