//! Level-of-detail module
//!
//! Distance-based detail tier and visibility per card, recomputed at a
//! bounded frequency.

pub mod lod_system;

pub use lod_system::{
    compute_lods, lod_for_distance,
    LodAssignment, LodConfig, LodCounts, LodLevel, LodSystem,
};
