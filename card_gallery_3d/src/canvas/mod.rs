//! Canvas module
//!
//! Orchestrates the gallery subsystems into one frame loop, decides between
//! the 3D scene and the 2D grid, and handles selection and navigation.

pub mod capability;
pub mod environment;
pub mod fallback_grid;
pub mod frame_stats;
pub mod gallery_canvas;

pub use capability::{decide_render_mode, FallbackReason, RenderMode};
pub use environment::{environment_for, EnvironmentSettings};
pub use fallback_grid::{build_fallback_grid, fallback_columns, FallbackGridItem};
pub use frame_stats::FrameStats;
pub use gallery_canvas::{CanvasState, GalleryCanvas, EMPTY_COLLECTION_MESSAGE};
