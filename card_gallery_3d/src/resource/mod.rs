//! Resource management module
//!
//! Tracks every GPU object created for the gallery and releases it exactly once.

pub mod resource_manager;

pub use resource_manager::{ResourceManager, ResourceStats, TrackedKey, TrackedResource};
