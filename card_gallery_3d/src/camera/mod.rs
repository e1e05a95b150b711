//! Camera module - orbit controls for the gallery scene.

mod controls;
mod orbit_camera;

pub use controls::ControlsConfig;
pub use orbit_camera::{framing_distance, OrbitCamera, Ray};
