/// Orbit control settings per device class.

use crate::error::{Error, Result};

/// Orbit camera limits and feel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsConfig {
    /// Closest the camera may get to its target
    pub min_distance: f32,
    /// Farthest the camera may get from its target
    pub max_distance: f32,
    /// Fraction of the remaining motion applied per 60 Hz frame (0, 1]
    pub damping: f32,
    /// Radians per unit of rotate input
    pub rotate_speed: f32,
    /// Distance units per unit of zoom input
    pub zoom_speed: f32,
    /// Rotation disabled in accessibility mode
    pub enable_rotate: bool,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl ControlsConfig {
    pub fn desktop() -> Self {
        Self {
            min_distance: 5.0,
            max_distance: 50.0,
            damping: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            enable_rotate: true,
            fov_y: 60f32.to_radians(),
            near: 0.1,
            far: 200.0,
        }
    }

    pub fn mobile() -> Self {
        Self {
            min_distance: 8.0,
            max_distance: 30.0,
            damping: 0.1,
            rotate_speed: 0.6,
            zoom_speed: 0.5,
            fov_y: 70f32.to_radians(),
            ..Self::desktop()
        }
    }

    /// Same limits with rotation turned off
    pub fn with_accessibility(mut self, accessibility_mode: bool) -> Self {
        if accessibility_mode {
            self.enable_rotate = false;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_distance > 0.0 && self.min_distance < self.max_distance) {
            return Err(Error::InvalidConfig(format!(
                "Camera distance range invalid ({}..{})", self.min_distance, self.max_distance
            )));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(Error::InvalidConfig(format!("Camera damping must be in (0, 1], got {}", self.damping)));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(Error::InvalidConfig(format!(
                "Camera clip range invalid ({}..{})", self.near, self.far
            )));
        }
        Ok(())
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self::desktop()
    }
}
