/// Orbit camera with damped motion.
///
/// Input sets goal values (yaw, pitch, distance, target); `update` eases the
/// current values toward them. View and projection follow the current values.

use glam::{Mat4, Vec2, Vec3};
use super::controls::ControlsConfig;

const MIN_PITCH: f32 = -1.2;
const MAX_PITCH: f32 = 1.2;

/// Half-line used for picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    /// Distance along the ray to the first hit of a sphere, if any
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let along = to_center.dot(self.direction);
        let closest_sq = to_center.length_squared() - along * along;
        let radius_sq = radius * radius;
        if closest_sq > radius_sq {
            return None;
        }
        let half_chord = (radius_sq - closest_sq).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if far < 0.0 {
            None
        } else if near < 0.0 {
            Some(0.0)
        } else {
            Some(near)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OrbitState {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: ControlsConfig,
    aspect: f32,
    current: OrbitState,
    goal: OrbitState,
}

impl OrbitCamera {
    pub fn new(config: ControlsConfig, aspect: f32) -> Self {
        let state = OrbitState {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.25,
            distance: (config.min_distance + config.max_distance) * 0.5,
        };
        Self { config, aspect: aspect.max(0.01), current: state, goal: state }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    /// Swap limits (device or accessibility change); distance is re-clamped
    pub fn set_config(&mut self, config: ControlsConfig) {
        self.config = config;
        self.goal.distance = self.clamp_distance(self.goal.distance);
        self.current.distance = self.clamp_distance(self.current.distance);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(0.01);
    }

    // ===== INPUT =====

    /// Orbit around the target. Returns false when rotation is disabled.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) -> bool {
        if !self.config.enable_rotate {
            return false;
        }
        self.goal.yaw += delta_yaw * self.config.rotate_speed;
        self.goal.pitch = (self.goal.pitch + delta_pitch * self.config.rotate_speed).clamp(MIN_PITCH, MAX_PITCH);
        true
    }

    /// Move toward (negative) or away from (positive) the target
    pub fn zoom(&mut self, delta: f32) {
        self.goal.distance = self.clamp_distance(self.goal.distance + delta * self.config.zoom_speed);
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.goal.target = target;
    }

    /// Aim at a bounding sphere and back off far enough to see it
    pub fn frame(&mut self, center: Vec3, radius: f32) {
        self.goal.target = center;
        self.goal.distance = self.clamp_distance(framing_distance(radius));
    }

    /// True if `frame` can back off far enough for the whole sphere
    pub fn can_frame(&self, radius: f32) -> bool {
        framing_distance(radius) <= self.config.max_distance
    }

    /// Jump to the goal without easing (initial placement)
    pub fn snap(&mut self) {
        self.current = self.goal;
    }

    /// Ease toward the goal; `dt` in seconds
    pub fn update(&mut self, dt: f32) {
        let frames = (dt.max(0.0) * 60.0).min(600.0);
        let t = 1.0 - (1.0 - self.config.damping).powf(frames);
        self.current.target = self.current.target.lerp(self.goal.target, t);
        self.current.yaw += (self.goal.yaw - self.current.yaw) * t;
        self.current.pitch += (self.goal.pitch - self.current.pitch) * t;
        self.current.distance += (self.goal.distance - self.current.distance) * t;
    }

    // ===== OUTPUT =====

    pub fn target(&self) -> Vec3 {
        self.current.target
    }

    pub fn distance(&self) -> f32 {
        self.current.distance
    }

    pub fn goal_distance(&self) -> f32 {
        self.goal.distance
    }

    pub fn position(&self) -> Vec3 {
        let OrbitState { target, yaw, pitch, distance } = self.current;
        target + Vec3::new(
            distance * pitch.cos() * yaw.sin(),
            distance * pitch.sin(),
            distance * pitch.cos() * yaw.cos(),
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.current.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.config.fov_y, self.aspect, self.config.near, self.config.far)
    }

    /// World-space ray through a point in normalized device coordinates
    /// (x, y in [-1, 1], y up)
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = (self.projection() * self.view()).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray { origin: near, direction: (far - near).normalize_or_zero() }
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.config.min_distance, self.config.max_distance)
    }
}

/// Distance at which a bounding sphere of `radius` fits the view, before zoom limits
pub fn framing_distance(radius: f32) -> f32 {
    radius * 1.6 + 4.0
}

#[cfg(test)]
#[path = "orbit_camera_tests.rs"]
mod tests;
