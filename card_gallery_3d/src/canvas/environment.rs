/// Environment settings derived from the theme and the device.

use crate::graphics_device::DeviceCapabilities;
use crate::preferences::{EnvironmentTheme, GalleryPreferences};

/// Background, lighting and particles drawn around the cards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSettings {
    pub theme: EnvironmentTheme,
    /// Linear RGBA clear color
    pub background: [f32; 4],
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub key_light_intensity: f32,
    pub particle_count: u32,
}

impl EnvironmentSettings {
    /// Full-quality settings of a theme
    pub fn for_theme(theme: EnvironmentTheme) -> Self {
        let (background, ambient_color, ambient_intensity, key_light_intensity, particle_count) = match theme {
            EnvironmentTheme::Space => ([0.01, 0.01, 0.04, 1.0], [0.55, 0.6, 1.0], 0.35, 1.2, 2000),
            EnvironmentTheme::Museum => ([0.92, 0.9, 0.86, 1.0], [1.0, 0.96, 0.9], 0.7, 0.9, 200),
            EnvironmentTheme::Neon => ([0.04, 0.0, 0.08, 1.0], [1.0, 0.3, 0.9], 0.45, 1.4, 1200),
            EnvironmentTheme::Minimal => ([0.97, 0.97, 0.97, 1.0], [1.0, 1.0, 1.0], 0.9, 0.6, 0),
        };
        Self { theme, background, ambient_color, ambient_intensity, key_light_intensity, particle_count }
    }
}

/// Settings for the current preferences on this device.
///
/// Particles are halved on mobile and dropped when disabled or in
/// accessibility mode.
pub fn environment_for(preferences: &GalleryPreferences, capabilities: &DeviceCapabilities) -> EnvironmentSettings {
    let mut settings = EnvironmentSettings::for_theme(preferences.environment_theme);
    if !preferences.particle_effects || preferences.accessibility_mode {
        settings.particle_count = 0;
    } else if capabilities.is_mobile() {
        settings.particle_count /= 2;
    }
    settings
}
