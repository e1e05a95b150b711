/// Gallery preferences as stored by the user-settings service.
///
/// Read by the canvas every frame; the gallery never writes them back.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::layout::LayoutMode;

/// Visual environment around the cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentTheme {
    #[default]
    Space,
    Museum,
    Neon,
    Minimal,
}

impl EnvironmentTheme {
    pub const ALL: [EnvironmentTheme; 4] = [
        EnvironmentTheme::Space,
        EnvironmentTheme::Museum,
        EnvironmentTheme::Neon,
        EnvironmentTheme::Minimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentTheme::Space => "space",
            EnvironmentTheme::Museum => "museum",
            EnvironmentTheme::Neon => "neon",
            EnvironmentTheme::Minimal => "minimal",
        }
    }
}

impl fmt::Display for EnvironmentTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentTheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| Error::InvalidConfig(format!("Unknown environment theme '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryPreferences {
    pub layout_type: LayoutMode,
    pub environment_theme: EnvironmentTheme,
    pub particle_effects: bool,
    /// Forces the accessible 2D presentation
    pub accessibility_mode: bool,
}

impl Default for GalleryPreferences {
    fn default() -> Self {
        Self {
            layout_type: LayoutMode::Circular,
            environment_theme: EnvironmentTheme::Space,
            particle_effects: true,
            accessibility_mode: false,
        }
    }
}

impl GalleryPreferences {
    /// Parse the settings document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("Invalid gallery preferences: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::InvalidConfig(format!("Cannot serialize gallery preferences: {}", e)))
    }
}

#[cfg(test)]
#[path = "gallery_preferences_tests.rs"]
mod tests;
