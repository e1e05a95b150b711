//! Gallery configuration
//!
//! Collects the tunables of every subsystem. `for_device` picks the desktop
//! or mobile preset from the device capabilities.

use crate::camera::ControlsConfig;
use crate::error::{Error, Result};
use crate::graphics_device::DeviceCapabilities;
use crate::loading::LoaderConfig;
use crate::lod::LodConfig;
use crate::texture::TextureManagerConfig;

/// Cards above which a mobile device falls back to the 2D grid
pub const DEFAULT_MOBILE_CARD_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    pub lod: LodConfig,
    pub loader: LoaderConfig,
    pub textures: TextureManagerConfig,
    pub controls: ControlsConfig,
    pub mobile_card_limit: usize,
}

impl GalleryConfig {
    pub fn desktop() -> Self {
        Self {
            lod: LodConfig::desktop(),
            loader: LoaderConfig::desktop(),
            textures: TextureManagerConfig::desktop(),
            controls: ControlsConfig::desktop(),
            mobile_card_limit: DEFAULT_MOBILE_CARD_LIMIT,
        }
    }

    pub fn mobile() -> Self {
        Self {
            lod: LodConfig::mobile(),
            loader: LoaderConfig::mobile(),
            textures: TextureManagerConfig::mobile(),
            controls: ControlsConfig::mobile(),
            mobile_card_limit: DEFAULT_MOBILE_CARD_LIMIT,
        }
    }

    pub fn for_device(capabilities: &DeviceCapabilities) -> Self {
        if capabilities.is_mobile() {
            Self::mobile()
        } else {
            Self::desktop()
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.lod.validate()?;
        self.loader.validate()?;
        self.textures.validate()?;
        self.controls.validate()?;
        // A camera zoomed fully out must still see the card it aims at
        if self.controls.max_distance >= self.lod.cull_distance {
            return Err(Error::InvalidConfig(format!(
                "Camera max_distance ({}) must be below cull_distance ({})",
                self.controls.max_distance, self.lod.cull_distance
            )));
        }
        if self.mobile_card_limit == 0 {
            return Err(Error::InvalidConfig("mobile_card_limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_device_picks_preset() {
        assert_eq!(GalleryConfig::for_device(&DeviceCapabilities::desktop()), GalleryConfig::desktop());
        assert_eq!(GalleryConfig::for_device(&DeviceCapabilities::mobile()), GalleryConfig::mobile());
    }

    #[test]
    fn test_presets_validate() {
        assert!(GalleryConfig::desktop().validate().is_ok());
        assert!(GalleryConfig::mobile().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_bad_section() {
        let mut config = GalleryConfig::desktop();
        config.lod.cull_distance = 1.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = GalleryConfig { mobile_card_limit: 0, ..GalleryConfig::mobile() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_camera_range_must_fit_cull_distance() {
        let mut config = GalleryConfig::desktop();
        config.controls.max_distance = config.lod.cull_distance;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
