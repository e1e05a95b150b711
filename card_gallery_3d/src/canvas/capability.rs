/// Render mode decision from device capabilities and preferences.

use std::fmt;
use crate::graphics_device::DeviceCapabilities;
use crate::preferences::GalleryPreferences;

/// Why the gallery shows the 2D grid instead of the 3D scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Runtime has no 3D support
    Unsupported3D,
    /// Too many cards for a mobile device
    MobileCardLimit { cards: usize, limit: usize },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Unsupported3D => write!(f, "3D rendering is not supported on this device"),
            FallbackReason::MobileCardLimit { cards, limit } => {
                write!(f, "{} cards exceed the mobile 3D limit of {}", cards, limit)
            }
        }
    }
}

/// How the gallery is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Full 3D scene
    ThreeD,
    /// 2D grid because 3D is unavailable or too heavy
    Fallback2D(FallbackReason),
    /// Accessible 2D list requested by the user
    Accessible,
}

impl RenderMode {
    pub fn is_3d(&self) -> bool {
        matches!(self, RenderMode::ThreeD)
    }
}

/// Decide the render mode. An unsupported device never gets 3D.
pub fn decide_render_mode(
    capabilities: &DeviceCapabilities,
    preferences: &GalleryPreferences,
    card_count: usize,
    mobile_card_limit: usize,
) -> RenderMode {
    if !capabilities.supports_3d() {
        RenderMode::Fallback2D(FallbackReason::Unsupported3D)
    } else if preferences.accessibility_mode {
        RenderMode::Accessible
    } else if capabilities.is_mobile() && card_count > mobile_card_limit {
        RenderMode::Fallback2D(FallbackReason::MobileCardLimit { cards: card_count, limit: mobile_card_limit })
    } else {
        RenderMode::ThreeD
    }
}
