//! Preferences module
//!
//! User-facing gallery settings and keyboard/voice navigation.

pub mod gallery_preferences;
pub mod navigation;

pub use gallery_preferences::{EnvironmentTheme, GalleryPreferences};
pub use navigation::{GalleryNavigation, NavigationAction, NavigationOutcome};
