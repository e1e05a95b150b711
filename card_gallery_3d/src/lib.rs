/*!
# Card Gallery 3D

Core of a 3D trading-card collection gallery.

The crate turns a card collection into positioned, level-of-detail managed,
progressively loaded cards and composes one backend-agnostic scene frame per
tick. Rendering itself is delegated to a `GraphicsDevice` implementation
supplied by the host; when 3D is unavailable (or unwanted) the canvas hands
back a 2D grid description instead.

## Architecture

- **Layout**: card list + mode -> deterministic positions
- **ResourceManager**: tracks every GPU resource, releases each exactly once
- **TextureManager**: cached, prioritized, bounded-concurrency texture loads
- **LodSystem**: distance-based detail levels and culling
- **ProgressiveLoader**: reveals cards in timed batches
- **GalleryCard**: per-card geometry, material, texture and selection ring
- **GalleryCanvas**: orchestrates all of the above into the frame loop
*/

// Internal modules
mod error;
mod runtime;
pub mod log;
pub mod metrics;
pub mod card;
pub mod layout;
pub mod graphics_device;
pub mod resource;
pub mod texture;
pub mod lod;
pub mod loading;
pub mod gallery_card;
pub mod camera;
pub mod canvas;
pub mod preferences;
pub mod config;

// Main gallery3d namespace module
pub mod gallery3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Process-wide logger and metrics sink
    pub use crate::runtime::GalleryRuntime;

    // Entry point
    pub use crate::canvas::{CanvasState, GalleryCanvas};
    pub use crate::config::GalleryConfig;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, NullLogger};
    }

    pub mod card {
        pub use crate::card::*;
    }

    pub mod device {
        pub use crate::graphics_device::*;
    }

    pub mod resource {
        pub use crate::resource::*;
    }

    pub mod texture {
        pub use crate::texture::*;
    }

    pub mod scene {
        pub use crate::camera::*;
        pub use crate::gallery_card::*;
        pub use crate::layout::*;
        pub use crate::loading::*;
        pub use crate::lod::*;
    }

    pub mod preferences {
        pub use crate::preferences::*;
    }

    pub mod metrics {
        pub use crate::metrics::*;
    }
}

// Re-export math library at crate root
pub use glam;
