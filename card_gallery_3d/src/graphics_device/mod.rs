/// Graphics device module - backend abstraction for GPU resources
///
/// The gallery never talks to a graphics API directly. A backend implements
/// `GraphicsDevice` and hands out reference-counted resource handles that the
/// resource manager tracks and releases.

pub mod graphics_device;
pub mod resources;
pub mod frame;

pub use graphics_device::*;
pub use resources::*;
pub use frame::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
