//! Error types for the card gallery
//!
//! This module defines the error types used throughout the gallery core,
//! including graphics backend failures, texture loading, rendering, and
//! configuration.

use std::fmt;

/// Result type for gallery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Gallery errors
///
/// `Clone` is required: texture loads are shared futures and every waiter
/// receives its own copy of the outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (graphics device, presentation)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (geometry, material, texture handle)
    InvalidResource(String),

    /// Initialization failed (canvas mount, device creation)
    InitializationFailed(String),

    /// Fetching a card image failed
    TextureLoadFailed { url: String, reason: String },

    /// Fetched bytes could not be decoded into an image
    TextureDecodeFailed { url: String, reason: String },

    /// Fetch did not complete within the configured bound
    TextureTimeout { url: String, timeout_ms: u64 },

    /// Load discarded before completion (cache cleared, gallery reset)
    LoadCancelled(String),

    /// Frame composition failed
    RenderFailed(String),

    /// Invalid configuration or preference value
    InvalidConfig(String),

    /// Card data source failure
    DataSource(String),
}

impl Error {
    /// Whether this error only affects a single card's texture.
    ///
    /// Such errors degrade the card to an untextured state and never reach
    /// the canvas.
    pub fn is_texture_error(&self) -> bool {
        matches!(
            self,
            Error::TextureLoadFailed { .. }
                | Error::TextureDecodeFailed { .. }
                | Error::TextureTimeout { .. }
                | Error::LoadCancelled(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::TextureLoadFailed { url, reason } => {
                write!(f, "Texture load failed for '{}': {}", url, reason)
            }
            Error::TextureDecodeFailed { url, reason } => {
                write!(f, "Texture decode failed for '{}': {}", url, reason)
            }
            Error::TextureTimeout { url, timeout_ms } => {
                write!(f, "Texture load for '{}' timed out after {} ms", url, timeout_ms)
            }
            Error::LoadCancelled(msg) => write!(f, "Load cancelled: {}", msg),
            Error::RenderFailed(msg) => write!(f, "Render failed: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::DataSource(msg) => write!(f, "Card data source error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
