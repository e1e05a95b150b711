//! Unit tests for error.rs
//!
//! Tests the Error variants and their implementations (Display, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("present failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("present failed"));
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of GPU memory");
}

#[test]
fn test_texture_load_failed_display_names_url() {
    let err = Error::TextureLoadFailed {
        url: "https://cdn.example/cards/7.png".to_string(),
        reason: "404".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.contains("https://cdn.example/cards/7.png"));
    assert!(display.contains("404"));
}

#[test]
fn test_texture_timeout_display() {
    let err = Error::TextureTimeout { url: "a.png".to_string(), timeout_ms: 10_000 };
    assert_eq!(format!("{}", err), "Texture load for 'a.png' timed out after 10000 ms");
}

#[test]
fn test_invalid_config_display() {
    let err = Error::InvalidConfig("batch_size must be > 0".to_string());
    assert!(format!("{}", err).starts_with("Invalid configuration"));
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[test]
fn test_texture_errors_are_card_local() {
    assert!(Error::TextureLoadFailed { url: "u".into(), reason: "r".into() }.is_texture_error());
    assert!(Error::TextureDecodeFailed { url: "u".into(), reason: "r".into() }.is_texture_error());
    assert!(Error::TextureTimeout { url: "u".into(), timeout_ms: 1 }.is_texture_error());
    assert!(Error::LoadCancelled("reset".into()).is_texture_error());
}

#[test]
fn test_render_errors_are_not_texture_errors() {
    assert!(!Error::RenderFailed("boom".into()).is_texture_error());
    assert!(!Error::BackendError("boom".into()).is_texture_error());
    assert!(!Error::OutOfMemory.is_texture_error());
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_is_equal() {
    let err = Error::TextureLoadFailed { url: "x".into(), reason: "y".into() };
    assert_eq!(err.clone(), err);
}

#[test]
fn test_result_type_err() {
    fn returns_error() -> Result<i32> {
        Err(Error::RenderFailed("frame".to_string()))
    }

    match returns_error() {
        Err(e) => assert_eq!(format!("{}", e), "Render failed: frame"),
        Ok(_) => panic!("expected an error"),
    }
}
