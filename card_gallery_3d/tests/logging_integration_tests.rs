//! Integration tests for the gallery logging system
//!
//! These tests verify logger installation and entry capture.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use card_gallery_3d::gallery3d::GalleryRuntime;
use card_gallery_3d::gallery3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that keeps entries from the "test::" sources
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with("test::") {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    GalleryRuntime::set_logger(test_logger);

    GalleryRuntime::log(LogSeverity::Info, "test::canvas", "Mounted".to_string());
    GalleryRuntime::log(LogSeverity::Warn, "test::canvas", "Card skipped".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].message, "Mounted");
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert_eq!(captured[1].file, None);
    }

    GalleryRuntime::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (test_logger, entries) = TestLogger::new();
    GalleryRuntime::set_logger(test_logger);

    GalleryRuntime::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Render failed".to_string(),
        "canvas.rs",
        42,
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].file, Some("canvas.rs"));
        assert_eq!(captured[0].line, Some(42));
    }

    GalleryRuntime::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    GalleryRuntime::set_logger(test_logger);
    GalleryRuntime::log(LogSeverity::Info, "test::reset", "Message 1".to_string());
    GalleryRuntime::reset_logger();
    GalleryRuntime::log(LogSeverity::Info, "test::reset", "Message 2".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].message, "Message 1");
}
