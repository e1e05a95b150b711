//! Unit tests for GalleryRuntime
//!
//! IMPORTANT: the logger and metrics sink are process globals.
//! Tests touching them are marked with #[serial].

use crate::runtime::GalleryRuntime;
use crate::metrics::{GalleryMetric, MetricsSink};
use crate::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

struct TestLogger {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == "gallery3d::RuntimeTest" {
            self.entries.lock().unwrap().push(format!("{:?}: {}", entry.severity, entry.message));
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    metrics: Mutex<Vec<GalleryMetric>>,
}

impl MetricsSink for RecordingSink {
    fn record(&self, metric: &GalleryMetric) {
        self.metrics.lock().unwrap().push(metric.clone());
    }
}

// ============================================================================
// LOGGER
// ============================================================================

#[test]
#[serial]
fn test_set_logger_receives_entries() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    GalleryRuntime::set_logger(TestLogger { entries: entries.clone() });

    GalleryRuntime::log(LogSeverity::Warn, "gallery3d::RuntimeTest", "hello".to_string());
    GalleryRuntime::log_detailed(
        LogSeverity::Error,
        "gallery3d::RuntimeTest",
        "broken".to_string(),
        "runtime_tests.rs",
        10,
    );

    GalleryRuntime::reset_logger();

    let entries = entries.lock().unwrap();
    assert_eq!(entries.as_slice(), ["Warn: hello", "Error: broken"]);
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    GalleryRuntime::set_logger(TestLogger { entries: entries.clone() });
    GalleryRuntime::reset_logger();

    GalleryRuntime::log(LogSeverity::Info, "gallery3d::RuntimeTest", "after reset".to_string());

    assert!(entries.lock().unwrap().is_empty());
}

// ============================================================================
// METRICS
// ============================================================================

#[test]
#[serial]
fn test_emit_without_sink_is_noop() {
    GalleryRuntime::clear_metrics_sink();
    assert!(!GalleryRuntime::has_metrics_sink());
    GalleryRuntime::emit(GalleryMetric::FrameRate(60.0));
}

#[test]
#[serial]
fn test_emit_reaches_installed_sink() {
    let sink = Arc::new(RecordingSink::default());
    GalleryRuntime::set_metrics_sink(sink.clone());

    GalleryRuntime::emit(GalleryMetric::TextureLoadFailed { url: "x.png".to_string() });
    GalleryRuntime::clear_metrics_sink();
    GalleryRuntime::emit(GalleryMetric::FrameRate(12345.0));

    // Canvas tests may emit concurrently; check our own samples only
    let metrics = sink.metrics.lock().unwrap();
    assert!(metrics.contains(&GalleryMetric::TextureLoadFailed { url: "x.png".to_string() }));
    assert!(!metrics.contains(&GalleryMetric::FrameRate(12345.0)));
}
