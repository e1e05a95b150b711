/// Gallery runtime - process-wide logger and metrics sink
///
/// The logger and the metrics sink are the only global state of the gallery.
/// Both use thread-safe static storage with RwLock; everything else
/// (canvas, resource manager, texture manager) is owned by the host.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::metrics::{GalleryMetric, MetricsSink};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Global metrics sink (absent by default)
static METRICS_SINK: OnceLock<RwLock<Option<Arc<dyn MetricsSink>>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MetricsSink>>> {
    METRICS_SINK.get_or_init(|| RwLock::new(None))
}

// ===== PUBLIC API =====

/// Process-wide services shared by every gallery instance
///
/// # Example
///
/// ```no_run
/// use card_gallery_3d::gallery3d::{GalleryRuntime, log::{Logger, LogEntry}};
///
/// struct Forward;
/// impl Logger for Forward {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}", entry.message);
///     }
/// }
///
/// GalleryRuntime::set_logger(Forward);
/// ```
pub struct GalleryRuntime;

impl GalleryRuntime {
    // ===== LOGGING API =====

    /// Replace the default logger with a custom implementation
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like gallery_info!, gallery_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by gallery_error!, gallery_err! and gallery_bail!.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }

    // ===== METRICS API =====

    /// Install the telemetry sink receiving gallery metrics
    pub fn set_metrics_sink(sink: Arc<dyn MetricsSink>) {
        if let Ok(mut lock) = metrics_lock().write() {
            *lock = Some(sink);
        }
    }

    /// Remove the telemetry sink; subsequent emits are dropped
    pub fn clear_metrics_sink() {
        if let Ok(mut lock) = metrics_lock().write() {
            *lock = None;
        }
    }

    /// Whether a metrics sink is currently installed
    pub fn has_metrics_sink() -> bool {
        metrics_lock().read().map(|lock| lock.is_some()).unwrap_or(false)
    }

    /// Emit a metric (fire-and-forget).
    ///
    /// The sink is cloned out of the lock before recording so a slow or
    /// re-entrant sink never holds the global lock.
    pub fn emit(metric: GalleryMetric) {
        let sink = match metrics_lock().read() {
            Ok(lock) => lock.clone(),
            Err(_) => None,
        };
        if let Some(sink) = sink {
            sink.record(&metric);
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
