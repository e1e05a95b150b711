//! Gallery log records and sinks
//!
//! Every subsystem reports through the `gallery_*` macros, which hand a
//! `LogEntry` to the logger installed on `GalleryRuntime`. Hosts replace the
//! colored stdout sink with their own `Logger` (or silence it with
//! `NullLogger`). Errors carry the call site.

use colored::*;
use std::fmt;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Destination for gallery log entries.
///
/// ```no_run
/// use card_gallery_3d::gallery3d::log::{Logger, LogEntry};
///
/// struct ConsoleBridge;
///
/// impl Logger for ConsoleBridge {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}: {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Reporting subsystem, e.g. "gallery3d::TextureManager"
    pub source: String,
    pub message: String,
    /// Call site, recorded for errors only
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// LOD swaps, batch reveals, queued loads
    Trace,
    Debug,
    /// Mount, render mode, teardown
    Info,
    /// A card degraded or skipped
    Warn,
    Error,
}

impl LogSeverity {
    /// Fixed-width tag used by `DefaultLogger`
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    fn colorize(&self) -> ColoredString {
        let label = self.label();
        match self {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}

/// Prints `[time] [LEVEL] [source] message` to stdout, with `(file:line)`
/// appended when the entry has a call site.
pub struct DefaultLogger;

impl DefaultLogger {
    /// One plain line for `entry`, without terminal colors
    pub fn render(entry: &LogEntry) -> String {
        Self::compose(entry, entry.severity.label().to_string(), entry.source.clone())
    }

    fn compose(entry: &LogEntry, severity: String, source: String) -> String {
        let stamp: DateTime<Local> = entry.timestamp.into();
        let mut line = format!(
            "[{}] [{}] [{}] {}",
            stamp.format("%H:%M:%S%.3f"), severity, source, entry.message
        );
        if let (Some(file), Some(number)) = (entry.file, entry.line) {
            line.push_str(&format!(" ({}:{})", file, number));
        }
        line
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let severity = entry.severity.colorize().to_string();
        let source = entry.source.bright_blue().to_string();
        println!("{}", Self::compose(entry, severity, source));
    }
}

/// Discards everything
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _entry: &LogEntry) {}
}

// ===== MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! gallery_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::gallery3d::GalleryRuntime::log(
            $crate::gallery3d::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! gallery_trace {
    ($source:expr, $($arg:tt)*) => { $crate::gallery_log!(Trace, $source, $($arg)*) };
}

#[macro_export]
macro_rules! gallery_debug {
    ($source:expr, $($arg:tt)*) => { $crate::gallery_log!(Debug, $source, $($arg)*) };
}

/// `gallery_info!("gallery3d::Canvas", "Mounted in {:?} mode", mode);`
#[macro_export]
macro_rules! gallery_info {
    ($source:expr, $($arg:tt)*) => { $crate::gallery_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! gallery_warn {
    ($source:expr, $($arg:tt)*) => { $crate::gallery_log!(Warn, $source, $($arg)*) };
}

/// Error entry stamped with the caller's file and line
#[macro_export]
macro_rules! gallery_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::gallery3d::GalleryRuntime::log_detailed(
            $crate::gallery3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Logs like `gallery_error!` and evaluates to the matching
/// `Error::BackendError`, ready for `map_err` or `Err(..)`.
#[macro_export]
macro_rules! gallery_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::gallery_error!($source, "{}", message);
        $crate::gallery3d::Error::BackendError(message)
    }};
}

/// `return Err(gallery_err!(..))`
#[macro_export]
macro_rules! gallery_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::gallery_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
