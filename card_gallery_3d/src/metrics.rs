/// Gallery metrics and the optional telemetry sink.
///
/// Metrics are fire-and-forget: the gallery never waits on a sink and
/// behaves identically when none is installed.

use crate::card::CardId;

/// A single metric sample emitted by the gallery
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryMetric {
    /// Smoothed frames per second over the last measurement window
    FrameRate(f32),
    /// Bytes of GPU memory currently tracked by the resource manager
    GpuMemory { tracked_bytes: u64, tracked_resources: usize },
    /// A render error caught at the card (`Some`) or canvas (`None`) boundary
    RenderError { card_id: Option<CardId>, message: String },
    /// A card texture failed to load and the card renders untextured
    TextureLoadFailed { url: String },
    /// Progressive loading finished for the current card set
    LoadingComplete { cards: usize, elapsed_ms: u64 },
}

/// Sink receiving gallery metrics (external telemetry collector).
///
/// Implementations must return quickly; heavy work belongs on the
/// collector's side.
pub trait MetricsSink: Send + Sync {
    /// Record one metric sample
    fn record(&self, metric: &GalleryMetric);
}
