/// Frame-rate measurement window.

/// Counts frames and reports the average rate once per window
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: f32,
    frames: u32,
    elapsed: f32,
}

impl FrameStats {
    pub fn new(window_seconds: f32) -> Self {
        Self { window: window_seconds.max(0.001), frames: 0, elapsed: 0.0 }
    }

    /// Record one frame of `dt` seconds; returns the FPS when a window closes
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.window {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(fps)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(1.0)
    }
}
