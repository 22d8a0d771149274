//! Frame timing

use tracing::trace;

/// Derives per-frame deltas from frame driver timestamps
///
/// The first frame has a zero delta. A timestamp earlier than the newest one
/// seen also yields zero rather than a negative delta.
#[derive(Clone, Debug, Default)]
pub struct FrameTimer {
    last_timestamp: Option<f64>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame timestamp, returning milliseconds since the last one
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let elapsed_ms = match self.last_timestamp {
            Some(last) if timestamp_ms > last => timestamp_ms - last,
            _ => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp = Some(match self.last_timestamp {
                Some(last) => last.max(timestamp_ms),
                None => timestamp_ms,
            });
        }

        trace!(timestamp_ms, elapsed_ms, "frame");
        elapsed_ms
    }
}
