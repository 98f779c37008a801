//! Conversion timing utilities

use std::time::{Duration, Instant};

/// Wall-clock timer around one bounded conversion call.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

/// Exponentially-weighted moving average of conversion duration.
///
/// Seeded by the first sample, then `avg = avg * alpha + sample * (1 - alpha)`.
/// The value is informational only; nothing in the pipeline keys off it.
#[derive(Debug, Clone)]
pub struct RollingAverage {
    alpha: f64,
    average_ms: Option<f64>,
}

impl RollingAverage {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            average_ms: None,
        }
    }

    pub fn record(&mut self, sample: Duration) {
        let sample_ms = sample.as_secs_f64() * 1000.0;
        self.average_ms = Some(match self.average_ms {
            None => sample_ms,
            Some(avg) => avg * self.alpha + sample_ms * (1.0 - self.alpha),
        });
    }

    /// Current average in milliseconds; `None` until the first sample.
    pub fn average_ms(&self) -> Option<f64> {
        self.average_ms
    }
}
