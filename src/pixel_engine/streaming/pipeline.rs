//! Streaming conversion pipeline

use tracing::{debug, info};

use crate::pixel_engine::common::error::{EngineError, Result};
use crate::pixel_engine::convert;
use crate::pixel_engine::execution::accelerated_supported;
use crate::pixel_engine::frame::{InterleavedBitmap, PlanarFrame};
use crate::pixel_engine::streaming::cache::FrameBufferReuseCache;
use crate::pixel_engine::streaming::timing::{RollingAverage, Timer};

/// Consumer of converted frames (a display surface in the real application).
pub trait FrameSink {
    fn present(&mut self, bitmap: &InterleavedBitmap) -> Result<()>;
}

/// What the pipeline did with one submitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Frame skipped while the capture hardware settles
    WarmingUp,
    /// Frame converted and handed to the sink
    Processed,
}

/// Configuration for a streaming session.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Frames skipped unconditionally before any conversion work begins
    pub warm_up_frames: u32,
    /// EWMA weight kept on the previous average per sample
    pub smoothing: f64,
    /// Whether conversions request the vector-accelerated path
    pub use_accelerated: bool,
    /// Fail submissions with `UnsupportedAcceleration` instead of falling
    /// back to scalar when the target lacks vector support
    pub require_accelerated: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            warm_up_frames: 50,
            smoothing: 0.90,
            use_accelerated: false,
            require_accelerated: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    warm_up_frames: Option<u32>,
    smoothing: Option<f64>,
    use_accelerated: Option<bool>,
    require_accelerated: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn warm_up_frames(mut self, frames: u32) -> Self {
        self.warm_up_frames = Some(frames);
        self
    }

    pub fn smoothing(mut self, alpha: f64) -> Self {
        self.smoothing = Some(alpha);
        self
    }

    pub fn use_accelerated(mut self, enable: bool) -> Self {
        self.use_accelerated = Some(enable);
        self
    }

    pub fn require_accelerated(mut self, require: bool) -> Self {
        self.require_accelerated = Some(require);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            warm_up_frames: self.warm_up_frames.unwrap_or(default.warm_up_frames),
            smoothing: self.smoothing.unwrap_or(default.smoothing),
            use_accelerated: self.use_accelerated.unwrap_or(default.use_accelerated),
            require_accelerated: self
                .require_accelerated
                .unwrap_or(default.require_accelerated),
        }
    }
}

/// Sequences conversions across a continuous frame stream.
///
/// One frame is in flight at a time; `submit` takes `&mut self`, so a
/// pipeline instance is driven from exactly one thread. Frames arriving
/// while a conversion runs are the caller's concern (latest-only
/// backpressure lives on the capture side).
pub struct StreamingPipeline<S: FrameSink> {
    sink: S,
    config: PipelineConfig,
    cache: FrameBufferReuseCache,
    skipped: u32,
    average: RollingAverage,
}

impl<S: FrameSink> StreamingPipeline<S> {
    pub fn new(sink: S, config: PipelineConfig) -> Self {
        let average = RollingAverage::new(config.smoothing);
        Self {
            sink,
            config,
            cache: FrameBufferReuseCache::new(),
            skipped: 0,
            average,
        }
    }

    /// Submits one captured frame.
    ///
    /// The first `warm_up_frames` frames are skipped without touching the
    /// output buffer; each later frame is converted into the reusable
    /// bitmap, timed, and presented to the sink.
    pub fn submit(&mut self, frame: &PlanarFrame) -> Result<FrameStatus> {
        if self.skipped < self.config.warm_up_frames {
            self.skipped += 1;
            debug!(skipped = self.skipped, "warm-up frame skipped");
            return Ok(FrameStatus::WarmingUp);
        }

        if self.config.require_accelerated && !accelerated_supported() {
            return Err(EngineError::UnsupportedAcceleration);
        }
        let use_accelerated = self.config.use_accelerated || self.config.require_accelerated;

        let out = self.cache.acquire(frame.width, frame.height);
        let timer = Timer::start();
        convert::yuv_to_rgba(frame, out, use_accelerated)?;
        let elapsed = timer.stop();
        self.average.record(elapsed);

        self.sink.present(out)?;
        debug!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "frame processed"
        );
        Ok(FrameStatus::Processed)
    }

    /// Rolling average conversion time in milliseconds, `None` until the
    /// first post-warm-up frame. Informational only.
    pub fn average_ms(&self) -> Option<f64> {
        self.average.average_ms()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &FrameBufferReuseCache {
        &self.cache
    }

    /// Ends the session, releasing the reusable buffer and returning the
    /// sink to the caller.
    pub fn finish(mut self) -> S {
        self.cache.release();
        if let Some(average) = self.average.average_ms() {
            info!(average_ms = average, "streaming session finished");
        }
        self.sink
    }
}
