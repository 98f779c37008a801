//! Streaming orchestration
//!
//! Sequences conversions over a continuous frame stream with warm-up
//! skipping, output-buffer reuse, and latency smoothing.

mod cache;
mod pipeline;
mod timing;

#[cfg(test)]
mod tests;

pub use cache::{CacheState, FrameBufferReuseCache};
pub use pipeline::{
    FrameSink, FrameStatus, PipelineConfig, PipelineConfigBuilder, StreamingPipeline,
};
pub use timing::{RollingAverage, Timer};
