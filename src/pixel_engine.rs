//! Camera frame processing engine
//!
//! This module provides a structured approach to real-time frame processing,
//! with separate modules for pixel-format conversion, still-image filters,
//! and streaming orchestration.

pub mod common;
pub mod convert;
pub mod execution;
pub mod filters;
pub mod frame;
pub mod streaming;

pub use common::{
    EngineError,
    Result,
};

pub use frame::{
    ChromaPlane,
    InterleavedBitmap,
    PlanarFrame,
};

pub use convert::yuv_to_rgba;

pub use execution::{
    ExecutionPath,
    accelerated_supported,
};

pub use filters::{
    FilterKind,
    apply,
};

pub use streaming::{
    CacheState,
    FrameBufferReuseCache,
    FrameSink,
    FrameStatus,
    PipelineConfig,
    PipelineConfigBuilder,
    RollingAverage,
    StreamingPipeline,
    Timer,
};
