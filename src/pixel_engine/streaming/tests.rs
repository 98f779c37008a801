use crate::pixel_engine::common::error::{EngineError, Result};
use crate::pixel_engine::frame::{ChromaPlane, InterleavedBitmap, PlanarFrame};
use crate::pixel_engine::streaming::cache::CacheState;
use crate::pixel_engine::streaming::pipeline::{
    FrameSink, FrameStatus, PipelineConfig, StreamingPipeline,
};

struct MockSink {
    presented: Vec<(usize, usize)>,
    should_fail: bool,
}

impl MockSink {
    fn new() -> Self {
        Self {
            presented: Vec::new(),
            should_fail: false,
        }
    }
}

impl FrameSink for MockSink {
    fn present(&mut self, bitmap: &InterleavedBitmap) -> Result<()> {
        if self.should_fail {
            return Err(EngineError::BufferTooSmall("mock sink error".to_string()));
        }
        self.presented.push((bitmap.width, bitmap.height));
        Ok(())
    }
}

struct FrameData {
    width: usize,
    height: usize,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
}

impl FrameData {
    fn new(width: usize, height: usize) -> Self {
        let chroma = width.div_ceil(2) * height.div_ceil(2);
        Self {
            width,
            height,
            y: (0..width * height).map(|i| (i % 256) as u8).collect(),
            u: vec![110u8; chroma],
            v: vec![160u8; chroma],
        }
    }

    fn frame(&self) -> PlanarFrame<'_> {
        let chroma_stride = self.width.div_ceil(2);
        PlanarFrame {
            width: self.width,
            height: self.height,
            y: &self.y,
            y_stride: self.width,
            u: ChromaPlane {
                data: &self.u,
                row_stride: chroma_stride,
                pixel_stride: 1,
            },
            v: ChromaPlane {
                data: &self.v,
                row_stride: chroma_stride,
                pixel_stride: 1,
            },
        }
    }
}

#[test]
fn warm_up_frames_cause_no_conversion() {
    let config = PipelineConfig::builder().warm_up_frames(3).build();
    let mut pipeline = StreamingPipeline::new(MockSink::new(), config);
    let data = FrameData::new(64, 48);

    for _ in 0..3 {
        let status = pipeline.submit(&data.frame()).unwrap();
        assert_eq!(status, FrameStatus::WarmingUp);
    }
    assert_eq!(pipeline.cache().state(), CacheState::Unallocated);
    assert_eq!(pipeline.average_ms(), None);

    let status = pipeline.submit(&data.frame()).unwrap();
    assert_eq!(status, FrameStatus::Processed);
    assert!(pipeline.average_ms().is_some());

    let sink = pipeline.finish();
    assert_eq!(sink.presented, vec![(64, 48)]);
}

#[test]
fn output_buffer_allocated_once_per_geometry() {
    let config = PipelineConfig::builder().warm_up_frames(0).build();
    let mut pipeline = StreamingPipeline::new(MockSink::new(), config);

    let vga = FrameData::new(640, 480);
    let hd = FrameData::new(1280, 720);
    pipeline.submit(&vga.frame()).unwrap();
    pipeline.submit(&vga.frame()).unwrap();
    pipeline.submit(&hd.frame()).unwrap();

    assert_eq!(pipeline.cache().allocations(), 2);
    assert_eq!(
        pipeline.cache().state(),
        CacheState::Allocated {
            width: 1280,
            height: 720
        }
    );

    let sink = pipeline.finish();
    assert_eq!(sink.presented, vec![(640, 480), (640, 480), (1280, 720)]);
}

#[test]
fn sink_failure_propagates() {
    let config = PipelineConfig::builder().warm_up_frames(0).build();
    let mut sink = MockSink::new();
    sink.should_fail = true;
    let mut pipeline = StreamingPipeline::new(sink, config);

    let data = FrameData::new(32, 24);
    let result = pipeline.submit(&data.frame());
    assert!(matches!(result, Err(EngineError::BufferTooSmall(_))));
}

#[test]
fn invalid_frame_rejected_after_warm_up() {
    let config = PipelineConfig::builder().warm_up_frames(0).build();
    let mut pipeline = StreamingPipeline::new(MockSink::new(), config);

    let data = FrameData::new(32, 24);
    let mut frame = data.frame();
    frame.y_stride = 8;
    assert!(matches!(
        pipeline.submit(&frame),
        Err(EngineError::InvalidGeometry(_))
    ));
    // Nothing reached the sink.
    assert!(pipeline.finish().presented.is_empty());
}

#[test]
fn average_smooths_across_frames() {
    let config = PipelineConfig::builder().warm_up_frames(0).build();
    let mut pipeline = StreamingPipeline::new(MockSink::new(), config);
    let data = FrameData::new(96, 64);

    pipeline.submit(&data.frame()).unwrap();
    let seeded = pipeline.average_ms().unwrap();
    assert!(seeded >= 0.0);

    for _ in 0..5 {
        pipeline.submit(&data.frame()).unwrap();
    }
    assert!(pipeline.average_ms().is_some());
}

#[test]
fn accelerated_pipeline_processes_frames() {
    let config = PipelineConfig::builder()
        .warm_up_frames(0)
        .use_accelerated(true)
        .build();
    let mut pipeline = StreamingPipeline::new(MockSink::new(), config);
    let data = FrameData::new(100, 60);

    assert_eq!(
        pipeline.submit(&data.frame()).unwrap(),
        FrameStatus::Processed
    );
}

#[test]
fn config_builder_applies_overrides() {
    let config = PipelineConfig::builder()
        .warm_up_frames(7)
        .smoothing(0.5)
        .use_accelerated(true)
        .require_accelerated(true)
        .build();

    assert_eq!(config.warm_up_frames, 7);
    assert_eq!(config.smoothing, 0.5);
    assert!(config.use_accelerated);
    assert!(config.require_accelerated);

    let default = PipelineConfig::builder().build();
    assert_eq!(default.warm_up_frames, 50);
    assert_eq!(default.smoothing, 0.90);
    assert!(!default.use_accelerated);
    assert!(!default.require_accelerated);
}
