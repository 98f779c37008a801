use campix_rs::logger;
use campix_rs::pixel_engine::{
    ChromaPlane, FilterKind, FrameSink, InterleavedBitmap, PipelineConfig, PlanarFrame, Result,
    StreamingPipeline, apply, yuv_to_rgba,
};

use tracing::{error, info};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

/// Stand-in for the display surface: counts presented frames.
struct CountingSink {
    frames: usize,
}

impl FrameSink for CountingSink {
    fn present(&mut self, _bitmap: &InterleavedBitmap) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

struct FrameData {
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
}

/// Synthetic capture frame: a diagonal luma gradient with slowly moving
/// chroma, varying by frame index.
fn synthetic_frame(index: usize) -> FrameData {
    let chroma_cols = WIDTH / 2;
    let chroma_rows = HEIGHT / 2;
    let mut y = vec![0u8; WIDTH * HEIGHT];
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            y[row * WIDTH + col] = ((row + col + index * 3) % 220 + 16) as u8;
        }
    }
    let mut u = vec![0u8; chroma_cols * chroma_rows];
    let mut v = vec![0u8; chroma_cols * chroma_rows];
    for row in 0..chroma_rows {
        for col in 0..chroma_cols {
            u[row * chroma_cols + col] = ((col + index) % 256) as u8;
            v[row * chroma_cols + col] = ((row + index * 2) % 256) as u8;
        }
    }
    FrameData { y, u, v }
}

fn frame(data: &FrameData) -> PlanarFrame<'_> {
    PlanarFrame {
        width: WIDTH,
        height: HEIGHT,
        y: &data.y,
        y_stride: WIDTH,
        u: ChromaPlane {
            data: &data.u,
            row_stride: WIDTH / 2,
            pixel_stride: 1,
        },
        v: ChromaPlane {
            data: &data.v,
            row_stride: WIDTH / 2,
            pixel_stride: 1,
        },
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting campix demo...");

    let config = PipelineConfig::builder()
        .warm_up_frames(50)
        .use_accelerated(true)
        .build();
    let mut pipeline = StreamingPipeline::new(CountingSink { frames: 0 }, config);

    info!("Streaming pipeline initialized");
    info!(
        "Acceleration: {}",
        if pipeline.config().use_accelerated {
            "requested"
        } else {
            "off"
        }
    );

    for index in 0..110 {
        let data = synthetic_frame(index);
        if let Err(e) = pipeline.submit(&frame(&data)) {
            error!("Frame {} failed: {}", index, e);
        }
    }

    if let Some(average) = pipeline.average_ms() {
        info!("Rolling average conversion time: {:.3} ms", average);
    }
    let sink = pipeline.finish();
    info!("Presented {} frames", sink.frames);

    // Still-image pass: convert one frame, then run the whole filter bank.
    let data = synthetic_frame(0);
    let mut bitmap = InterleavedBitmap::new(WIDTH, HEIGHT);
    yuv_to_rgba(&frame(&data), &mut bitmap, true)?;

    let filters = [
        FilterKind::Grayscale,
        FilterKind::Negative,
        FilterKind::Blur {
            radius: 3,
            sigma: 5.0,
        },
        FilterKind::Sharpen,
        FilterKind::Emboss,
        FilterKind::SobelEdge,
    ];
    for kind in filters {
        match apply(&bitmap, kind, true) {
            Ok(_) => info!("Applied {:?}", kind),
            Err(e) => error!("Filter {:?} failed: {}", kind, e),
        }
    }

    Ok(())
}
