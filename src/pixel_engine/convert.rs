//! YUV to RGBA color conversion
//!
//! Converts a 4:2:0 planar or semi-planar frame into an interleaved RGBA
//! bitmap using the BT.601 studio-swing transform in integer arithmetic:
//!
//! ```text
//! C = Y - 16, D = U - 128, E = V - 128
//! R = (298*C           + 409*E + 128) >> 8
//! G = (298*C - 100*D - 208*E + 128) >> 8
//! B = (298*C + 516*D           + 128) >> 8
//! ```
//!
//! Each channel is clamped to [0, 255] and alpha is written as 255. Both
//! execution paths share the coefficients and the clamping rule; the
//! accelerated path processes eight pixels per vector lane and hands any
//! row tail that does not fill a lane to the scalar routine. Output rows
//! carry no cross-row state, so rows are converted in parallel.

mod scalar;
mod simd;

use rayon::prelude::*;
use tracing::debug;

use crate::pixel_engine::common::error::{EngineError, Result};
use crate::pixel_engine::execution::ExecutionPath;
use crate::pixel_engine::frame::{InterleavedBitmap, PlanarFrame};

/// Converts `frame` into `out`, which must already match the frame geometry.
///
/// Validation happens before any byte is written: on failure the output
/// bitmap is left untouched.
pub fn yuv_to_rgba(
    frame: &PlanarFrame,
    out: &mut InterleavedBitmap,
    use_accelerated: bool,
) -> Result<()> {
    frame.validate()?;
    out.validate()?;
    if out.width != frame.width || out.height != frame.height {
        return Err(EngineError::InvalidGeometry(format!(
            "output {}x{} does not match frame {}x{}",
            out.width, out.height, frame.width, frame.height
        )));
    }

    let path = ExecutionPath::resolve(use_accelerated);
    debug!(
        width = frame.width,
        height = frame.height,
        ?path,
        "converting frame"
    );

    let stride = out.stride;
    let height = frame.height;
    out.data[..stride * height]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(row, dst)| match path {
            ExecutionPath::Scalar => scalar::convert_span(frame, row, 0, frame.width, dst),
            ExecutionPath::Accelerated => simd::convert_row(frame, row, dst),
        });

    Ok(())
}
