//! 8-wide vector implementation of the YUV to RGBA transform.
//!
//! Uses the same coefficients and clamping rule as the scalar path; only the
//! computation strategy differs. Any row tail narrower than a full lane is
//! delegated to the scalar routine, which keeps arbitrary odd widths correct.

use wide::i32x8;

use super::scalar;
use crate::pixel_engine::frame::{BYTES_PER_PIXEL, PlanarFrame};

const LANES: usize = 8;

pub(super) fn convert_row(frame: &PlanarFrame, row: usize, dst: &mut [u8]) {
    let width = frame.width;
    let full = width - width % LANES;

    let y_row = &frame.y[row * frame.y_stride..];
    let chroma_row = row / 2;
    let u_row = &frame.u.data[chroma_row * frame.u.row_stride..];
    let v_row = &frame.v.data[chroma_row * frame.v.row_stride..];

    let y_scale = i32x8::splat(scalar::Y_SCALE);
    let v_to_r = i32x8::splat(scalar::V_TO_R);
    let u_to_g = i32x8::splat(scalar::U_TO_G);
    let v_to_g = i32x8::splat(scalar::V_TO_G);
    let u_to_b = i32x8::splat(scalar::U_TO_B);
    let round = i32x8::splat(scalar::ROUND);

    let mut x = 0;
    while x < full {
        let mut luma = [0i32; LANES];
        let mut u = [0i32; LANES];
        let mut v = [0i32; LANES];
        for lane in 0..LANES {
            let col = x + lane;
            let chroma_x = col / 2;
            luma[lane] = y_row[col] as i32;
            u[lane] = u_row[chroma_x * frame.u.pixel_stride] as i32;
            v[lane] = v_row[chroma_x * frame.v.pixel_stride] as i32;
        }

        let c = i32x8::from(luma) - i32x8::splat(scalar::Y_OFFSET);
        let d = i32x8::from(u) - i32x8::splat(scalar::UV_OFFSET);
        let e = i32x8::from(v) - i32x8::splat(scalar::UV_OFFSET);

        let r = (y_scale * c + v_to_r * e + round) >> 8;
        let g = (y_scale * c - u_to_g * d - v_to_g * e + round) >> 8;
        let b = (y_scale * c + u_to_b * d + round) >> 8;

        write_lane(dst, x, r, g, b);
        x += LANES;
    }

    if full < width {
        scalar::convert_span(frame, row, full, width, dst);
    }
}

#[inline]
fn write_lane(dst: &mut [u8], x: usize, r: i32x8, g: i32x8, b: i32x8) {
    let zero = i32x8::splat(0);
    let max = i32x8::splat(255);
    let r = r.max(zero).min(max).to_array();
    let g = g.max(zero).min(max).to_array();
    let b = b.max(zero).min(max).to_array();

    for lane in 0..LANES {
        let px = &mut dst[(x + lane) * BYTES_PER_PIXEL..(x + lane + 1) * BYTES_PER_PIXEL];
        px[0] = r[lane] as u8;
        px[1] = g[lane] as u8;
        px[2] = b[lane] as u8;
        px[3] = 255;
    }
}
