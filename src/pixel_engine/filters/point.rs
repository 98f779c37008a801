//! Per-pixel filters: grayscale and negative.
//!
//! Neither filter reads neighboring pixels, so the vector path is a plain
//! 8-pixel-lane sweep with a scalar tail.

use rayon::prelude::*;
use wide::i32x8;

use super::kernel::{LUMA_B, LUMA_G, LUMA_R, LUMA_ROUND};
use crate::pixel_engine::execution::ExecutionPath;
use crate::pixel_engine::frame::{BYTES_PER_PIXEL, InterleavedBitmap};

const LANES: usize = 8;

pub(super) fn grayscale(src: &InterleavedBitmap, out: &mut InterleavedBitmap, path: ExecutionPath) {
    let stride = out.stride;
    let width = src.width;
    out.data[..stride * src.height]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| {
            let row = &src.data[y * src.stride..];
            match path {
                ExecutionPath::Scalar => grayscale_span(row, dst, 0, width),
                ExecutionPath::Accelerated => {
                    let full = width - width % LANES;
                    grayscale_lanes(row, dst, full);
                    grayscale_span(row, dst, full, width);
                }
            }
        });
}

fn grayscale_span(row: &[u8], dst: &mut [u8], x_start: usize, x_end: usize) {
    for x in x_start..x_end {
        let p = x * BYTES_PER_PIXEL;
        let gray = (LUMA_R * row[p] as i32
            + LUMA_G * row[p + 1] as i32
            + LUMA_B * row[p + 2] as i32
            + LUMA_ROUND)
            >> 8;
        dst[p] = gray as u8;
        dst[p + 1] = gray as u8;
        dst[p + 2] = gray as u8;
        dst[p + 3] = row[p + 3];
    }
}

fn grayscale_lanes(row: &[u8], dst: &mut [u8], full: usize) {
    let wr = i32x8::splat(LUMA_R);
    let wg = i32x8::splat(LUMA_G);
    let wb = i32x8::splat(LUMA_B);
    let round = i32x8::splat(LUMA_ROUND);

    let mut x = 0;
    while x < full {
        let mut r = [0i32; LANES];
        let mut g = [0i32; LANES];
        let mut b = [0i32; LANES];
        for lane in 0..LANES {
            let p = (x + lane) * BYTES_PER_PIXEL;
            r[lane] = row[p] as i32;
            g[lane] = row[p + 1] as i32;
            b[lane] = row[p + 2] as i32;
        }

        let gray = ((wr * i32x8::from(r) + wg * i32x8::from(g) + wb * i32x8::from(b) + round)
            >> 8i32)
            .to_array();

        for lane in 0..LANES {
            let p = (x + lane) * BYTES_PER_PIXEL;
            dst[p] = gray[lane] as u8;
            dst[p + 1] = gray[lane] as u8;
            dst[p + 2] = gray[lane] as u8;
            dst[p + 3] = row[p + 3];
        }
        x += LANES;
    }
}

pub(super) fn negative(src: &InterleavedBitmap, out: &mut InterleavedBitmap, path: ExecutionPath) {
    let stride = out.stride;
    let width = src.width;
    out.data[..stride * src.height]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| {
            let row = &src.data[y * src.stride..];
            match path {
                ExecutionPath::Scalar => negative_span(row, dst, 0, width),
                ExecutionPath::Accelerated => {
                    let full = width - width % LANES;
                    negative_lanes(row, dst, full);
                    negative_span(row, dst, full, width);
                }
            }
        });
}

fn negative_span(row: &[u8], dst: &mut [u8], x_start: usize, x_end: usize) {
    for x in x_start..x_end {
        let p = x * BYTES_PER_PIXEL;
        dst[p] = 255 - row[p];
        dst[p + 1] = 255 - row[p + 1];
        dst[p + 2] = 255 - row[p + 2];
        dst[p + 3] = row[p + 3];
    }
}

fn negative_lanes(row: &[u8], dst: &mut [u8], full: usize) {
    let max = i32x8::splat(255);

    let mut x = 0;
    while x < full {
        let mut r = [0i32; LANES];
        let mut g = [0i32; LANES];
        let mut b = [0i32; LANES];
        for lane in 0..LANES {
            let p = (x + lane) * BYTES_PER_PIXEL;
            r[lane] = row[p] as i32;
            g[lane] = row[p + 1] as i32;
            b[lane] = row[p + 2] as i32;
        }

        let r = (max - i32x8::from(r)).to_array();
        let g = (max - i32x8::from(g)).to_array();
        let b = (max - i32x8::from(b)).to_array();

        for lane in 0..LANES {
            let p = (x + lane) * BYTES_PER_PIXEL;
            dst[p] = r[lane] as u8;
            dst[p + 1] = g[lane] as u8;
            dst[p + 2] = b[lane] as u8;
            dst[p + 3] = row[p + 3];
        }
        x += LANES;
    }
}
