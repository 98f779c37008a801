//! Convolution filters: blur, sharpen, emboss, and Sobel edge detection.
//!
//! All sampling is clamp-to-edge: coordinates outside the image are clamped
//! to the nearest valid row or column, so no kernel tap reads past the
//! buffer. The vector path covers interior columns where a full 8-pixel
//! lane needs no horizontal clamping; edge columns and lane tails go
//! through the scalar routine, which keeps arbitrary widths correct.

use rayon::prelude::*;
use wide::f32x8;

use super::kernel::{Kernel, SOBEL_X, SOBEL_Y, luma_plane};
use crate::pixel_engine::execution::ExecutionPath;
use crate::pixel_engine::frame::{BYTES_PER_PIXEL, InterleavedBitmap};

const LANES: usize = 8;

#[inline]
fn clamp_coord(value: isize, len: usize) -> usize {
    value.clamp(0, len as isize - 1) as usize
}

/// Columns `[lane_start, lane_limit)` can start a full lane whose kernel
/// support stays inside the row.
#[inline]
fn lane_bounds(width: usize, radius: usize) -> (usize, usize) {
    (radius, width.saturating_sub(radius + LANES - 1))
}

/// Convolves R, G and B independently with `kernel`; alpha is copied from
/// the source. Used by blur and sharpen.
pub(super) fn per_channel(
    src: &InterleavedBitmap,
    out: &mut InterleavedBitmap,
    kernel: &Kernel,
    path: ExecutionPath,
) {
    let stride = out.stride;
    let width = src.width;
    out.data[..stride * src.height]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| match path {
            ExecutionPath::Scalar => per_channel_span(src, dst, y, 0, width, kernel),
            ExecutionPath::Accelerated => {
                let (lane_start, lane_limit) = lane_bounds(width, kernel.radius);
                per_channel_span(src, dst, y, 0, lane_start.min(width), kernel);
                let mut x = lane_start;
                while x < lane_limit {
                    per_channel_lane(src, dst, y, x, kernel);
                    x += LANES;
                }
                per_channel_span(src, dst, y, x.min(width), width, kernel);
            }
        });
}

fn per_channel_span(
    src: &InterleavedBitmap,
    dst: &mut [u8],
    y: usize,
    x_start: usize,
    x_end: usize,
    kernel: &Kernel,
) {
    let side = kernel.side();
    let radius = kernel.radius as isize;
    let alpha_row = &src.data[y * src.stride..];

    for x in x_start..x_end {
        let mut acc = [0.0f32; 3];
        for ky in 0..side {
            let sy = clamp_coord(y as isize + ky as isize - radius, src.height);
            let row = &src.data[sy * src.stride..];
            for kx in 0..side {
                let sx = clamp_coord(x as isize + kx as isize - radius, src.width);
                let weight = kernel.weight(ky, kx);
                let p = sx * BYTES_PER_PIXEL;
                acc[0] += row[p] as f32 * weight;
                acc[1] += row[p + 1] as f32 * weight;
                acc[2] += row[p + 2] as f32 * weight;
            }
        }
        let p = x * BYTES_PER_PIXEL;
        dst[p] = acc[0].clamp(0.0, 255.0) as u8;
        dst[p + 1] = acc[1].clamp(0.0, 255.0) as u8;
        dst[p + 2] = acc[2].clamp(0.0, 255.0) as u8;
        dst[p + 3] = alpha_row[p + 3];
    }
}

fn per_channel_lane(
    src: &InterleavedBitmap,
    dst: &mut [u8],
    y: usize,
    x: usize,
    kernel: &Kernel,
) {
    let side = kernel.side();
    let radius = kernel.radius;
    let mut acc = [f32x8::splat(0.0); 3];

    for ky in 0..side {
        let sy = clamp_coord(y as isize + ky as isize - radius as isize, src.height);
        let row = &src.data[sy * src.stride..];
        for kx in 0..side {
            let weight = f32x8::splat(kernel.weight(ky, kx));
            let base = (x + kx - radius) * BYTES_PER_PIXEL;
            let mut ch = [[0.0f32; LANES]; 3];
            for lane in 0..LANES {
                let p = base + lane * BYTES_PER_PIXEL;
                ch[0][lane] = row[p] as f32;
                ch[1][lane] = row[p + 1] as f32;
                ch[2][lane] = row[p + 2] as f32;
            }
            for c in 0..3 {
                acc[c] += f32x8::from(ch[c]) * weight;
            }
        }
    }

    let zero = f32x8::splat(0.0);
    let max = f32x8::splat(255.0);
    let rgb: [[f32; LANES]; 3] =
        std::array::from_fn(|c| acc[c].max(zero).min(max).to_array());
    let alpha_row = &src.data[y * src.stride..];
    for lane in 0..LANES {
        let p = (x + lane) * BYTES_PER_PIXEL;
        dst[p] = rgb[0][lane] as u8;
        dst[p + 1] = rgb[1][lane] as u8;
        dst[p + 2] = rgb[2][lane] as u8;
        dst[p + 3] = alpha_row[p + 3];
    }
}

/// Convolves the luma plane with `kernel`, adds `bias`, and writes the
/// result to every color channel. Used by emboss.
pub(super) fn luma_biased(
    src: &InterleavedBitmap,
    out: &mut InterleavedBitmap,
    kernel: &Kernel,
    bias: f32,
    path: ExecutionPath,
) {
    let luma = luma_plane(src);
    let stride = out.stride;
    let width = src.width;
    out.data[..stride * src.height]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| match path {
            ExecutionPath::Scalar => luma_biased_span(src, &luma, dst, y, 0, width, kernel, bias),
            ExecutionPath::Accelerated => {
                let (lane_start, lane_limit) = lane_bounds(width, kernel.radius);
                luma_biased_span(src, &luma, dst, y, 0, lane_start.min(width), kernel, bias);
                let mut x = lane_start;
                while x < lane_limit {
                    luma_biased_lane(src, &luma, dst, y, x, kernel, bias);
                    x += LANES;
                }
                luma_biased_span(src, &luma, dst, y, x.min(width), width, kernel, bias);
            }
        });
}

#[allow(clippy::too_many_arguments)]
fn luma_biased_span(
    src: &InterleavedBitmap,
    luma: &[u8],
    dst: &mut [u8],
    y: usize,
    x_start: usize,
    x_end: usize,
    kernel: &Kernel,
    bias: f32,
) {
    let side = kernel.side();
    let radius = kernel.radius as isize;
    let alpha_row = &src.data[y * src.stride..];

    for x in x_start..x_end {
        let mut acc = 0.0f32;
        for ky in 0..side {
            let sy = clamp_coord(y as isize + ky as isize - radius, src.height);
            let luma_row = &luma[sy * src.width..];
            for kx in 0..side {
                let sx = clamp_coord(x as isize + kx as isize - radius, src.width);
                acc += luma_row[sx] as f32 * kernel.weight(ky, kx);
            }
        }
        let value = (acc + bias).clamp(0.0, 255.0) as u8;
        let p = x * BYTES_PER_PIXEL;
        dst[p] = value;
        dst[p + 1] = value;
        dst[p + 2] = value;
        dst[p + 3] = alpha_row[p + 3];
    }
}

#[allow(clippy::too_many_arguments)]
fn luma_biased_lane(
    src: &InterleavedBitmap,
    luma: &[u8],
    dst: &mut [u8],
    y: usize,
    x: usize,
    kernel: &Kernel,
    bias: f32,
) {
    let side = kernel.side();
    let radius = kernel.radius;
    let mut acc = f32x8::splat(0.0);

    for ky in 0..side {
        let sy = clamp_coord(y as isize + ky as isize - radius as isize, src.height);
        let luma_row = &luma[sy * src.width..];
        for kx in 0..side {
            let weight = f32x8::splat(kernel.weight(ky, kx));
            let base = x + kx - radius;
            let mut values = [0.0f32; LANES];
            for lane in 0..LANES {
                values[lane] = luma_row[base + lane] as f32;
            }
            acc += f32x8::from(values) * weight;
        }
    }

    let zero = f32x8::splat(0.0);
    let max = f32x8::splat(255.0);
    let values = (acc + f32x8::splat(bias)).max(zero).min(max).to_array();
    let alpha_row = &src.data[y * src.stride..];
    for lane in 0..LANES {
        let p = (x + lane) * BYTES_PER_PIXEL;
        dst[p] = values[lane] as u8;
        dst[p + 1] = values[lane] as u8;
        dst[p + 2] = values[lane] as u8;
        dst[p + 3] = alpha_row[p + 3];
    }
}

/// Sobel gradient magnitude over the luma plane, `sqrt(gx^2 + gy^2)`,
/// written to every color channel as a grayscale edge map.
pub(super) fn sobel_edges(
    src: &InterleavedBitmap,
    out: &mut InterleavedBitmap,
    path: ExecutionPath,
) {
    let luma = luma_plane(src);
    let stride = out.stride;
    let width = src.width;
    out.data[..stride * src.height]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| match path {
            ExecutionPath::Scalar => sobel_span(src, &luma, dst, y, 0, width),
            ExecutionPath::Accelerated => {
                let (lane_start, lane_limit) = lane_bounds(width, 1);
                sobel_span(src, &luma, dst, y, 0, lane_start.min(width));
                let mut x = lane_start;
                while x < lane_limit {
                    sobel_lane(src, &luma, dst, y, x);
                    x += LANES;
                }
                sobel_span(src, &luma, dst, y, x.min(width), width);
            }
        });
}

fn sobel_span(
    src: &InterleavedBitmap,
    luma: &[u8],
    dst: &mut [u8],
    y: usize,
    x_start: usize,
    x_end: usize,
) {
    let alpha_row = &src.data[y * src.stride..];

    for x in x_start..x_end {
        let mut gx = 0.0f32;
        let mut gy = 0.0f32;
        for ky in 0..3 {
            let sy = clamp_coord(y as isize + ky as isize - 1, src.height);
            let luma_row = &luma[sy * src.width..];
            for kx in 0..3 {
                let sx = clamp_coord(x as isize + kx as isize - 1, src.width);
                let value = luma_row[sx] as f32;
                gx += value * SOBEL_X[ky * 3 + kx];
                gy += value * SOBEL_Y[ky * 3 + kx];
            }
        }
        let magnitude = (gx * gx + gy * gy).sqrt().clamp(0.0, 255.0) as u8;
        let p = x * BYTES_PER_PIXEL;
        dst[p] = magnitude;
        dst[p + 1] = magnitude;
        dst[p + 2] = magnitude;
        dst[p + 3] = alpha_row[p + 3];
    }
}

fn sobel_lane(src: &InterleavedBitmap, luma: &[u8], dst: &mut [u8], y: usize, x: usize) {
    let mut gx = f32x8::splat(0.0);
    let mut gy = f32x8::splat(0.0);

    for ky in 0..3 {
        let sy = clamp_coord(y as isize + ky as isize - 1, src.height);
        let luma_row = &luma[sy * src.width..];
        for kx in 0..3 {
            let base = x + kx - 1;
            let mut values = [0.0f32; LANES];
            for lane in 0..LANES {
                values[lane] = luma_row[base + lane] as f32;
            }
            let values = f32x8::from(values);
            gx += values * f32x8::splat(SOBEL_X[ky * 3 + kx]);
            gy += values * f32x8::splat(SOBEL_Y[ky * 3 + kx]);
        }
    }

    let zero = f32x8::splat(0.0);
    let max = f32x8::splat(255.0);
    let magnitude = (gx * gx + gy * gy).sqrt().max(zero).min(max).to_array();
    let alpha_row = &src.data[y * src.stride..];
    for lane in 0..LANES {
        let p = (x + lane) * BYTES_PER_PIXEL;
        dst[p] = magnitude[lane] as u8;
        dst[p + 1] = magnitude[lane] as u8;
        dst[p + 2] = magnitude[lane] as u8;
        dst[p + 3] = alpha_row[p + 3];
    }
}
