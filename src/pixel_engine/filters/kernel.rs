//! Convolution kernels and luma weights

use crate::pixel_engine::common::error::{EngineError, Result};
use crate::pixel_engine::frame::{BYTES_PER_PIXEL, InterleavedBitmap};

// BT.601 luma weights in 8-bit fixed point, summing to 256.
pub(super) const LUMA_R: i32 = 77;
pub(super) const LUMA_G: i32 = 150;
pub(super) const LUMA_B: i32 = 29;
pub(super) const LUMA_ROUND: i32 = 128;

/// Square convolution kernel with odd side length `2 * radius + 1`.
#[derive(Debug, Clone)]
pub(super) struct Kernel {
    pub weights: Vec<f32>,
    pub radius: usize,
}

impl Kernel {
    #[inline]
    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    #[inline]
    pub fn weight(&self, ky: usize, kx: usize) -> f32 {
        self.weights[ky * self.side() + kx]
    }
}

/// Gaussian kernel of half-width `radius`, weights normalized to sum 1.
pub(super) fn gaussian(radius: i32, sigma: f32) -> Result<Kernel> {
    if radius <= 0 || sigma <= 0.0 {
        return Err(EngineError::InvalidGeometry(format!(
            "blur radius={radius}, sigma={sigma}"
        )));
    }

    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
    let mut sum = 0.0f32;
    for ky in -radius..=radius {
        for kx in -radius..=radius {
            let d = (kx * kx + ky * ky) as f32;
            let w = (-d / two_sigma_sq).exp();
            weights.push(w);
            sum += w;
        }
    }
    for w in &mut weights {
        *w /= sum;
    }

    Ok(Kernel {
        weights,
        radius: radius as usize,
    })
}

/// Unsharp-mask kernel: center 9, eight -1 neighbors, weights sum 1.
pub(super) fn sharpen() -> Kernel {
    Kernel {
        weights: vec![-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
        radius: 1,
    }
}

/// Directional difference kernel for the relief effect, weights sum 1.
pub(super) fn emboss() -> Kernel {
    Kernel {
        weights: vec![-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0],
        radius: 1,
    }
}

pub(super) const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
pub(super) const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

/// Tightly packed luma plane of the bitmap, used by the gradient filters.
pub(super) fn luma_plane(src: &InterleavedBitmap) -> Vec<u8> {
    let mut luma = Vec::with_capacity(src.width * src.height);
    for y in 0..src.height {
        let row = &src.data[y * src.stride..];
        for x in 0..src.width {
            let p = x * BYTES_PER_PIXEL;
            let value = (LUMA_R * row[p] as i32
                + LUMA_G * row[p + 1] as i32
                + LUMA_B * row[p + 2] as i32
                + LUMA_ROUND)
                >> 8;
            luma.push(value as u8);
        }
    }
    luma
}
