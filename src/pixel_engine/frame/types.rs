//! Pixel buffer types for planar input and interleaved output

use crate::pixel_engine::common::error::{EngineError, Result};

/// Bytes per output pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// One chroma plane of a 4:2:0 subsampled frame.
///
/// `pixel_stride` is the byte distance between consecutive chroma samples,
/// so the same descriptor covers fully-planar (`1`) and semi-planar
/// interleaved (`2`) layouts.
#[derive(Debug, Clone, Copy)]
pub struct ChromaPlane<'a> {
    /// Raw plane bytes
    pub data: &'a [u8],
    /// Bytes per plane row
    pub row_stride: usize,
    /// Byte distance between consecutive chroma samples in a row
    pub pixel_stride: usize,
}

/// Borrowed descriptor of one camera frame in planar or semi-planar
/// luma-chroma layout with 4:2:0 chroma subsampling.
///
/// The engine never retains a frame beyond the call that consumes it; the
/// planes stay owned by the capture side.
#[derive(Debug, Clone, Copy)]
pub struct PlanarFrame<'a> {
    /// Width of the frame in pixels
    pub width: usize,
    /// Height of the frame in pixels
    pub height: usize,
    /// Luma plane bytes
    pub y: &'a [u8],
    /// Bytes per luma row, may exceed `width` due to alignment padding
    pub y_stride: usize,
    /// First chroma plane
    pub u: ChromaPlane<'a>,
    /// Second chroma plane
    pub v: ChromaPlane<'a>,
}

impl PlanarFrame<'_> {
    /// Checks the stride and size invariants declared by the frame geometry.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidGeometry(format!(
                "width={}, height={}",
                self.width, self.height
            )));
        }

        if self.y_stride < self.width {
            return Err(EngineError::InvalidGeometry(format!(
                "luma row stride {} < width {}",
                self.y_stride, self.width
            )));
        }
        // The last row only needs to reach its last sampled byte; capture
        // buffers commonly stop short of a full trailing stride.
        let y_needed = self.y_stride * (self.height - 1) + self.width;
        if self.y.len() < y_needed {
            return Err(EngineError::BufferTooSmall(format!(
                "luma plane holds {} bytes, geometry needs {}",
                self.y.len(),
                y_needed
            )));
        }

        let chroma_rows = self.height.div_ceil(2);
        for (name, plane) in [("u", &self.u), ("v", &self.v)] {
            if plane.pixel_stride != 1 && plane.pixel_stride != 2 {
                return Err(EngineError::InvalidGeometry(format!(
                    "{name} pixel stride {} not in {{1, 2}}",
                    plane.pixel_stride
                )));
            }
            let last_sample = ((self.width - 1) / 2) * plane.pixel_stride;
            let needed = plane.row_stride * (chroma_rows - 1) + last_sample + 1;
            if plane.data.len() < needed {
                return Err(EngineError::BufferTooSmall(format!(
                    "{name} plane holds {} bytes, geometry needs {}",
                    plane.data.len(),
                    needed
                )));
            }
        }

        Ok(())
    }
}

/// Owned interleaved bitmap, 4 bytes per pixel in R, G, B, A order.
///
/// Mutable and exclusively owned by whichever stage last produced it until
/// handed to the next stage.
#[derive(Debug, Clone)]
pub struct InterleavedBitmap {
    /// Width of the bitmap in pixels
    pub width: usize,
    /// Height of the bitmap in pixels
    pub height: usize,
    /// Bytes per row, at least `width * BYTES_PER_PIXEL`
    pub stride: usize,
    /// Interleaved pixel data
    pub data: Vec<u8>,
}

impl InterleavedBitmap {
    /// Allocates a zeroed bitmap with a packed row stride.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_stride(width, height, width * BYTES_PER_PIXEL)
    }

    /// Allocates a zeroed bitmap with an explicit row stride in bytes.
    pub fn with_stride(width: usize, height: usize, stride: usize) -> Self {
        Self {
            width,
            height,
            stride,
            data: vec![0u8; stride * height],
        }
    }

    /// Checks that the declared geometry is non-degenerate and that the
    /// buffer can hold it.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidGeometry(format!(
                "width={}, height={}",
                self.width, self.height
            )));
        }
        if self.stride < self.width * BYTES_PER_PIXEL {
            return Err(EngineError::InvalidGeometry(format!(
                "row stride {} < width {} * {}",
                self.stride, self.width, BYTES_PER_PIXEL
            )));
        }
        if self.data.len() < self.stride * self.height {
            return Err(EngineError::BufferTooSmall(format!(
                "bitmap holds {} bytes, geometry needs {}",
                self.data.len(),
                self.stride * self.height
            )));
        }
        Ok(())
    }

    /// The R, G, B, A bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = y * self.stride + x * BYTES_PER_PIXEL;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }
}
