//! Reusable output buffer keyed by frame geometry

use tracing::debug;

use crate::pixel_engine::frame::InterleavedBitmap;

/// Allocation state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Unallocated,
    Allocated { width: usize, height: usize },
}

/// Owns the single reusable output bitmap of a streaming session.
///
/// The bitmap is reallocated only when the frame geometry changes, which
/// keeps steady-state streaming free of per-frame heap churn. The old
/// buffer is released before the replacement is allocated.
#[derive(Debug, Default)]
pub struct FrameBufferReuseCache {
    bitmap: Option<InterleavedBitmap>,
    allocations: usize,
}

impl FrameBufferReuseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a bitmap matching `width x height`, reusing the held buffer
    /// when the geometry is unchanged since the previous call.
    pub fn acquire(&mut self, width: usize, height: usize) -> &mut InterleavedBitmap {
        let reusable = self
            .bitmap
            .as_ref()
            .is_some_and(|b| b.width == width && b.height == height);
        if !reusable {
            debug!(width, height, "allocating output bitmap");
            // Drop the old buffer before the new allocation.
            self.bitmap = None;
            self.bitmap = Some(InterleavedBitmap::new(width, height));
            self.allocations += 1;
        }
        // The branch above guarantees a buffer with the right geometry.
        self.bitmap
            .get_or_insert_with(|| InterleavedBitmap::new(width, height))
    }

    pub fn state(&self) -> CacheState {
        match &self.bitmap {
            None => CacheState::Unallocated,
            Some(b) => CacheState::Allocated {
                width: b.width,
                height: b.height,
            },
        }
    }

    /// Total allocations performed over the cache lifetime.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Releases the held buffer; the next `acquire` reallocates.
    pub fn release(&mut self) {
        if self.bitmap.take().is_some() {
            debug!("released output bitmap");
        }
    }
}
