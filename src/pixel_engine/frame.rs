//! Frame buffer types
//!
//! Borrowed planar input descriptors and owned interleaved RGBA bitmaps.

pub mod types;

pub use types::{BYTES_PER_PIXEL, ChromaPlane, InterleavedBitmap, PlanarFrame};
