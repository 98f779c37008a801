//! Execution path selection
//!
//! A caller-supplied flag picks between the portable scalar implementation
//! and the 8-wide vector implementation of each transform. There is no
//! hardware autodetection in the core contract: the flag travels through
//! every call as an explicit parameter, never global state, so independent
//! pipeline instances can carry different hardware assumptions.

use tracing::warn;

/// One of two functionally-equivalent implementations of the same
/// transform, differing only in computational strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPath {
    /// Portable per-pixel reference implementation
    Scalar,
    /// Vectorized implementation processing 8 pixels per lane
    Accelerated,
}

/// Whether the vector path counts as an acceleration on this target.
///
/// The `wide` types compile everywhere but only lower to real vector
/// instructions on these architectures; elsewhere the "accelerated" path
/// would be scalar emulation.
pub fn accelerated_supported() -> bool {
    cfg!(any(target_arch = "x86_64", target_arch = "aarch64"))
}

impl ExecutionPath {
    /// Resolves the caller's flag, falling back to the scalar path when
    /// acceleration is requested on an unsupported target.
    pub fn resolve(use_accelerated: bool) -> Self {
        if !use_accelerated {
            return Self::Scalar;
        }
        if accelerated_supported() {
            Self::Accelerated
        } else {
            warn!("accelerated path requested but not supported, falling back to scalar");
            Self::Scalar
        }
    }
}
