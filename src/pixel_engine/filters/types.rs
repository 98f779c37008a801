//! Filter variants

/// The closed set of still-image filters.
///
/// Dispatched by a single `match`; the set is small and fixed so no trait
/// object is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// BT.601 luma written to every color channel
    Grayscale,
    /// Per-channel inversion, `255 - value`
    Negative,
    /// Gaussian blur with kernel half-width `radius` and spread `sigma`
    Blur { radius: i32, sigma: f32 },
    /// 3x3 unsharp-mask kernel
    Sharpen,
    /// Directional relief kernel, output biased toward mid-gray
    Emboss,
    /// Sobel gradient magnitude as a grayscale edge map
    SobelEdge,
}
