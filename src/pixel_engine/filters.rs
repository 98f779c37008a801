//! Still-image filter bank
//!
//! Six filters over interleaved RGBA bitmaps. Every variant writes a fresh
//! output bitmap and leaves the source untouched, which keeps the
//! convolution filters free of read/write aliasing. Convolution sampling
//! uses clamp-to-edge as the single uniform border policy across the bank.

mod convolution;
mod kernel;
mod point;
mod types;

pub use types::FilterKind;

use tracing::debug;

use crate::pixel_engine::common::error::Result;
use crate::pixel_engine::execution::ExecutionPath;
use crate::pixel_engine::frame::InterleavedBitmap;

/// Applies `kind` to `src`, returning a freshly allocated bitmap of the
/// same geometry. The source is never modified.
pub fn apply(
    src: &InterleavedBitmap,
    kind: FilterKind,
    use_accelerated: bool,
) -> Result<InterleavedBitmap> {
    src.validate()?;
    let path = ExecutionPath::resolve(use_accelerated);
    debug!(
        ?kind,
        ?path,
        width = src.width,
        height = src.height,
        "applying filter"
    );

    let mut out = InterleavedBitmap::with_stride(src.width, src.height, src.stride);
    match kind {
        FilterKind::Grayscale => point::grayscale(src, &mut out, path),
        FilterKind::Negative => point::negative(src, &mut out, path),
        FilterKind::Blur { radius, sigma } => {
            let gaussian = kernel::gaussian(radius, sigma)?;
            convolution::per_channel(src, &mut out, &gaussian, path);
        }
        FilterKind::Sharpen => {
            convolution::per_channel(src, &mut out, &kernel::sharpen(), path);
        }
        FilterKind::Emboss => {
            convolution::luma_biased(src, &mut out, &kernel::emboss(), 128.0, path);
        }
        FilterKind::SobelEdge => convolution::sobel_edges(src, &mut out, path),
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_engine::common::error::EngineError;

    /// Deterministic noise bitmap (linear congruential generator).
    fn noise_bitmap(width: usize, height: usize) -> InterleavedBitmap {
        let mut bitmap = InterleavedBitmap::new(width, height);
        let mut state = 0x2545_F491u32;
        for byte in bitmap.data.iter_mut() {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            *byte = (state >> 24) as u8;
        }
        // Keep alpha meaningful rather than noise.
        for y in 0..height {
            for x in 0..width {
                bitmap.data[y * bitmap.stride + x * 4 + 3] = 255;
            }
        }
        bitmap
    }

    fn uniform_bitmap(width: usize, height: usize, rgba: [u8; 4]) -> InterleavedBitmap {
        let mut bitmap = InterleavedBitmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let p = y * bitmap.stride + x * 4;
                bitmap.data[p..p + 4].copy_from_slice(&rgba);
            }
        }
        bitmap
    }

    /// 2x2-block checkerboard, full contrast.
    fn checkerboard(width: usize, height: usize) -> InterleavedBitmap {
        let mut bitmap = InterleavedBitmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let value = if (x / 2 + y / 2) % 2 == 0 { 255 } else { 0 };
                let p = y * bitmap.stride + x * 4;
                bitmap.data[p..p + 4].copy_from_slice(&[value, value, value, 255]);
            }
        }
        bitmap
    }

    /// Mean absolute horizontal gradient of the red channel.
    fn edge_energy(bitmap: &InterleavedBitmap) -> f64 {
        let mut total = 0.0;
        let mut count = 0u32;
        for y in 0..bitmap.height {
            for x in 1..bitmap.width {
                let a = bitmap.pixel(x - 1, y)[0] as f64;
                let b = bitmap.pixel(x, y)[0] as f64;
                total += (a - b).abs();
                count += 1;
            }
        }
        total / count as f64
    }

    fn all_kinds() -> [FilterKind; 6] {
        [
            FilterKind::Grayscale,
            FilterKind::Negative,
            FilterKind::Blur {
                radius: 2,
                sigma: 2.0,
            },
            FilterKind::Sharpen,
            FilterKind::Emboss,
            FilterKind::SobelEdge,
        ]
    }

    #[test]
    fn grayscale_output_is_gray() {
        let src = noise_bitmap(17, 9);
        for use_accelerated in [false, true] {
            let out = apply(&src, FilterKind::Grayscale, use_accelerated).unwrap();
            for y in 0..9 {
                for x in 0..17 {
                    let [r, g, b, _] = out.pixel(x, y);
                    assert_eq!(r, g);
                    assert_eq!(g, b);
                }
            }
        }
    }

    #[test]
    fn negative_is_involutive() {
        let src = noise_bitmap(13, 7);
        for use_accelerated in [false, true] {
            let once = apply(&src, FilterKind::Negative, use_accelerated).unwrap();
            let twice = apply(&once, FilterKind::Negative, use_accelerated).unwrap();
            assert_eq!(twice.data, src.data);
        }
    }

    #[test]
    fn blur_rejects_nonpositive_params() {
        let src = noise_bitmap(8, 8);
        for kind in [
            FilterKind::Blur {
                radius: 0,
                sigma: 2.0,
            },
            FilterKind::Blur {
                radius: -1,
                sigma: 2.0,
            },
            FilterKind::Blur {
                radius: 2,
                sigma: 0.0,
            },
            FilterKind::Blur {
                radius: 2,
                sigma: -1.5,
            },
        ] {
            assert!(matches!(
                apply(&src, kind, false),
                Err(EngineError::InvalidGeometry(_))
            ));
        }
    }

    #[test]
    fn blur_reduces_edge_energy() {
        let src = checkerboard(24, 24);
        let before = edge_energy(&src);
        for use_accelerated in [false, true] {
            let blurred = apply(
                &src,
                FilterKind::Blur {
                    radius: 2,
                    sigma: 2.0,
                },
                use_accelerated,
            )
            .unwrap();
            let after = edge_energy(&blurred);
            assert!(
                after < before,
                "edge energy went from {before} to {after}"
            );
        }
    }

    #[test]
    fn sobel_on_uniform_image_is_zero() {
        let src = uniform_bitmap(19, 11, [120, 64, 200, 255]);
        for use_accelerated in [false, true] {
            let out = apply(&src, FilterKind::SobelEdge, use_accelerated).unwrap();
            for y in 0..11 {
                for x in 0..19 {
                    let [r, g, b, a] = out.pixel(x, y);
                    assert_eq!([r, g, b], [0, 0, 0], "at ({x},{y})");
                    assert_eq!(a, 255);
                }
            }
        }
    }

    #[test]
    fn emboss_on_uniform_image_is_mid_gray_biased() {
        // Uniform luma 100, kernel weights sum to 1, bias 128.
        let src = uniform_bitmap(10, 6, [100, 100, 100, 255]);
        let out = apply(&src, FilterKind::Emboss, false).unwrap();
        for y in 0..6 {
            for x in 0..10 {
                let [r, g, b, _] = out.pixel(x, y);
                assert_eq!([r, g, b], [228, 228, 228]);
            }
        }
    }

    #[test]
    fn execution_paths_agree_within_tolerance() {
        let src = noise_bitmap(21, 13);
        for kind in all_kinds() {
            let scalar = apply(&src, kind, false).unwrap();
            let accelerated = apply(&src, kind, true).unwrap();
            for y in 0..13 {
                for x in 0..21 {
                    let a = scalar.pixel(x, y);
                    let b = accelerated.pixel(x, y);
                    for c in 0..4 {
                        assert!(
                            (a[c] as i32 - b[c] as i32).abs() <= 2,
                            "{kind:?} channel {c} at ({x},{y}): {} vs {}",
                            a[c],
                            b[c]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn alpha_is_preserved() {
        let mut src = noise_bitmap(12, 8);
        for y in 0..8 {
            for x in 0..12 {
                src.data[y * src.stride + x * 4 + 3] = ((x * 20 + y) % 256) as u8;
            }
        }
        for kind in all_kinds() {
            for use_accelerated in [false, true] {
                let out = apply(&src, kind, use_accelerated).unwrap();
                for y in 0..8 {
                    for x in 0..12 {
                        assert_eq!(
                            out.pixel(x, y)[3],
                            src.pixel(x, y)[3],
                            "{kind:?} at ({x},{y})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn source_is_never_modified() {
        let src = noise_bitmap(11, 11);
        let original = src.data.clone();
        for kind in all_kinds() {
            let _ = apply(&src, kind, true).unwrap();
            assert_eq!(src.data, original, "{kind:?}");
        }
    }

    #[test]
    fn degenerate_bitmap_rejected() {
        let bitmap = InterleavedBitmap::new(0, 4);
        assert!(matches!(
            apply(&bitmap, FilterKind::Grayscale, false),
            Err(EngineError::InvalidGeometry(_))
        ));
    }
}
