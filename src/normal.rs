//! Tangent-space normal maps from a finished color buffer.
//!
//! The red channel is read as height. Each output pixel stores the horizontal slope in red and the
//! vertical slope in green, remapped from a signed difference to `127 + (before - after)` and
//! clamped to `0..=255`. Blue and alpha are always 255, so a flat region reads `(127, 127, 255,
//! 255)`.
//!
//! Horizontally, the first pixel of a row takes a forward difference, the last pixel a backward
//! difference, and every other pixel a centered one. Vertically the same three cases apply, but
//! the step between rows and both edge thresholds are measured in multiples of the buffer
//! *height*: the step is `4 * height` bytes, the top edge is every byte index below
//! `4 * height` and the bottom edge every index above `4 * height * (height - 1)`. On square
//! buffers this is the ordinary row stride. On non-square buffers the vertical samples drift off
//! the true column, which is the established look of these textures and is kept as is.
//!
//! A sample that lands outside the buffer reads as the pixel being computed. The bottom edge test
//! is strict, so the first pixel of the last row of a square buffer takes a centered difference
//! and reaches one row past the end; tall or one-pixel-wide buffers reach further. Reading the
//! center pixel instead keeps a uniform buffer flat everywhere.

const FLAT: i32 = 127;

/// Computes a normal map from packed RGBA bytes (`4 * width * height` of them).
///
/// # Panics
///
/// Panics if `source` is shorter than `4 * width * height` bytes.
pub fn synthesize(source: &[u8], width: usize, height: usize) -> Vec<u8> {
    let len = width * height * 4;
    assert!(source.len() >= len, "source buffer too short");
    let source = &source[..len];

    let row = width * 4;
    let step = height * 4;
    let bottom = height * height.saturating_sub(1) * 4;
    let mut out = vec![0u8; len];
    for i in (0..len).step_by(4) {
        let sample = |j: usize| i32::from(*source.get(j).unwrap_or(&source[i]));

        let (x1, x2) = if i % row == 0 {
            (sample(i), sample(i + 4))
        } else if i % row == row - 4 {
            (sample(i - 4), sample(i))
        } else {
            (sample(i - 4), sample(i + 4))
        };

        let (y1, y2) = if i < step {
            (sample(i), sample(i + step))
        } else if i > bottom {
            (sample(i - step), sample(i))
        } else {
            (sample(i - step), sample(i + step))
        };

        out[i] = slope(x1, x2);
        out[i + 1] = slope(y1, y2);
        out[i + 2] = 255;
        out[i + 3] = 255;
    }
    out
}

fn slope(before: i32, after: i32) -> u8 {
    (before - after + FLAT).clamp(0, 255) as u8
}
