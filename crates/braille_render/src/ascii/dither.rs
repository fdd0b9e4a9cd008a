//! Glyph quantization with optional Floyd-Steinberg error diffusion.
//!
//! Samples are mapped to ramp indices through a power curve: `index = (v / 255)^power * max`.
//! A power below one widens the index range given to dark input, above one widens the range given
//! to bright input. With a non-zero strength the residual of every decision is pushed onto the
//! not yet visited neighbors, so average tone survives even with few glyphs.

use rayon::prelude::*;

use super::grid::GlyphIndexGrid;
use crate::image_pipeline::luminance::{sanitize_sample, LuminanceGrid, MAX_LUMA};

/// Floyd-Steinberg weights as `(dx, dy, numerator)` over [`FLOYD_STEINBERG_DIVISOR`].
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: [(i64, i64, f32); 4] =
    [(1, 0, 7.0), (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0)];
pub const FLOYD_STEINBERG_DIVISOR: f32 = 16.0;

/// Clamp a scaled curve value to a valid index. NaN maps to 0, +inf to `max_index`.
#[inline]
fn sanitize_index(scaled: f32, max_index: usize) -> usize {
    if scaled.is_nan() {
        0
    } else {
        (scaled.clamp(0.0, max_index as f32) as usize).min(max_index)
    }
}

/// Ramp index chosen for a single sample.
#[inline]
pub fn curve_index(sample: f32, power: f32, max_index: usize) -> usize {
    let normalized = sanitize_sample(sample) / MAX_LUMA;
    sanitize_index(normalized.powf(power) * max_index as f32, max_index)
}

/// Luminance represented by a ramp index.
#[inline]
fn index_luminance(index: usize, max_index: usize) -> f32 {
    if max_index == 0 {
        0.0
    } else {
        index as f32 / max_index as f32 * MAX_LUMA
    }
}

/// Add `error` to the unvisited neighbors of `(x, y)`, skipping any outside the grid.
pub(crate) fn diffuse_error(
    samples: &mut [f32],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    error: f32,
) {
    for (dx, dy, weight) in FLOYD_STEINBERG {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx < 0 || nx >= width as i64 || ny >= height as i64 {
            continue;
        }
        samples[ny as usize * width + nx as usize] += error * weight / FLOYD_STEINBERG_DIVISOR;
    }
}

/// Quantize a luminance grid to indices in `[0, levels - 1]`.
///
/// `strength` is clamped to `[0, 1]`. At zero every cell is decided independently (and in
/// parallel); otherwise the grid is scanned top-to-bottom, left-to-right and `strength` times the
/// quantization error is diffused forward. The grid is consumed as the diffusion buffer.
pub fn quantize(grid: LuminanceGrid, levels: usize, power: f32, strength: f32) -> GlyphIndexGrid {
    let (width, height) = (grid.width(), grid.height());
    let max_index = levels.max(1) - 1;
    let strength = if strength.is_nan() { 0.0 } else { strength.clamp(0.0, 1.0) };

    if strength == 0.0 {
        let indices =
            grid.samples().par_iter().map(|&v| curve_index(v, power, max_index)).collect();
        return GlyphIndexGrid::new(width, height, indices);
    }

    let (w, h) = (width as usize, height as usize);
    let mut samples = grid.into_samples();
    let mut indices = vec![0; samples.len()];

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let sample = sanitize_sample(samples[idx]);
            let index = curve_index(sample, power, max_index);
            indices[idx] = index;

            let error = (sample - index_luminance(index, max_index)) * strength;
            diffuse_error(&mut samples, w, h, x, y, error);
        }
    }

    GlyphIndexGrid::new(width, height, indices)
}
