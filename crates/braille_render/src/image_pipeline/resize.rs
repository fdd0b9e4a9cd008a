use image::{imageops, ImageBuffer, Luma};
use serde::Serialize;

use super::luminance::{LuminanceGrid, MAX_LUMA};

/// Character grid dimensions derived from a source image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TargetGeometry {
    pub columns: u32,
    pub rows: u32,
    /// Row compression applied to compensate for tall glyph cells.
    pub cell_aspect: f32,
}

impl TargetGeometry {
    /// Fixed column count; rows follow the source aspect ratio scaled by `aspect_correction`.
    ///
    /// Returns `None` for a zero-sized source or zero columns.
    pub fn for_columns(
        source_width: u32,
        source_height: u32,
        columns: u32,
        aspect_correction: f32,
    ) -> Option<Self> {
        if source_width == 0 || source_height == 0 || columns == 0 {
            return None;
        }

        let image_ratio = source_height as f32 / source_width as f32;
        let rows = (columns as f32 * image_ratio * aspect_correction).round();
        let rows = if rows.is_finite() { (rows as u32).max(1) } else { 1 };
        Some(TargetGeometry { columns, rows, cell_aspect: aspect_correction })
    }
}

/// Resample a luminance grid onto the target character grid with a Lanczos3 filter.
///
/// Samples are carried through the filter normalized to `[0, 1]` and re-clamped afterwards, so
/// filter ringing never leaves the grid out of range.
pub fn resample(grid: &LuminanceGrid, geometry: TargetGeometry) -> LuminanceGrid {
    let normalized: Vec<f32> = grid.samples().iter().map(|&v| v / MAX_LUMA).collect();
    let Some(buffer) =
        ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(grid.width(), grid.height(), normalized)
    else {
        return LuminanceGrid::filled(geometry.columns, geometry.rows, 0.0);
    };

    let resized =
        imageops::resize(&buffer, geometry.columns, geometry.rows, imageops::FilterType::Lanczos3);
    let samples = resized.into_raw().into_iter().map(|v| v * MAX_LUMA).collect();

    let mut output = LuminanceGrid::from_samples(geometry.columns, geometry.rows, samples)
        .unwrap_or_else(|| LuminanceGrid::filled(geometry.columns, geometry.rows, 0.0));
    output.sanitize();
    output
}
