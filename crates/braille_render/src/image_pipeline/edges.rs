use super::luminance::{sanitize_sample, LuminanceGrid};

/// 3x3 sharpening kernel that strongly boosts local edges. Weights sum to one, so flat regions
/// are left untouched.
pub const EDGE_ENHANCE_KERNEL: [[f32; 3]; 3] =
    [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]];

/// Convolve the grid with [`EDGE_ENHANCE_KERNEL`], replicating border samples.
///
/// The result is sanitized back into `[0, 255]`.
pub fn enhance_edges(grid: &LuminanceGrid) -> LuminanceGrid {
    let width = i64::from(grid.width());
    let mut output = grid.clone();

    for (idx, value) in output.samples_mut().iter_mut().enumerate() {
        let x = idx as i64 % width;
        let y = idx as i64 / width;
        let mut acc = 0.0;
        for (ky, row) in EDGE_ENHANCE_KERNEL.iter().enumerate() {
            for (kx, weight) in row.iter().enumerate() {
                acc += weight * grid.get_clamped(x + kx as i64 - 1, y + ky as i64 - 1);
            }
        }
        *value = sanitize_sample(acc);
    }

    output
}
