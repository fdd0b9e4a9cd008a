use super::{
    edges,
    luminance::{sanitize_sample, LuminanceGrid, MAX_LUMA},
};

/// Lower percentile used as the black point when stretching contrast.
pub const LOW_PERCENTILE: f32 = 2.0;
/// Upper percentile used as the white point when stretching contrast.
pub const HIGH_PERCENTILE: f32 = 98.0;

/// Percentile of `samples` with linear interpolation between closest ranks.
///
/// Returns 0 for an empty slice.
pub fn percentile(samples: &[f32], pct: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f32> = samples.iter().copied().map(sanitize_sample).collect();
    sorted.sort_unstable_by(f32::total_cmp);

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f32;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Normalize, boost and gamma-correct a luminance grid.
///
/// Order: optional edge enhancement, percentile stretch to `[0, 255]`, contrast boost, gamma.
/// Every step clamps before the next one so the power operation only ever sees values in
/// `[0, 1]`. A grid whose percentile range is empty (flat tone) is only sanitized.
pub fn apply_tone_mapping(
    grid: LuminanceGrid,
    gamma: f32,
    contrast_boost: f32,
    edge_enhance: bool,
) -> LuminanceGrid {
    let mut grid = if edge_enhance { edges::enhance_edges(&grid) } else { grid };
    grid.sanitize();

    let low = percentile(grid.samples(), LOW_PERCENTILE);
    let high = percentile(grid.samples(), HIGH_PERCENTILE);
    log::trace!("tone bounds p{LOW_PERCENTILE}={low:.2} p{HIGH_PERCENTILE}={high:.2}");

    if high <= low {
        return grid;
    }

    let range = high - low;
    grid.map_in_place(|value| {
        let stretched = sanitize_sample((value - low) / range * MAX_LUMA);
        let boosted = sanitize_sample(stretched * contrast_boost);
        let normalized = (boosted / MAX_LUMA).clamp(0.0, 1.0);
        sanitize_sample(normalized.powf(gamma) * MAX_LUMA)
    });

    grid
}

/// Quantize every sample to one of `levels` evenly spaced tones.
///
/// Fewer than two levels leaves the grid untouched.
pub fn posterize(grid: &mut LuminanceGrid, levels: u32) {
    if levels < 2 {
        return;
    }

    let steps = (levels - 1) as f32;
    grid.map_in_place(|value| {
        let level = (sanitize_sample(value) / MAX_LUMA * steps).floor();
        sanitize_sample(level / steps * MAX_LUMA)
    });
}
