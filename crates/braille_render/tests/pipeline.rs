//! End-to-end tests for the adaptive renderer.
//!
//! These drive the public API the way a caller would:
//! - Profile and ramp agreement across widths
//! - Boundary scenarios on flat grey input
//! - Index range under adversarial input
//! - Decode and validation failures
//! - Metadata shape

use std::io::Cursor;

use braille_render::*;
use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma, Rgb, RgbImage};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn flat_gray(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
}

fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png).unwrap();
    bytes
}

fn assert_well_formed(output: &RenderOutput, ramp: CharacterRamp) {
    assert!(output.grid.indices.iter().all(|&index| index < ramp.len()));
    let lines: Vec<&str> = output.text.split('\n').collect();
    assert_eq!(lines.len(), output.grid.height as usize);
    for line in lines {
        assert_eq!(line.chars().count(), output.grid.width as usize);
        assert!(line.chars().all(|ch| ramp.glyphs().contains(&ch)));
    }
}

// ==================== Profile Selection Tests ====================

#[test]
fn test_ramp_and_parameter_profiles_agree() {
    for width in [1, 15, 39, 40, 41, 89, 90, 91, 200, 500] {
        assert_eq!(select_ramp(width).profile(), select_parameters(width).profile);
        assert_eq!(describe_ramp(width).profile, select_parameters(width).profile);
    }
}

#[test]
fn test_describe_ramp_length_round_trip() {
    for width in [1, 39, 40, 89, 90, 500] {
        assert_eq!(describe_ramp(width).length, select_ramp(width).len());
    }
}

// ==================== Boundary Scenario Tests ====================

#[test]
fn test_large_profile_dithers_flat_gray() {
    let output = AsciiRenderer.render(&flat_gray(50, 50, 128), 100, true).unwrap();
    let metadata = output.metadata.as_ref().unwrap();

    assert_eq!(metadata.profile, Profile::Large);
    assert_eq!(metadata.dithering_strength, 1.0);
    assert_eq!(output.grid.width, 100);
    assert_eq!(output.grid.height, 52);
    assert!(output.grid.distinct() >= 2, "full diffusion should mix neighboring glyphs");
    assert_well_formed(&output, select_ramp(100));
}

#[test]
fn test_small_profile_keeps_flat_gray_uniform() {
    let output = AsciiRenderer.render(&flat_gray(50, 50, 128), 20, true).unwrap();
    let metadata = output.metadata.as_ref().unwrap();

    assert_eq!(metadata.profile, Profile::Small);
    assert_eq!(metadata.mode, Mode::Forma);
    assert_eq!(metadata.parameters.posterize_levels, 5);
    assert_eq!(output.grid.width, 20);
    assert_eq!(output.grid.height, 13);
    assert_eq!(output.grid.distinct(), 1);
    assert_eq!(output.grid.indices[0], 2);
    assert_well_formed(&output, select_ramp(20));
}

#[test]
fn test_zero_width_is_rejected() {
    let result = AsciiRenderer.render(&flat_gray(50, 50, 128), 0, false);
    assert!(matches!(result, Err(RenderError::InvalidWidth)));
}

#[test]
fn test_empty_grid_is_rejected() {
    let empty = LuminanceGrid::filled(0, 12, 0.0);
    let result = AsciiRenderer.render_luminance(empty, 40, false);
    assert!(matches!(result, Err(RenderError::EmptySource { width: 0, height: 12 })));
}

// ==================== Numeric Safety Tests ====================

#[test]
fn test_random_images_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..24 {
        let width = rng.gen_range(1..48);
        let height = rng.gen_range(1..48);
        let image = RgbImage::from_fn(width, height, |_, _| Rgb(rng.gen()));
        let requested = rng.gen_range(1..160);

        let output = AsciiRenderer.render(&DynamicImage::ImageRgb8(image), requested, false).unwrap();
        assert_eq!(output.grid.width, requested);
        assert_well_formed(&output, select_ramp(requested));
    }
}

#[test]
fn test_adversarial_grids_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut spike = vec![0.0; 30 * 30];
    spike[465] = f32::MAX;
    let noisy: Vec<f32> = (0..30 * 30)
        .map(|_| match rng.gen_range(0..4) {
            0 => f32::NAN,
            1 => f32::INFINITY,
            2 => f32::NEG_INFINITY,
            _ => rng.gen_range(-1e6..1e6),
        })
        .collect();

    let grids = [
        LuminanceGrid::filled(30, 30, 0.0),
        LuminanceGrid::filled(30, 30, 255.0),
        LuminanceGrid::from_samples(30, 30, spike).unwrap(),
        LuminanceGrid::from_samples(30, 30, noisy).unwrap(),
    ];

    for grid in grids {
        for width in [5, 39, 40, 89, 90, 150] {
            let output = AsciiRenderer.render_luminance(grid.clone(), width, false).unwrap();
            assert_well_formed(&output, select_ramp(width));
        }
    }
}

#[test]
fn test_pointwise_quantization_is_order_independent() {
    let mut rng = StdRng::seed_from_u64(42);
    let samples: Vec<f32> = (0..64 * 40).map(|_| rng.gen_range(0.0..255.0)).collect();
    let grid = LuminanceGrid::from_samples(64, 40, samples.clone()).unwrap();

    let quantized = quantize(grid, 7, 1.5, 0.0);
    for (i, &sample) in samples.iter().enumerate().rev() {
        assert_eq!(quantized.indices[i], curve_index(sample, 1.5, 6));
    }
}

// ==================== Decode Tests ====================

#[test]
fn test_render_bytes_round_trip() {
    let bytes = encode_png(&flat_gray(80, 40, 30));
    let output = AsciiRenderer.render_bytes(&bytes, &DecodeLimits::default(), 60, false).unwrap();
    assert_eq!(output.grid.width, 60);
    assert_well_formed(&output, select_ramp(60));
}

#[test]
fn test_render_bytes_reports_distinct_failures() {
    let limits = DecodeLimits::default();

    let err = AsciiRenderer.render_bytes(b"\x89PNG garbage", &limits, 60, false).unwrap_err();
    assert!(matches!(err, AsciiError::Decode(DecodeError::Malformed(_))));

    let err = AsciiRenderer.render_bytes(&encode_png(&flat_gray(5, 5, 0)), &limits, 60, false);
    assert!(matches!(err, Err(AsciiError::Decode(DecodeError::TooSmall { .. }))));

    let tight = DecodeLimits { max_dimension: 20, ..limits };
    let err = AsciiRenderer.render_bytes(&encode_png(&flat_gray(21, 21, 0)), &tight, 60, false);
    assert!(matches!(err, Err(AsciiError::Decode(DecodeError::TooLarge { .. }))));

    let err = AsciiRenderer.render_bytes(&encode_png(&flat_gray(21, 21, 0)), &limits, 0, false);
    assert!(matches!(err, Err(AsciiError::Render(RenderError::InvalidWidth))));
}

#[test]
fn test_render_path_missing_file() {
    let err = AsciiRenderer
        .render_path("/nonexistent/braille-render/input.png", &DecodeLimits::default(), 40, false)
        .unwrap_err();
    assert!(matches!(err, AsciiError::Io(_)));
}

// ==================== Metadata Tests ====================

#[test]
fn test_metadata_serializes_profile_names() {
    let output = AsciiRenderer.render(&flat_gray(40, 20, 180), 120, true).unwrap();
    let value = serde_json::to_value(output.metadata.unwrap()).unwrap();

    assert_eq!(value["profile"], "LARGE");
    assert_eq!(value["mode"], "DETALLE");
    assert_eq!(value["output_width"], 120);
    assert_eq!(value["original_width"], 40);
    assert_eq!(value["original_height"], 20);
    assert_eq!(value["parameters"]["profile_name"], "LARGE");
    assert_eq!(value["parameters"]["edge_enhance"], false);
    assert_eq!(value["ramp"]["length"], 17);
    assert_eq!(value["ramp"]["glyphs"].as_array().unwrap().len(), 17);
}

#[test]
fn test_profile_catalogue_serializes() {
    let value = serde_json::to_value(profile_catalogue()).unwrap();
    let names: Vec<&str> =
        value.as_array().unwrap().iter().map(|entry| entry["profile"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["SMALL", "MEDIUM", "LARGE"]);
    assert_eq!(value[1]["mode"], "HIBRIDO");
}
