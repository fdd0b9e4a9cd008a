mod ascii;
mod image_pipeline;
mod profile;

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use serde::Serialize;

pub use ascii::{
    dither::{curve_index, quantize, FLOYD_STEINBERG, FLOYD_STEINBERG_DIVISOR},
    grid::GlyphIndexGrid,
    mapping::GlyphMapper,
    ramp::{describe_ramp, select_ramp, CharacterRamp, RampInfo},
};
pub use image_pipeline::{
    adjust::{apply_tone_mapping, percentile, posterize},
    edges::enhance_edges,
    loader::{decode_image, flatten, inspect_image, DecodeError, DecodeLimits, ImageInfo},
    luminance::{sanitize_sample, LuminanceGrid},
    resize::{resample, TargetGeometry},
};
pub use profile::{
    select_parameters, Mode, ProcessingParameters, Profile, MEDIUM_WIDTH_LIMIT, SMALL_WIDTH_LIMIT,
};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("requested width must be a positive number of columns")]
    InvalidWidth,
    #[error("source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum AsciiError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Description of how a conversion was carried out.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderMetadata {
    pub output_width: u32,
    pub output_height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub profile: Profile,
    pub mode: Mode,
    pub dithering_strength: f32,
    pub ramp: RampInfo,
    pub parameters: ProcessingParameters,
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// Rows joined by `\n`.
    pub text: String,
    pub grid: GlyphIndexGrid,
    pub metadata: Option<RenderMetadata>,
}

/// Catalogue entry describing one width profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileInfo {
    pub profile: Profile,
    pub mode: Mode,
    pub width_range: String,
    pub description: &'static str,
    pub ramp: RampInfo,
    pub parameters: ProcessingParameters,
}

/// Every profile with its width range, ramp and parameters.
pub fn profile_catalogue() -> Vec<ProfileInfo> {
    Profile::ALL
        .iter()
        .map(|&profile| {
            let ramp = CharacterRamp::for_profile(profile);
            let width_range = match profile.width_range() {
                (start, Some(end)) => format!("{start}-{}", end - 1),
                (start, None) => format!("{start}+"),
            };
            ProfileInfo {
                profile,
                mode: profile.mode(),
                width_range,
                description: ramp.description(),
                ramp: ramp.info(),
                parameters: ProcessingParameters::for_profile(profile),
            }
        })
        .collect()
}

#[derive(Default)]
pub struct AsciiRenderer;

impl AsciiRenderer {
    pub fn render_path<P: AsRef<Path>>(
        &self,
        path: P,
        limits: &DecodeLimits,
        requested_width: u32,
        include_metadata: bool,
    ) -> Result<RenderOutput, AsciiError> {
        let bytes = std::fs::read(path)?;
        self.render_bytes(&bytes, limits, requested_width, include_metadata)
    }

    /// Decode, validate and render an encoded image.
    pub fn render_bytes(
        &self,
        bytes: &[u8],
        limits: &DecodeLimits,
        requested_width: u32,
        include_metadata: bool,
    ) -> Result<RenderOutput, AsciiError> {
        if requested_width == 0 {
            return Err(RenderError::InvalidWidth.into());
        }

        let image = decode_image(bytes, limits).map_err(|err| {
            log::warn!("rejected input image: {err}");
            err
        })?;
        Ok(self.render(&image, requested_width, include_metadata)?)
    }

    pub fn render(
        &self,
        image: &DynamicImage,
        requested_width: u32,
        include_metadata: bool,
    ) -> Result<RenderOutput, RenderError> {
        if requested_width == 0 {
            return Err(RenderError::InvalidWidth);
        }
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptySource { width, height });
        }

        self.render_luminance(LuminanceGrid::from_image(image), requested_width, include_metadata)
    }

    /// Run the pipeline on an already extracted luminance grid.
    ///
    /// Profile selection, tone mapping (with posterization in silhouette mode), Lanczos
    /// resampling onto the character grid, quantization against the profile's ramp.
    pub fn render_luminance(
        &self,
        luminance: LuminanceGrid,
        requested_width: u32,
        include_metadata: bool,
    ) -> Result<RenderOutput, RenderError> {
        if requested_width == 0 {
            return Err(RenderError::InvalidWidth);
        }

        let (width, height) = (luminance.width(), luminance.height());
        let params = select_parameters(requested_width);
        let ramp = select_ramp(requested_width);
        let geometry =
            TargetGeometry::for_columns(width, height, requested_width, params.aspect_correction)
                .ok_or(RenderError::EmptySource { width, height })?;
        log::debug!(
            "rendering {width}x{height} source as {}x{} cells ({:?}/{:?})",
            geometry.columns,
            geometry.rows,
            params.profile,
            params.mode,
        );

        let mut toned =
            apply_tone_mapping(luminance, params.gamma, params.contrast_boost, params.edge_enhance);
        if let Some(levels) = params.posterize() {
            posterize(&mut toned, levels);
        }

        let resampled = resample(&toned, geometry);
        let grid = quantize(
            resampled,
            ramp.len(),
            params.quantization_power,
            params.dithering_strength,
        );
        let text = GlyphMapper::new(ramp).render_text(&grid);

        let metadata = include_metadata.then(|| RenderMetadata {
            output_width: grid.width,
            output_height: grid.height,
            original_width: width,
            original_height: height,
            profile: params.profile,
            mode: params.mode,
            dithering_strength: params.dithering_strength,
            ramp: ramp.info(),
            parameters: params,
        });

        Ok(RenderOutput { text, grid, metadata })
    }
}
