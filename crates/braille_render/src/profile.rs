use serde::Serialize;

/// Output widths below this use the [`Profile::Small`] bundle.
pub const SMALL_WIDTH_LIMIT: u32 = 40;
/// Output widths below this (and at least [`SMALL_WIDTH_LIMIT`]) use [`Profile::Medium`].
pub const MEDIUM_WIDTH_LIMIT: u32 = 90;

/// Width-keyed processing profile.
///
/// Ramp selection and parameter selection both go through [`Profile::for_width`], so the two can
/// never disagree about which bucket a width falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profile {
    Small,
    Medium,
    Large,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Small, Profile::Medium, Profile::Large];

    pub fn for_width(width: u32) -> Self {
        if width < SMALL_WIDTH_LIMIT {
            Profile::Small
        } else if width < MEDIUM_WIDTH_LIMIT {
            Profile::Medium
        } else {
            Profile::Large
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Profile::Small => "SMALL",
            Profile::Medium => "MEDIUM",
            Profile::Large => "LARGE",
        }
    }

    /// Half-open width range covered by this profile. `None` means unbounded.
    pub fn width_range(self) -> (u32, Option<u32>) {
        match self {
            Profile::Small => (0, Some(SMALL_WIDTH_LIMIT)),
            Profile::Medium => (SMALL_WIDTH_LIMIT, Some(MEDIUM_WIDTH_LIMIT)),
            Profile::Large => (MEDIUM_WIDTH_LIMIT, None),
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Profile::Small => Mode::Forma,
            Profile::Medium => Mode::Hibrido,
            Profile::Large => Mode::Detalle,
        }
    }
}

/// Qualitative rendering mode: silhouette emphasis through gradient emphasis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Solid shapes: no dithering, posterized tones.
    Forma,
    /// Partial diffusion, edge enhancement kept.
    Hibrido,
    /// Full diffusion for smooth gradients.
    Detalle,
}

impl Mode {
    /// Only the silhouette mode posterizes before resampling.
    pub fn posterizes(self) -> bool {
        matches!(self, Mode::Forma)
    }
}

/// Immutable parameter bundle chosen once per conversion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProcessingParameters {
    pub gamma: f32,
    pub contrast_boost: f32,
    /// Row compression applied on top of the source aspect ratio, in (0, 1].
    pub aspect_correction: f32,
    pub quantization_power: f32,
    /// Fraction of quantization error diffused, in [0, 1]. Zero disables diffusion.
    pub dithering_strength: f32,
    pub edge_enhance: bool,
    pub posterize_levels: u32,
    #[serde(rename = "profile_name")]
    pub profile: Profile,
    pub mode: Mode,
}

impl ProcessingParameters {
    pub fn for_profile(profile: Profile) -> Self {
        let mode = profile.mode();
        match profile {
            Profile::Small => Self {
                gamma: 1.5,
                contrast_boost: 1.3,
                aspect_correction: 0.65,
                quantization_power: 1.5,
                dithering_strength: 0.0,
                edge_enhance: true,
                posterize_levels: 5,
                profile,
                mode,
            },
            Profile::Medium => Self {
                gamma: 1.2,
                contrast_boost: 1.1,
                aspect_correction: 0.58,
                quantization_power: 1.1,
                dithering_strength: 0.3,
                edge_enhance: true,
                posterize_levels: 7,
                profile,
                mode,
            },
            Profile::Large => Self {
                gamma: 1.0,
                contrast_boost: 1.0,
                aspect_correction: 0.52,
                quantization_power: 0.9,
                dithering_strength: 1.0,
                edge_enhance: false,
                posterize_levels: 12,
                profile,
                mode,
            },
        }
    }

    /// Posterize level count to apply, if the mode posterizes at all.
    pub fn posterize(&self) -> Option<u32> {
        self.mode.posterizes().then_some(self.posterize_levels)
    }
}

/// Select the processing parameters for a requested output width.
pub fn select_parameters(width: u32) -> ProcessingParameters {
    ProcessingParameters::for_profile(Profile::for_width(width))
}
