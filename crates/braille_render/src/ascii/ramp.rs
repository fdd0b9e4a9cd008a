use serde::Serialize;

use crate::profile::Profile;

const SHORT: &[char] = &['⠀', '⣀', '⣂', '⣆', '⣇', '⣻', '⣿'];

const BALANCED: &[char] = &['⠀', '⠁', '⠂', '⠃', '⠇', '⠏', '⠟', '⠿', '⡿', '⣿'];

const DETAILED: &[char] = &[
    '⠀', '⠁', '⠂', '⠃', '⠆', '⠇', '⠏', '⠗', '⠟', '⠯', '⠿', '⡿', '⢿', '⣻', '⣽', '⣾', '⣿',
];

/// Ordered glyph sequence used for quantization.
///
/// Index 0 is the empty cell (no raised dots) and the last index is the full cell; brighter
/// samples map to denser glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterRamp {
    profile: Profile,
    glyphs: &'static [char],
}

impl CharacterRamp {
    pub fn for_profile(profile: Profile) -> Self {
        let glyphs = match profile {
            Profile::Small => SHORT,
            Profile::Medium => BALANCED,
            Profile::Large => DETAILED,
        };
        Self { profile, glyphs }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn max_index(&self) -> usize {
        self.glyphs.len() - 1
    }

    pub fn glyphs(&self) -> &'static [char] {
        self.glyphs
    }

    /// Glyph at `index`, saturating at the densest glyph.
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.max_index())]
    }

    pub fn description(&self) -> &'static str {
        match self.profile {
            Profile::Small => "High contrast, silhouette focused",
            Profile::Medium => "Balance between shape and detail",
            Profile::Large => "Maximum detail with smooth gradients",
        }
    }

    pub fn info(&self) -> RampInfo {
        RampInfo {
            profile: self.profile,
            description: self.description(),
            length: self.len(),
            glyphs: self.glyphs.to_vec(),
        }
    }
}

/// Introspectable description of a ramp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RampInfo {
    pub profile: Profile,
    pub description: &'static str,
    pub length: usize,
    pub glyphs: Vec<char>,
}

pub fn select_ramp(width: u32) -> CharacterRamp {
    CharacterRamp::for_profile(Profile::for_width(width))
}

pub fn describe_ramp(width: u32) -> RampInfo {
    select_ramp(width).info()
}
