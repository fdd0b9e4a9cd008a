use image::{DynamicImage, GenericImageView};

/// Largest luminance value a sample may hold at a stage boundary.
pub const MAX_LUMA: f32 = 255.0;

/// Scrub a luminance sample into a finite value in `[0, 255]`.
///
/// NaN and negative infinity become 0, positive infinity becomes 255.
#[inline]
pub fn sanitize_sample(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_LUMA)
    }
}

/// Row-major single-channel grid of floating point luminance samples.
#[derive(Clone, Debug, PartialEq)]
pub struct LuminanceGrid {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl LuminanceGrid {
    /// Returns `None` when the sample count does not match the dimensions.
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Option<Self> {
        (samples.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            samples,
        })
    }

    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self { width, height, samples: vec![value; width as usize * height as usize] }
    }

    /// Convert a decoded image to luminance using ITU-R BT.601 weights.
    pub fn from_image(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let samples = match image {
            DynamicImage::ImageLuma8(gray) => gray.as_raw().iter().map(|&v| f32::from(v)).collect(),
            other => other
                .to_rgb8()
                .pixels()
                .map(|pixel| {
                    let [r, g, b] = pixel.0;
                    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
                })
                .collect(),
        };
        Self { width, height, samples }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// Clamp-to-edge lookup used by neighborhood filters.
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.get(x, y)
    }

    pub fn sanitize(&mut self) {
        for value in &mut self.samples {
            *value = sanitize_sample(*value);
        }
    }

    pub fn map_in_place(&mut self, f: impl Fn(f32) -> f32) {
        for value in &mut self.samples {
            *value = f(*value);
        }
    }
}
