use std::io::Cursor;

use image::{
    io::Reader, DynamicImage, GenericImageView, GrayImage, ImageError, Luma, Rgb, RgbImage,
};
use serde::Serialize;

/// Background that transparent pixels are flattened onto.
pub const BACKGROUND: u8 = 255;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid or corrupt image: {0}")]
    Malformed(#[from] ImageError),
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },
    #[error("image too small ({width}x{height} px), minimum is {min}x{min} px")]
    TooSmall { width: u32, height: u32, min: u32 },
    #[error("image too large ({width}x{height} px), maximum is {max}x{max} px")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Bounds enforced before any pixel data is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    pub min_dimension: u32,
    pub max_dimension: u32,
    pub max_bytes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self { min_dimension: 10, max_dimension: 10_000, max_bytes: 10 * 1024 * 1024 }
    }
}

impl DecodeLimits {
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), DecodeError> {
        if width < self.min_dimension || height < self.min_dimension {
            return Err(DecodeError::TooSmall { width, height, min: self.min_dimension });
        }
        if width > self.max_dimension || height > self.max_dimension {
            return Err(DecodeError::TooLarge { width, height, max: self.max_dimension });
        }
        Ok(())
    }
}

fn reader(bytes: &[u8]) -> Result<Reader<Cursor<&[u8]>>, DecodeError> {
    Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| ImageError::IoError(err).into())
}

/// Decode and validate an encoded image.
///
/// Dimensions are read from the header and checked before the pixel data is decoded. The result is
/// either 8-bit luminance or 8-bit RGB; alpha is composited onto a white background.
pub fn decode_image(bytes: &[u8], limits: &DecodeLimits) -> Result<DynamicImage, DecodeError> {
    if bytes.len() > limits.max_bytes {
        return Err(DecodeError::PayloadTooLarge { size: bytes.len(), limit: limits.max_bytes });
    }

    let (width, height) = reader(bytes)?.into_dimensions()?;
    limits.check_dimensions(width, height)?;

    let image = reader(bytes)?.decode()?;
    Ok(flatten(image))
}

/// Reduce any decoded color model to opaque luminance or RGB.
pub fn flatten(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        DynamicImage::ImageLumaA8(gray) => {
            let (width, height) = gray.dimensions();
            let flat = GrayImage::from_fn(width, height, |x, y| {
                let [l, a] = gray.get_pixel(x, y).0;
                Luma([composite(l, a)])
            });
            DynamicImage::ImageLuma8(flat)
        },
        other if other.color().has_alpha() => {
            let rgba = other.to_rgba8();
            let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                let [r, g, b, a] = rgba.get_pixel(x, y).0;
                Rgb([composite(r, a), composite(g, a), composite(b, a)])
            });
            DynamicImage::ImageRgb8(flat)
        },
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

#[inline]
fn composite(value: u8, alpha: u8) -> u8 {
    let alpha = u32::from(alpha);
    ((u32::from(value) * alpha + u32::from(BACKGROUND) * (255 - alpha) + 127) / 255) as u8
}

/// Header-level facts about an encoded image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageInfo {
    pub format: String,
    pub color_type: String,
    pub width: u32,
    pub height: u32,
    pub size_kb: f64,
}

/// Describe an encoded image without validating its bounds.
pub fn inspect_image(bytes: &[u8]) -> Result<ImageInfo, DecodeError> {
    let reader = reader(bytes)?;
    let format = reader.format();
    let image = reader.decode()?;
    let (width, height) = image.dimensions();
    Ok(ImageInfo {
        format: format.map_or_else(|| "Unknown".to_owned(), |format| format!("{format:?}")),
        color_type: format!("{:?}", image.color()),
        width,
        height,
        size_kb: bytes.len() as f64 / 1024.0,
    })
}
