//! Pure image resize + re-encode step.
//!
//! No side effects: bytes in, bytes out. Decoding format is auto-detected;
//! the output format must be one of webp/jpg/jpeg/png.

use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageFormat;

use crate::MediaError;

/// How the source image is fitted into the target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Fill the target exactly, cropping overflow (output is width x height).
    Cover,
    /// Fit within the target, preserving aspect ratio (output may be smaller).
    Contain,
}

impl ImageFit {
    /// Parse a fit name; unknown names fall back to `Cover`, matching the
    /// callers' default.
    pub fn parse(s: &str) -> Self {
        match s {
            "contain" => ImageFit::Contain,
            _ => ImageFit::Cover,
        }
    }
}

/// Supported re-encode targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Webp,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Parse a format name. `jpg` and `jpeg` are synonyms.
    pub fn parse(s: &str) -> Result<Self, MediaError> {
        match s {
            "webp" => Ok(OutputFormat::Webp),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(MediaError::InvalidFormat(other.to_string())),
        }
    }

    fn to_image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Webp => ImageFormat::WebP,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}

/// Resize the image in `bytes` to the target dimensions and re-encode it.
pub fn resize_and_optimize(
    bytes: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
    fit: ImageFit,
) -> Result<Vec<u8>, MediaError> {
    let img = image::load_from_memory(bytes)?;

    let resized = match fit {
        ImageFit::Cover => img.resize_to_fill(width, height, FilterType::Lanczos3),
        ImageFit::Contain => img.resize(width, height, FilterType::Lanczos3),
    };

    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format.to_image_format())?;
    Ok(out.into_inner())
}
