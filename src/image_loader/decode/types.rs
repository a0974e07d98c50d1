//! Decoded image types

use crate::image_loader::common::error::{LoadError, Result};

/// Bytes per pixel in every raster the loader hands out
pub const RGB_CHANNELS: usize = 3;

/// PNG color type as declared in the IHDR chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKind {
    Grayscale,
    Rgb,
    Indexed,
    GrayscaleAlpha,
    Rgba,
}

impl ColorKind {
    /// Maps the raw IHDR color type byte, rejecting reserved values.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(ColorKind::Grayscale),
            2 => Ok(ColorKind::Rgb),
            3 => Ok(ColorKind::Indexed),
            4 => Ok(ColorKind::GrayscaleAlpha),
            6 => Ok(ColorKind::Rgba),
            other => Err(LoadError::UnsupportedFormat(format!("color type {}", other))),
        }
    }

    /// Samples per pixel before any transformation
    pub fn channels(self) -> u8 {
        match self {
            ColorKind::Grayscale | ColorKind::Indexed => 1,
            ColorKind::GrayscaleAlpha => 2,
            ColorKind::Rgb => 3,
            ColorKind::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, ColorKind::GrayscaleAlpha | ColorKind::Rgba)
    }

    pub fn is_gray(self) -> bool {
        matches!(self, ColorKind::Grayscale | ColorKind::GrayscaleAlpha)
    }
}

impl From<png::ColorType> for ColorKind {
    fn from(color_type: png::ColorType) -> Self {
        match color_type {
            png::ColorType::Grayscale => ColorKind::Grayscale,
            png::ColorType::Rgb => ColorKind::Rgb,
            png::ColorType::Indexed => ColorKind::Indexed,
            png::ColorType::GrayscaleAlpha => ColorKind::GrayscaleAlpha,
            png::ColorType::Rgba => ColorKind::Rgba,
        }
    }
}

/// Header metadata of the encoded image, as reported by the decoder
#[derive(Debug, Clone, PartialEq)]
pub struct SourceHeader {
    pub width: u32,
    pub height: u32,
    /// Bits per sample (1, 2, 4, 8 or 16)
    pub bit_depth: u8,
    pub color: ColorKind,
    /// Encoding gamma from the gAMA chunk (e.g. 0.45455)
    pub gamma: Option<f64>,
    /// Whether a tRNS chunk was present
    pub has_transparency: bool,
}

impl SourceHeader {
    pub fn from_info(info: &png::Info<'_>) -> Self {
        Self {
            width: info.width,
            height: info.height,
            bit_depth: info.bit_depth as u8,
            color: info.color_type.into(),
            gamma: info
                .source_gamma
                .map(|g| f64::from(g.into_scaled()) / 100_000.0),
            has_transparency: info.trns.is_some(),
        }
    }
}

/// Fully decoded texture: 8-bit RGB, row-major, top-to-bottom, no row padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRaster {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Interleaved samples [R, G, B, R, G, B, ...], `width * height * 3` bytes
    pub data: Vec<u8>,
}

impl DecodedRaster {
    pub fn row_bytes(&self) -> usize {
        self.width as usize * RGB_CHANNELS
    }

    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.row_bytes();
        self.data.get(start..start + self.row_bytes())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let at = x as usize * RGB_CHANNELS;
        Some([row[at], row[at + 1], row[at + 2]])
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
