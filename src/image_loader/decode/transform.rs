//! Format normalization
//!
//! A [`TransformPlan`] records which conversions a given header needs to end up as 8-bit RGB.
//! Committing the plan yields the [`OutputFormat`] the loader validates and sizes buffers from.
//! The `png` crate performs expansion and 16-bit stripping while decoding; alpha stripping,
//! gray-to-RGB and gamma correction run per row through [`RowNormalizer`].

use crate::image_loader::common::error::{LoadError, Result};
use crate::image_loader::decode::types::{ColorKind, SourceHeader, RGB_CHANNELS};

/// Corrections whose combined gamma is this close to 1.0 are not applied.
pub const GAMMA_THRESHOLD: f64 = 0.05;

/// Gamma correction from the file's encoding gamma to the screen gamma
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaCorrection {
    pub file_gamma: f64,
    pub screen_gamma: f64,
}

impl GammaCorrection {
    /// Returns `None` when the correction would be invalid or insignificant.
    pub fn new(file_gamma: f64, screen_gamma: f64) -> Option<Self> {
        let valid = |g: f64| g.is_finite() && g > 0.0;
        if !valid(file_gamma) || !valid(screen_gamma) {
            return None;
        }
        if (file_gamma * screen_gamma - 1.0).abs() < GAMMA_THRESHOLD {
            return None;
        }
        Some(Self { file_gamma, screen_gamma })
    }

    pub fn exponent(&self) -> f64 {
        1.0 / (self.file_gamma * self.screen_gamma)
    }

    pub fn table(&self) -> GammaTable {
        GammaTable::with_exponent(self.exponent())
    }
}

/// 8-bit lookup table for a gamma exponent
#[derive(Clone)]
pub struct GammaTable([u8; 256]);

impl GammaTable {
    pub fn with_exponent(exponent: f64) -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let normalized = i as f64 / 255.0;
            *entry = (255.0 * normalized.powf(exponent) + 0.5).floor().clamp(0.0, 255.0) as u8;
        }
        Self(table)
    }

    #[inline]
    pub fn apply(&self, sample: u8) -> u8 {
        self.0[sample as usize]
    }
}

impl std::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaTable")
            .field("mid", &self.0[128])
            .finish()
    }
}

/// Conversions requested for one image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformPlan {
    pub strip_16: bool,
    pub expand: bool,
    pub strip_alpha: bool,
    pub gray_to_rgb: bool,
    pub gamma: Option<GammaCorrection>,
}

impl TransformPlan {
    pub fn for_header(header: &SourceHeader, screen_gamma: f64) -> Self {
        let mut plan = TransformPlan {
            strip_16: header.bit_depth == 16,
            ..Default::default()
        };

        match header.color {
            ColorKind::Indexed => plan.expand = true,
            ColorKind::GrayscaleAlpha | ColorKind::Grayscale => {
                plan.strip_alpha = header.color.has_alpha();
                plan.expand = header.bit_depth < 8;
                plan.gray_to_rgb = true;
            }
            ColorKind::Rgba => plan.strip_alpha = true,
            ColorKind::Rgb => {}
        }

        // No gAMA chunk means no assumption about the source gamma
        plan.gamma = header
            .gamma
            .and_then(|file_gamma| GammaCorrection::new(file_gamma, screen_gamma));

        plan
    }

    /// Computes the layout the decoded rows will have once every transform has run.
    pub fn commit(&self, header: &SourceHeader) -> Result<OutputFormat> {
        let mut channels = header.color.channels();
        let mut bit_depth = header.bit_depth;

        if self.strip_16 && bit_depth == 16 {
            bit_depth = 8;
        }

        if self.expand {
            match header.color {
                ColorKind::Indexed => {
                    channels = 3;
                    bit_depth = 8;
                }
                ColorKind::Grayscale if bit_depth < 8 => bit_depth = 8,
                _ => {}
            }
            // Expansion turns tRNS into a real alpha channel
            if header.has_transparency
                && matches!(header.color, ColorKind::Indexed | ColorKind::Grayscale)
            {
                channels += 1;
            }
        }

        if self.strip_alpha && header.color.has_alpha() {
            channels -= 1;
        }

        if self.gray_to_rgb {
            channels += 2;
        }

        let row_bytes = (header.width as usize)
            .checked_mul(channels as usize * bit_depth as usize)
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(|| {
                LoadError::OutOfMemory(format!("row of {} pixels overflows", header.width))
            })?;

        Ok(OutputFormat {
            channels,
            bit_depth,
            row_bytes,
        })
    }

    pub fn gamma_table(&self) -> Option<GammaTable> {
        self.gamma.as_ref().map(GammaCorrection::table)
    }
}

/// Row layout after the plan has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub channels: u8,
    pub bit_depth: u8,
    pub row_bytes: usize,
}

/// 8-bit pixel layout the decoder actually writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedLayout {
    pub channels: usize,
    pub gray: bool,
}

impl From<ColorKind> for DecodedLayout {
    fn from(color: ColorKind) -> Self {
        Self {
            channels: color.channels() as usize,
            gray: color.is_gray(),
        }
    }
}

/// Turns decoder rows into RGB rows, dropping alpha and replicating gray.
#[derive(Debug)]
pub struct RowNormalizer {
    layout: DecodedLayout,
    gamma: Option<GammaTable>,
}

impl RowNormalizer {
    pub fn new(layout: DecodedLayout, gamma: Option<GammaTable>) -> Self {
        Self { layout, gamma }
    }

    #[inline]
    fn correct(&self, sample: u8) -> u8 {
        match &self.gamma {
            Some(table) => table.apply(sample),
            None => sample,
        }
    }

    pub fn normalize_row(&self, src: &[u8], dst: &mut [u8]) {
        let pixels = src
            .chunks_exact(self.layout.channels)
            .zip(dst.chunks_exact_mut(RGB_CHANNELS));

        if self.layout.gray {
            for (px, out) in pixels {
                let v = self.correct(px[0]);
                out.copy_from_slice(&[v, v, v]);
            }
        } else {
            for (px, out) in pixels {
                out[0] = self.correct(px[0]);
                out[1] = self.correct(px[1]);
                out[2] = self.correct(px[2]);
            }
        }
    }
}
