#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;
use texture_loader::image_loader::{DecodedRaster, ImageLoader, LoaderConfig, Result};

/// Options applied to the encoder before the header is written
#[derive(Default)]
pub struct EncodeOptions {
    pub palette: Option<Vec<u8>>,
    pub trns: Option<Vec<u8>>,
    pub gamma: Option<f32>,
}

pub fn encode_png(
    width: u32,
    height: u32,
    color: png::ColorType,
    depth: png::BitDepth,
    data: &[u8],
    options: EncodeOptions,
) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        if let Some(palette) = options.palette {
            encoder.set_palette(palette);
        }
        if let Some(trns) = options.trns {
            encoder.set_trns(trns);
        }
        if let Some(gamma) = options.gamma {
            encoder.set_source_gamma(png::ScaledFloat::new(gamma));
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }
    bytes
}

pub fn encode_rgb8(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    encode_png(
        width,
        height,
        png::ColorType::Rgb,
        png::BitDepth::Eight,
        data,
        EncodeOptions::default(),
    )
}

/// A PNG written to a temporary asset directory
pub struct Asset {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Asset {
    pub fn new(bytes: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TextureMap.png");
        std::fs::write(&path, bytes).unwrap();
        Self { _dir: dir, path }
    }

    pub fn config(&self) -> LoaderConfig {
        LoaderConfig::builder().asset_path(&self.path).build()
    }

    pub fn load(&self) -> Result<DecodedRaster> {
        ImageLoader::new(self.config()).load_image()
    }
}

pub fn load_bytes(bytes: &[u8]) -> Result<DecodedRaster> {
    Asset::new(bytes).load()
}

/// CRC-32 (ISO-HDLC) as used for PNG chunk checksums
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

/// Overwrites bytes of the IHDR payload and refreshes the chunk CRC so the decoder
/// accepts the chunk itself.
pub fn patch_ihdr(png_bytes: &mut [u8], offset: usize, value: &[u8]) {
    // signature (8) + chunk length (4), then "IHDR" + 13 payload bytes, then the CRC
    let start = 16 + offset;
    png_bytes[start..start + value.len()].copy_from_slice(value);
    let crc = crc32(&png_bytes[12..29]);
    png_bytes[29..33].copy_from_slice(&crc.to_be_bytes());
}
