//! Texture loading module
//!
//! This module turns the PNG asset shipped with the application into a tightly packed
//! 8-bit RGB raster, with separate modules for PNG decoding, format normalization and
//! loader orchestration.

pub mod common;
pub mod config;
pub mod decode;
mod loader;


pub use common::{
    LoadError,
    Result,
};

pub use config::{
    DEFAULT_ASSET_PATH,
    DEFAULT_SCREEN_GAMMA,
    LoaderConfig,
    LoaderConfigBuilder,
};

pub use decode::{
    ColorKind,
    DecodedRaster,
    PngRasterReader,
    RasterReader,
    SourceHeader,
};

pub use loader::ImageLoader;

/// Loads the bundled texture map with the default configuration.
pub fn load_image() -> Result<DecodedRaster> {
    ImageLoader::new(LoaderConfig::default()).load_image()
}
