use std::fs::File;
use std::io::BufReader;

use tracing::{info, instrument};

use crate::image_loader::{
    common::error::{LoadError, Result},
    config::LoaderConfig,
    decode::{DecodedRaster, PngRasterReader, RasterReader},
    decode::types::RGB_CHANNELS,
};

pub struct ImageLoader<R: RasterReader> {
    reader: R,
    config: LoaderConfig,
}

impl ImageLoader<PngRasterReader> {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            reader: PngRasterReader,
            config,
        }
    }
}

impl<R: RasterReader> ImageLoader<R> {
    pub fn with_custom(reader: R, config: LoaderConfig) -> Self {
        Self { reader, config }
    }

    fn validate_raster(&self, raster: &DecodedRaster) -> Result<()> {
        let expected = (raster.width as usize)
            .checked_mul(raster.height as usize)
            .and_then(|pixels| pixels.checked_mul(RGB_CHANNELS));
        if expected != Some(raster.data.len()) {
            return Err(LoadError::DecodeError(format!(
                "{}x{} raster carries {} bytes",
                raster.width,
                raster.height,
                raster.data.len()
            )));
        }

        Ok(())
    }

    /// Opens the configured asset and decodes it to packed RGB.
    ///
    /// The file handle and all decoder state are released before this returns, whatever
    /// the outcome.
    #[instrument(skip(self), fields(path = %self.config.asset_path.display()))]
    pub fn load_image(&self) -> Result<DecodedRaster> {
        let path = &self.config.asset_path;
        info!("Loading texture");

        let file = {
            let _span = tracing::info_span!("open_source").entered();
            File::open(path).map_err(|e| {
                LoadError::SourceUnavailable(format!("{}: {}", path.display(), e))
            })?
        };
        let mut source = BufReader::new(file);

        let raster = {
            let _span = tracing::info_span!("decode_png").entered();
            self.reader.read_raster(&mut source, &self.config)?
        };

        {
            let _span = tracing::info_span!("validate_raster",
                width = raster.width,
                height = raster.height
            ).entered();
            self.validate_raster(&raster)?;
        }

        info!(
            width = raster.width,
            height = raster.height,
            "Texture loaded"
        );
        Ok(raster)
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LoaderConfig) {
        self.config = config;
    }
}
