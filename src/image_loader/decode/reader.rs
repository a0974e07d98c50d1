use std::io::Read;

use crate::image_loader::common::error::Result;
use crate::image_loader::config::LoaderConfig;
use crate::image_loader::decode::types::DecodedRaster;

pub trait RasterReader {
    fn read_raster(&self, source: &mut dyn Read, config: &LoaderConfig) -> Result<DecodedRaster>;
}
