//! PNG decoding module
//!
//! This module drives the `png` crate and normalizes whatever it produces into 8-bit RGB.

mod reader;
mod png_reader;
pub mod probe;
pub mod transform;
pub mod types;

pub use reader::RasterReader;
pub use png_reader::PngRasterReader;
pub use types::{ColorKind, DecodedRaster, SourceHeader};
