pub mod image_loader;
pub mod logger;

pub use image_loader::{DecodedRaster, LoadError, load_image};
