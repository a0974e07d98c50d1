use texture_loader::image_loader::{ImageLoader, LoaderConfig};
use texture_loader::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting texture_loader...");

    let loader = ImageLoader::new(LoaderConfig::default());

    info!("Asset: {}", loader.config().asset_path.display());
    info!("Screen gamma: {}", loader.config().screen_gamma);

    let raster = loader.load_image().map_err(|e| {
        error!("Texture load failed: {}", e);
        e
    })?;

    info!(
        width = raster.width,
        height = raster.height,
        bytes = raster.data.len(),
        "Texture loaded"
    );

    Ok(())
}
