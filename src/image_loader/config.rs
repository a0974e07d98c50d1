//! Loader configuration types

use std::path::PathBuf;

/// Location of the texture map, relative to the working directory
pub const DEFAULT_ASSET_PATH: &str = "assets/TextureMap.png";

/// Display gamma the decoded samples are corrected for
pub const DEFAULT_SCREEN_GAMMA: f64 = 2.2;

/// Configuration for loading the texture asset
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// File the loader opens
    pub asset_path: PathBuf,
    /// Output gamma; only applied when the source declares its own gamma
    pub screen_gamma: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from(DEFAULT_ASSET_PATH),
            screen_gamma: DEFAULT_SCREEN_GAMMA,
        }
    }
}

impl LoaderConfig {
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }
}

/// Builder for LoaderConfig
#[derive(Default)]
pub struct LoaderConfigBuilder {
    asset_path: Option<PathBuf>,
    screen_gamma: Option<f64>,
}

impl LoaderConfigBuilder {
    pub fn asset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    pub fn screen_gamma(mut self, gamma: f64) -> Self {
        self.screen_gamma = Some(gamma);
        self
    }

    pub fn build(self) -> LoaderConfig {
        let default = LoaderConfig::default();
        LoaderConfig {
            asset_path: self.asset_path.unwrap_or(default.asset_path),
            screen_gamma: self.screen_gamma.unwrap_or(default.screen_gamma),
        }
    }
}
