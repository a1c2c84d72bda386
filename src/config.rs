//! Configurator settings
//!
//! Everything tunable lives in one RON file next to the assets. Every field
//! has a default, so a partial file only overrides what it names and a
//! missing file means stock settings.

use crate::store::{HexColor, SceneStore, DEFAULT_COLOR, RECOLORABLE};
use crate::viewport::ViewportConfig;
use macroquad::prelude::Conf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the settings are looked up at startup
pub const CONFIG_PATH: &str = "assets/configurator.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Where the startup settings came from. Reading happens before the logger
/// is up, so this is reported afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    /// The file exists but could not be used
    Rejected(PathBuf, String),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => log::info!("No config file, using defaults"),
            ConfigSource::File(path) => log::info!("Loaded config from {}", path.display()),
            ConfigSource::Rejected(path, reason) => log::warn!("Ignoring {}: {}", path.display(), reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub high_dpi: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Scooter Configurator".to_string(), width: 1280, height: 720, high_dpi: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Binary glTF with the scooter's meshes and materials
    pub model: String,
    /// Part table overriding the built-in one
    pub parts: Option<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self { model: "assets/scooter.glb".to_string(), parts: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Materials the user may recolor
    pub recolorable: Vec<String>,
    /// Their starting color
    pub default_color: HexColor,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            recolorable: RECOLORABLE.iter().map(|s| s.to_string()).collect(),
            default_color: HexColor::from(DEFAULT_COLOR),
        }
    }
}

impl PaletteConfig {
    /// Store seeded with this palette
    pub fn store(&self) -> SceneStore {
        SceneStore::new(self.recolorable.as_slice(), self.default_color.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfiguratorConfig {
    pub window: WindowConfig,
    pub viewport: ViewportConfig,
    pub assets: AssetConfig,
    pub palette: PaletteConfig,
}

impl ConfiguratorConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Settings from `path`, or defaults when it is missing or broken
    pub fn load_or_default(path: &Path) -> (Self, ConfigSource) {
        if !path.exists() {
            return (Self::default(), ConfigSource::Defaults);
        }
        match Self::load_from_file(path) {
            Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
            Err(e) => (Self::default(), ConfigSource::Rejected(path.to_path_buf(), e.to_string())),
        }
    }

    /// Settings for this platform. The web build has no filesystem to read.
    pub fn load() -> (Self, ConfigSource) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::load_or_default(Path::new(CONFIG_PATH))
        }
        #[cfg(target_arch = "wasm32")]
        {
            (Self::default(), ConfigSource::Defaults)
        }
    }

    pub fn parts_path(&self) -> Option<PathBuf> {
        self.assets.parts.as_ref().map(PathBuf::from)
    }

    pub fn window_conf(&self) -> Conf {
        Conf {
            window_title: self.window.title.clone(),
            window_width: self.window.width,
            window_height: self.window.height,
            window_resizable: true,
            high_dpi: self.window.high_dpi,
            ..Default::default()
        }
    }
}
