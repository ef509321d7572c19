//! Menu configuration file.
//!
//! Every key is optional; anything missing falls back to the built-in defaults.
//!
//! ```toml
//! volume_rendering_quality_range = { min = 1.0, max = 4.0, step = 1.0 }
//!
//! [colorbar]
//! tick_position = "left"
//! container_position = "right"
//! width = 16.0
//! initial_colormap = "Grayscale"
//!
//! [[window_level_presets]]
//! modality = "CT"
//! presets = [{ description = "Soft tissue", window = 400.0, level = 40.0 }]
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::colorbar::ColorbarProperties;
use crate::presets::{
    default_volume_rendering_presets, default_window_level_presets, ModalityPresets,
    ViewportPreset, VolumeRenderingQualityRange,
};

const CONFIG_DIR_NAME: &str = "wlmenu";
const CONFIG_FILE_NAME: &str = "menu.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub colorbar: ColorbarProperties,
    pub window_level_presets: Vec<ModalityPresets>,
    pub volume_rendering_presets: Option<Vec<ViewportPreset>>,
    pub volume_rendering_quality_range: Option<VolumeRenderingQualityRange>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            colorbar: ColorbarProperties::default(),
            window_level_presets: default_window_level_presets(),
            volume_rendering_presets: Some(default_volume_rendering_presets()),
            volume_rendering_quality_range: Some(VolumeRenderingQualityRange::default()),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        return env::var_os("APPDATA")
            .map(PathBuf::from)
            .map(|base| base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }

    #[cfg(target_os = "macos")]
    {
        return env::var_os("HOME").map(PathBuf::from).map(|home| {
            home.join("Library")
                .join("Application Support")
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME)
        });
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        env::var_os("HOME").map(PathBuf::from).map(|home| {
            home.join(".config")
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME)
        })
    }
}

pub fn parse_menu_config(text: &str) -> Result<MenuConfig> {
    toml::from_str(text).context("Invalid menu configuration")
}

pub fn load_menu_config(path: &Path) -> Result<MenuConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    parse_menu_config(&text).with_context(|| format!("Could not load {}", path.display()))
}

/// Loads the configuration at `path`, falling back to defaults. The second
/// value is a message for the status line when the file could not be used.
pub fn load_menu_config_or_default(path: Option<&Path>) -> (MenuConfig, Option<String>) {
    let Some(path) = path.filter(|path| path.exists()) else {
        return (MenuConfig::default(), None);
    };

    match load_menu_config(path) {
        Ok(config) => {
            log::info!("Loaded menu configuration from {}", path.display());
            (config, None)
        }
        Err(err) => {
            log::warn!("{err:#}");
            (
                MenuConfig::default(),
                Some(format!("Using default menu configuration: {err:#}")),
            )
        }
    }
}
