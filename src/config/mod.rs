use std::path::Path;
use serde::{Serialize, Deserialize, de::DeserializeOwned};

use crate::{
    log,
    tile::rendering::TileMapRenderFlags,
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// Configs
// ----------------------------------------------

pub const CONFIGS_DIR_PATH: &str = "assets/configs";

pub trait Configs {
    fn post_load(&mut self) {
    }

    // Saves current configs to `CONFIGS_DIR_PATH/<name>.json`.
    fn save_file(&self, config_file_name: &str) -> bool
        where Self: Configs + Sized + Serialize
    {
        debug_assert!(!config_file_name.is_empty());

        let config_json_path = Path::new(CONFIGS_DIR_PATH)
            .join(config_file_name)
            .with_extension("json");

        // First make sure the save directory exists. Ignore any errors since
        // this function might fail if any element of the path already exists.
        let _ = std::fs::create_dir_all(CONFIGS_DIR_PATH);

        self.save_to_path(&config_json_path)
    }

    fn save_to_path(&self, config_json_path: &Path) -> bool
        where Self: Configs + Sized + Serialize
    {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to serialize config file {config_json_path:?}: {err}");
                return false;
            }
        };

        if let Err(err) = std::fs::write(config_json_path, json) {
            log::error!(log::channel!("config"), "Failed to write config file {config_json_path:?}: {err}");
            return false;
        }

        true
    }

    // Either succeeds loading `CONFIGS_DIR_PATH/<name>.json` or returns a default config.
    fn load_file<T>(config_file_name: &str) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        debug_assert!(!config_file_name.is_empty());

        let config_json_path = Path::new(CONFIGS_DIR_PATH)
            .join(config_file_name)
            .with_extension("json");

        Self::load_from_path(&config_json_path)
    }

    fn load_from_path<T>(config_json_path: &Path) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        let mut configs = match std::fs::read_to_string(config_json_path) {
            Ok(json) => match Self::from_json_str::<T>(&json) {
                Ok(configs) => configs,
                Err(err) => {
                    log::error!(log::channel!("config"), "Failed to deserialize config file from path {config_json_path:?}: {err}");
                    T::default()
                }
            },
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to read config file from path {config_json_path:?}: {err}");
                T::default()
            }
        };

        configs.post_load();
        configs
    }

    fn from_json_str<T>(json: &str) -> Result<T, String>
        where T: Configs + Sized + DeserializeOwned
    {
        serde_json::from_str::<T>(json).map_err(|err| err.to_string())
    }
}

// ----------------------------------------------
// PictureRef
// ----------------------------------------------

// Picture named by group and index, resolved through a PictureCache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRef {
    pub group: String,
    pub index: u32,
}

impl PictureRef {
    pub fn new(group: &str, index: u32) -> Self {
        Self { group: group.to_string(), index }
    }
}

impl std::fmt::Display for PictureRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(\"{}\", {})", self.group, self.index)
    }
}

// ----------------------------------------------
// TileMapViewConfigs
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)] // Missing fields in the config file get defaults from TileMapViewConfigs::default().
pub struct TileMapViewConfigs {
    // Picture shown on cells the remove tool would clear.
    pub cleared_land_picture: PictureRef,

    // Info boxes are centered horizontally, this far from the top.
    pub info_box_top_margin: i32,

    pub preview_enabled: bool,
    pub render_flags: TileMapRenderFlags,

    // Applied process wide on load.
    pub log: log::LogSettings,
}

impl Default for TileMapViewConfigs {
    fn default() -> Self {
        Self {
            cleared_land_picture: PictureRef::new("land1a", 1),
            info_box_top_margin: 10,
            preview_enabled: true,
            render_flags: TileMapRenderFlags::default(),
            log: log::LogSettings::default(),
        }
    }
}

impl Configs for TileMapViewConfigs {
    fn post_load(&mut self) {
        log::apply_settings(&self.log);
    }
}
