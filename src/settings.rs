use crate::garden::Costs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub garden: GardenSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub scale: u32,            // Terminal cells per grid pixel (PNG uses png_scale)
    pub png_scale: u32,
    pub background: Option<String>,  // Hex colour behind the plant, none = terminal default
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1,
            png_scale: 8,
            background: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GardenSettings {
    pub store_path: Option<PathBuf>,
    pub starting_points: u32,
    pub water_cost: u32,
    pub plant_cost: u32,
    pub default_plant_name: String,
}

impl Default for GardenSettings {
    fn default() -> Self {
        let costs = Costs::default();
        Self {
            store_path: None,
            starting_points: 100,
            water_cost: costs.water,
            plant_cost: costs.plant,
            default_plant_name: "Plant".to_string(),
        }
    }
}

impl GardenSettings {
    pub fn costs(&self) -> Costs {
        Costs {
            water: self.water_cost,
            plant: self.plant_cost,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pixelgarden")
                .join("garden.toml")
        })
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable settings");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read settings");
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pixelgarden")
            .join("config.toml")
    }
}
