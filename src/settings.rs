use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::layer::CountryNaming;

/// Tunables for both pipelines. Every field has a default; a TOML file may override any subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Turbine rotor radius in metres, used for turbine spacing.
    /// NREL 2020 ATB reference 4 MW turbine.
    pub turbine_radius_m: f64,
    /// Buffer around the country boundary used to clip oceans.
    pub country_buffer_m: f64,
    /// Exclusion calculator raster resolution.
    pub pixel_size_m: f64,
    /// Exclusion buffer around coastline.
    pub coast_buffer_m: f64,
    /// Minimum spacing between PV placements.
    pub pv_separation_m: f64,
    /// World boundary dataset, relative to the root. Defaults to the Natural Earth 1:50m countries.
    pub world_path: Option<PathBuf>,
    /// Attribute holding the country name in the world dataset.
    pub world_name_field: String,
    /// Ocean polygon dataset, relative to the root.
    pub ocean_path: Option<PathBuf>,
    /// How country names are attached to cells during attribution.
    pub country_naming: CountryNaming,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            turbine_radius_m: 150.0,
            country_buffer_m: 10_000.0,
            pixel_size_m: 100.0,
            coast_buffer_m: 250.0,
            pv_separation_m: 440.0,
            world_path: None,
            world_name_field: "NAME".to_string(),
            ocean_path: None,
            country_naming: CountryNaming::Clean,
        }
    }
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML settings: {:?}", path))
    }

    /// Load from `path` if given, else use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map(Self::load_from_file).unwrap_or_else(|| Ok(Self::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let settings: Settings = toml::from_str(r#"
            turbine_radius_m = 80.0
            world_name_field = "name"
            country_naming = "raw"
        "#).unwrap();

        assert_eq!(settings.turbine_radius_m, 80.0);
        assert_eq!(settings.world_name_field, "name");
        assert_eq!(settings.country_naming, CountryNaming::Raw);
        assert_eq!(settings.pv_separation_m, 440.0);
        assert!(settings.world_path.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Settings>("turbine_raduis_m = 80.0").is_err());
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.country_buffer_m, 10_000.0);
        assert_eq!(settings.country_naming, CountryNaming::Clean);
    }
}
