use std::path::{Path, PathBuf};

use crate::settings::Settings;

/// Directory and file naming for every pipeline input and output, relative to a root.
/// Country arguments are always clean names.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline] pub fn root(&self) -> &Path { &self.root }

    /// Raw downloaded inputs.
    pub fn data_dir(&self) -> PathBuf { self.root.join("data") }

    /// Exclusion calculator inputs.
    pub fn exclusion_data_dir(&self) -> PathBuf { self.root.join("glaes").join("glaes").join("data") }

    /// Exclusion calculator outputs (placements, exclusion rasters).
    pub fn exclusion_output_dir(&self) -> PathBuf { self.root.join("inputs_glaes").join("processed") }

    /// Hexagon indexer inputs.
    pub fn indexer_data_dir(&self) -> PathBuf { self.root.join("ccg-spider").join("prep").join("data") }

    /// Hexagon indexer configs and hexagon output.
    pub fn indexer_prep_dir(&self) -> PathBuf { self.root.join("ccg-spider").join("prep") }

    /// Indexer config templates.
    pub fn template_dir(&self) -> PathBuf { self.root.join("inputs_spider") }

    /// Combined cell files.
    pub fn combined_dir(&self) -> PathBuf { self.root.join("inputs_geox").join("data") }

    /// Final deliverables.
    pub fn final_dir(&self) -> PathBuf { self.root.join("inputs_geox").join("final_data") }

    /// World country boundaries, unless overridden in settings.
    pub fn world(&self, settings: &Settings) -> PathBuf {
        match &settings.world_path {
            Some(path) => self.root.join(path),
            None => self.data_dir()
                .join("ne_50m_admin_0_countries")
                .join("ne_50m_admin_0_countries.shp"),
        }
    }

    /// Global ocean polygons, unless overridden in settings.
    pub fn oceans(&self, settings: &Settings) -> PathBuf {
        match &settings.ocean_path {
            Some(path) => self.root.join(path),
            None => self.data_dir().join("goas").join("goas_v01.shp"),
        }
    }

    pub fn hydropower_csv(&self, country: &str) -> PathBuf {
        self.data_dir().join(format!("{country}_hydropower_plants.csv"))
    }

    pub fn osm_dir(&self, country: &str) -> PathBuf {
        self.data_dir().join("OSM").join(country)
    }

    pub fn config_template(&self, hydro: bool) -> PathBuf {
        let name = if hydro { "Country_config_hydro.yml" } else { "Country_config.yml" };
        self.template_dir().join(name)
    }

    pub fn indexer_config(&self, country: &str) -> PathBuf {
        self.indexer_prep_dir().join(format!("{country}_config.yml"))
    }

    pub fn epsg_record(&self, country: &str) -> PathBuf {
        self.exclusion_data_dir().join(format!("{country}_EPSG.json"))
    }

    pub fn exclusion_job(&self, country: &str) -> PathBuf {
        self.exclusion_data_dir().join(format!("{country}_exclusions.json"))
    }

    /// Country boundary in its UTM zone, the exclusion calculator's region.
    pub fn boundary_utm(&self, country: &str) -> PathBuf {
        self.exclusion_data_dir().join(format!("{country}.geojson"))
    }

    pub fn boundary_buffer(&self, country: &str) -> PathBuf {
        self.exclusion_data_dir().join(format!("{country}_buff.geojson"))
    }

    /// Land-cover raster clipped to the country (produced outside this crate).
    pub fn land_cover(&self, country: &str) -> PathBuf {
        self.exclusion_data_dir().join(format!("{country}_CLC.tif"))
    }

    pub fn exclusion_oceans(&self, country: &str) -> PathBuf {
        self.exclusion_data_dir().join(format!("{country}_oceans.geojson"))
    }

    pub fn wind_exclusions(&self, country: &str) -> PathBuf {
        self.exclusion_output_dir().join(format!("{country}_wind_exclusions.tif"))
    }

    pub fn pv_exclusions(&self, country: &str) -> PathBuf {
        self.exclusion_output_dir().join(format!("{country}_pv_exclusions.tif"))
    }

    /// Country boundary in WGS84 for the hexagon indexer.
    pub fn indexer_boundary(&self, country: &str) -> PathBuf {
        self.indexer_data_dir().join(format!("{country}.geojson"))
    }

    /// A named indexer input layer, e.g. `oceans`, `roads`.
    pub fn indexer_layer(&self, country: &str, layer: &str) -> PathBuf {
        self.indexer_data_dir().join(format!("{country}_{layer}.geojson"))
    }

    pub fn final_hydropower(&self, country: &str) -> PathBuf {
        self.final_dir().join(format!("{country}_hydropower_dams.geojson"))
    }

    pub fn hex_cells(&self, country: &str) -> PathBuf {
        self.indexer_prep_dir().join(format!("{country}_hex.geojson"))
    }

    pub fn turbine_placements(&self, country: &str) -> PathBuf {
        self.exclusion_output_dir().join(format!("{country}_turbine_placements.shp"))
    }

    pub fn pv_placements(&self, country: &str) -> PathBuf {
        self.exclusion_output_dir().join(format!("{country}_pv_placements.shp"))
    }

    pub fn combined_cells(&self, country: &str) -> PathBuf {
        self.combined_dir().join(format!("{country}_hex_final.geojson"))
    }

    pub fn final_cells(&self, code: &str) -> PathBuf {
        self.final_dir().join(format!("hex_final_{code}.geojson"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_naming_scheme() {
        let layout = Layout::new("/work");
        assert_eq!(layout.hex_cells("Kenya"), Path::new("/work/ccg-spider/prep/Kenya_hex.geojson"));
        assert_eq!(layout.turbine_placements("Kenya"), Path::new("/work/inputs_glaes/processed/Kenya_turbine_placements.shp"));
        assert_eq!(layout.final_cells("KEN"), Path::new("/work/inputs_geox/final_data/hex_final_KEN.geojson"));
        assert_eq!(layout.config_template(true), Path::new("/work/inputs_spider/Country_config_hydro.yml"));
    }

    #[test]
    fn settings_override_reference_datasets() {
        let layout = Layout::new("/work");
        let mut settings = Settings::default();
        assert_eq!(
            layout.world(&settings),
            Path::new("/work/data/ne_50m_admin_0_countries/ne_50m_admin_0_countries.shp"),
        );

        settings.world_path = Some("ref/world.geojson".into());
        assert_eq!(layout.world(&settings), Path::new("/work/ref/world.geojson"));
    }
}
