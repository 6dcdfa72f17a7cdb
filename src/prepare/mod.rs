//! Staging of inputs for the external land-eligibility tool and hexagon indexer.
//!
//! Per country, in order:
//! - boundary: select, project to the UTM zone, buffer, and record the EPSG code
//! - oceans: clip global ocean polygons to the buffered boundary
//! - exclusions: write the land-eligibility job
//! - osm: convert roads and water layers for the indexer
//! - hydro (optional): plant list to points
//! - template: instantiate the indexer config

mod boundary;
mod exclusion;
mod hydro;
mod oceans;
mod osm;
mod template;

use anyhow::{Context, Result};
use tracing::info;

use crate::common::{clean_country_name, require_file_exists};
use crate::geom::Crs;
use crate::io::{read_layer, write_geojson};
use crate::layer::CellLayer;
use crate::layout::Layout;
use crate::settings::Settings;

pub use boundary::{representative_point, select_country, stage_boundary, EpsgRecord, StagedBoundary};
pub use exclusion::{land_cover, ExclusionJob, ExclusionStep, Separation};
pub use hydro::{load_hydropower, HydroSummary, HYDRO_COLUMNS};
pub use oceans::clip_oceans;
pub use osm::{stage_osm_layers, OSM_LAYERS};
pub use template::{load_template, replace_country, write_config};

/// Shared inputs loaded once for a prepare run.
#[derive(Debug)]
pub struct PrepareContext<'a> {
    layout: &'a Layout,
    settings: &'a Settings,
    world: CellLayer,
    oceans: CellLayer,
    template: serde_yaml::Value,
    hydro: bool,
}

impl<'a> PrepareContext<'a> {
    /// Load the world boundaries, ocean polygons and config template.
    pub fn load(layout: &'a Layout, settings: &'a Settings, hydro: bool) -> Result<Self> {
        let world = load_polygons(&layout.world(settings))?;
        let oceans = load_polygons(&layout.oceans(settings))?;
        let template = load_template(&layout.config_template(hydro))?;
        Ok(Self { layout, settings, world, oceans, template, hydro })
    }

    /// Stage every input for one clean country name.
    pub fn prepare_country(&self, country: &str) -> Result<()> {
        let layout = self.layout;

        info!("Preparing boundary for {country}...");
        let staged = stage_boundary(layout, self.settings, &self.world, country)?;

        info!("Clipping oceans...");
        let mask = staged.buffer.to_crs(self.oceans.crs())?;
        let oceans = clip_oceans(&self.oceans, &mask)?;
        write_geojson(&oceans.clone().to_crs(staged.utm)?, &layout.exclusion_oceans(country))?;
        write_geojson(&oceans.clone().to_crs(Crs::WGS84)?, &layout.indexer_layer(country, "oceans"))?;
        info!(" - {} ocean features", oceans.len());

        info!("Writing exclusion job...");
        ExclusionJob::build(layout, self.settings, country, staged.utm)
            .write(&layout.exclusion_job(country))?;

        info!("Converting OSM layers...");
        stage_osm_layers(layout, country)?;

        if self.hydro {
            info!("Loading hydropower plants...");
            let source = layout.hydropower_csv(country);
            require_file_exists(&source)?;
            let (plants, _) = load_hydropower(&source)?;
            write_geojson(&plants, &layout.indexer_layer(country, "hydropower_dams"))?;
            write_geojson(&plants, &layout.final_hydropower(country))?;
        }

        info!("Writing indexer config...");
        write_config(&self.template, country, &layout.indexer_config(country))?;

        info!("Done! Inputs staged for {country}");
        Ok(())
    }
}

/// Stage inputs for each country; names are cleaned first. The first failure aborts the run.
pub fn prepare(layout: &Layout, settings: &Settings, countries: &[String], hydro: bool) -> Result<()> {
    let context = PrepareContext::load(layout, settings, hydro)?;
    for country in countries {
        let country = clean_country_name(country);
        context.prepare_country(&country)
            .with_context(|| format!("[prepare] {country}"))?;
    }
    Ok(())
}

fn load_polygons(path: &std::path::Path) -> Result<CellLayer> {
    require_file_exists(path)?;
    read_layer(path)?
        .into_multipolygons()
        .with_context(|| format!("[prepare::load_polygons] {}", path.display()))
}
