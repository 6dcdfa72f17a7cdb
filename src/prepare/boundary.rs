use anyhow::{ensure, Context, Result};
use geo::{InteriorPoint, Point};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{clean_country_name, write_atomic};
use crate::geom::{buffer, utm_epsg, Crs};
use crate::io::write_geojson;
use crate::layer::{CellLayer, Feature};
use crate::layout::Layout;
use crate::settings::Settings;

/// The projected CRS chosen for a country, persisted for the exclusion calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpsgRecord {
    pub country: String,
    pub epsg: u32,
}

/// Outputs of boundary staging that later steps depend on.
#[derive(Debug, Clone)]
pub struct StagedBoundary {
    /// UTM zone of the country's interior point.
    pub utm: Crs,
    /// Buffered boundary, in WGS84.
    pub buffer: CellLayer,
}

/// Select the world features whose cleaned name equals `country`.
pub fn select_country(world: &CellLayer, name_field: &str, country: &str) -> Result<CellLayer> {
    let selected = world.clone().filter(|feature| {
        feature.get_str(name_field).map(clean_country_name).as_deref() == Some(country)
    });
    ensure!(
        !selected.is_empty(),
        "[prepare::select_country] no feature in the world dataset has {name_field} matching '{country}'"
    );
    Ok(selected)
}

/// A point guaranteed to lie inside the first feature.
pub fn representative_point(layer: &CellLayer) -> Option<Point<f64>> {
    layer.geometries().next().and_then(|shape| shape.interior_point())
}

/// Write the country boundary in UTM and WGS84 plus its buffered outline.
pub fn stage_boundary(layout: &Layout, settings: &Settings, world: &CellLayer, country: &str) -> Result<StagedBoundary> {
    let boundary = select_country(world, &settings.world_name_field, country)?.to_crs(Crs::WGS84)?;

    let point = representative_point(&boundary)
        .with_context(|| format!("[prepare::stage_boundary] {country} has an empty boundary"))?;
    let utm = Crs::from_epsg(utm_epsg(point.y(), point.x()));
    info!(" - {country} lies in {utm}");

    let record = EpsgRecord { country: country.to_string(), epsg: utm.epsg() };
    write_atomic(&layout.epsg_record(country), &serde_json::to_vec_pretty(&record)?)?;

    let projected = boundary.clone().to_crs(utm)?;
    write_geojson(&projected, &layout.boundary_utm(country))?;

    let buffered = CellLayer::new(utm, projected.features().iter()
        .map(|feature| Feature::new(buffer(&feature.geometry, settings.country_buffer_m), feature.properties.clone()))
        .collect());
    write_geojson(&buffered, &layout.boundary_buffer(country))?;

    write_geojson(&boundary, &layout.indexer_boundary(country))?;

    Ok(StagedBoundary { utm, buffer: buffered.to_crs(Crs::WGS84)? })
}
