use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::io::{read_shapefile, write_geojson};
use crate::layout::Layout;

/// Geofabrik shapefile layers forwarded to the indexer, with their output labels.
pub const OSM_LAYERS: [(&str, &str); 3] = [
    ("gis_osm_water_a_free_1.shp", "waterbodies"),
    ("gis_osm_roads_free_1.shp", "roads"),
    ("gis_osm_waterways_free_1.shp", "waterways"),
];

/// Convert the country's OSM layers to GeoJSON indexer inputs.
/// Missing layers are skipped with a warning. Returns the labels written.
pub fn stage_osm_layers(layout: &Layout, country: &str) -> Result<Vec<&'static str>> {
    let source_dir = layout.osm_dir(country);
    let mut staged = Vec::with_capacity(OSM_LAYERS.len());

    for (file, label) in OSM_LAYERS {
        let source = source_dir.join(file);
        if !source.is_file() {
            warn!("OSM layer {label} not found for {country} at {}; skipping", source.display());
            continue;
        }
        let layer = read_shapefile(&source)
            .with_context(|| format!("[prepare::stage_osm_layers] {label} for {country}"))?;
        write_geojson(&layer, &layout.indexer_layer(country, label))?;
        info!(" - {label}: {} features", layer.len());
        staged.push(label);
    }

    Ok(staged)
}
