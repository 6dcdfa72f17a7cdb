//! Format-specific reading and writing.
//!
//! - `geojson` - feature collections, both as typed layers and as raw JSON trees
//! - `shp` - ESRI shapefiles (read only), CRS taken from the `.prj` sidecar
//! - `csv` - tabular inputs via polars

mod csv;
mod geojson;
mod shp;

use std::path::Path;

use anyhow::{anyhow, bail, Result};

use crate::layer::VectorLayer;

pub(crate) use csv::*;
pub use self::geojson::{read_geojson, read_raw_geojson, write_geojson, write_raw_geojson};
pub use shp::read_shapefile;

/// Read a vector layer, choosing the reader from the file extension.
pub fn read_layer(path: &Path) -> Result<VectorLayer> {
    let extension = path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| anyhow!("[io::read_layer] input file has no extension: {}", path.display()))?;

    match extension.as_str() {
        "shp" => read_shapefile(path),
        "json" | "geojson" => read_geojson(path),
        other => bail!("[io::read_layer] unsupported vector format '{other}': {}", path.display()),
    }
}
