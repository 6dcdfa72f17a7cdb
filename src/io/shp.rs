use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use shapefile::dbase::{FieldValue, Record};
use shapefile::Reader;
use tracing::debug;

use crate::geom::{crs_from_prj_wkt, shape_to_geometry, Crs};
use crate::layer::{Feature, Layer, Properties, VectorLayer};

/// Reads all shapes + attribute records from a given `.shp` file path.
/// The CRS is detected from the sibling `.prj` file; an undetectable CRS is an error.
pub fn read_shapefile(path: &Path) -> Result<VectorLayer> {
    let crs = crs_from_prj(path)?;

    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::read_shapefile] Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::with_capacity(reader.shape_count()?);
    let mut null_shapes = 0usize;
    for (idx, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .with_context(|| format!("[io::read_shapefile] Error reading shape+record {idx} in {}", path.display()))?;
        match shape_to_geometry(shape).with_context(|| format!("record {idx} in {}", path.display()))? {
            Some(geometry) => features.push(Feature::new(geometry, record_to_properties(record))),
            None => null_shapes += 1,
        }
    }

    if null_shapes > 0 {
        debug!("skipped {null_shapes} null shapes in {}", path.display());
    }

    Ok(Layer::new(crs, features))
}

/// Detect the CRS of a shapefile from its `.prj` sidecar.
fn crs_from_prj(path: &Path) -> Result<Crs> {
    let prj = path.with_extension("prj");
    let wkt = fs::read_to_string(&prj)
        .with_context(|| format!("[io::read_shapefile] missing projection file {}", prj.display()))?;
    crs_from_prj_wkt(&wkt)
        .ok_or_else(|| anyhow!("[io::read_shapefile] unrecognised CRS in {}", prj.display()))
}

/// Convert a dBase record to JSON attributes.
fn record_to_properties(record: Record) -> Properties {
    record.into_iter()
        .map(|(field, value)| {
            let value = match value {
                FieldValue::Character(Some(s)) => json!(s.trim()),
                FieldValue::Numeric(Some(n)) => json!(n),
                FieldValue::Float(Some(f)) => json!(f),
                FieldValue::Integer(i) => json!(i),
                FieldValue::Double(d) => json!(d),
                FieldValue::Logical(Some(b)) => json!(b),
                _ => Value::Null,
            };
            (field, value)
        })
        .collect()
}
