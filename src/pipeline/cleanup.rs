use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use crate::io::read_raw_geojson;
use super::COUNTRY_FIELD;

/// Load a country-attributed cell file and keep only the rows belonging to `country`.
/// `country` must already be normalised the same way as the attribute values.
pub fn remove_extra_cells(path: &Path, country: &str) -> Result<Value> {
    let mut cells = read_raw_geojson(path)?;
    retain_country(&mut cells, country)
        .with_context(|| format!("[pipeline::remove_extra_cells] {}", path.display()))?;
    Ok(cells)
}

/// Keep the features whose `country` attribute equals `country` exactly, in order.
/// The kept features are collected into a fresh vector, never removed in place.
/// Returns the number of features kept.
pub fn retain_country(collection: &mut Value, country: &str) -> Result<usize> {
    let features = collection.get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| anyhow!("feature collection has no 'features' array"))?;

    let snapshot = std::mem::take(features);
    *features = snapshot.into_iter()
        .filter(|feature| feature_country(feature) == Some(country))
        .collect();

    Ok(features.len())
}

/// Number of features in a raw feature collection (0 when malformed).
pub fn feature_count(collection: &Value) -> usize {
    collection.get("features").and_then(Value::as_array).map_or(0, Vec::len)
}

fn feature_country(feature: &Value) -> Option<&str> {
    feature.get("properties")?.get(COUNTRY_FIELD)?.as_str()
}
