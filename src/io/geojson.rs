use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::Geometry;
use geojson::{FeatureCollection, GeoJson, JsonObject};
use serde_json::{json, Value};
use tracing::debug;

use crate::common::write_atomic;
use crate::geom::Crs;
use crate::layer::{Feature, Layer, VectorLayer};

/// Read a GeoJSON FeatureCollection into a layer.
/// The CRS comes from the legacy `crs` member when present, else WGS84.
/// Features without geometry are dropped.
pub fn read_geojson(path: &Path) -> Result<VectorLayer> {
    let file = File::open(path)
        .with_context(|| format!("[io::read_geojson] Failed to open GeoJSON file: {}", path.display()))?;
    let geojson = GeoJson::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::read_geojson] Failed to parse GeoJSON: {}", path.display()))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => bail!("[io::read_geojson] GeoJSON must be a FeatureCollection: {}", path.display()),
    };

    let crs = match collection.foreign_members.as_ref().and_then(|members| members.get("crs")) {
        None | Some(Value::Null) => Crs::WGS84,
        Some(member) => crs_member(member)
            .ok_or_else(|| anyhow!("[io::read_geojson] unrecognised crs member {member} in {}", path.display()))?,
    };

    let mut features = Vec::with_capacity(collection.features.len());
    let mut dropped = 0usize;
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            dropped += 1;
            continue;
        };
        let geometry = Geometry::<f64>::try_from(geometry.value)
            .map_err(|e| anyhow!("[io::read_geojson] feature {idx} in {}: {e}", path.display()))?;
        features.push(Feature::new(geometry, feature.properties.unwrap_or_default()));
    }

    if dropped > 0 {
        debug!("dropped {dropped} features without geometry from {}", path.display());
    }

    Ok(Layer::new(crs, features))
}

/// Write a layer as a GeoJSON FeatureCollection.
/// Non-WGS84 layers carry a legacy `crs` member so they can be read back.
pub fn write_geojson<G>(layer: &Layer<G>, path: &Path) -> Result<()>
where
    for<'a> geojson::Value: From<&'a G>,
{
    let features = layer.features().iter()
        .map(|feature| geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&feature.geometry))),
            id: None,
            properties: Some(feature.properties.clone()),
            foreign_members: None,
        })
        .collect();

    let foreign_members = (layer.crs() != Crs::WGS84).then(|| {
        let mut members = JsonObject::new();
        members.insert("crs".to_string(), json!({
            "type": "name",
            "properties": { "name": layer.crs().urn() },
        }));
        members
    });

    let collection = FeatureCollection { bbox: None, features, foreign_members };
    let bytes = serde_json::to_vec(&collection)
        .context("[io::write_geojson] Failed to serialize GeoJSON")?;
    write_atomic(path, &bytes)?;

    debug!("wrote {} features to {}", layer.len(), path.display());
    Ok(())
}

/// Read a GeoJSON file as an untyped JSON tree.
pub fn read_raw_geojson(path: &Path) -> Result<Value> {
    let file = File::open(path)
        .with_context(|| format!("[io::read_raw_geojson] Failed to open GeoJSON file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::read_raw_geojson] Failed to parse JSON: {}", path.display()))
}

/// Write an untyped JSON tree verbatim.
pub fn write_raw_geojson(value: &Value, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec(value)
        .context("[io::write_raw_geojson] Failed to serialize JSON")?;
    write_atomic(path, &bytes)
}

/// Parse `{"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::nnnn"}}`.
fn crs_member(member: &Value) -> Option<Crs> {
    member.get("properties")?
        .get("name")?
        .as_str()
        .and_then(Crs::from_urn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{CellLayer, PointLayer, Properties};
    use geo::{point, polygon, MultiPolygon};

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn layer_round_trip_keeps_attributes_and_crs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cells.geojson");

        let layer = CellLayer::new(Crs::from_epsg(32633), vec![
            Feature::new(
                MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0)]]),
                props(json!({"h3": "abc", "theo_pv": 3})),
            ),
        ]);
        write_geojson(&layer, &path).unwrap();

        let back = read_geojson(&path).unwrap().into_multipolygons().unwrap();
        assert_eq!(back.crs(), Crs::from_epsg(32633));
        assert_eq!(back.features()[0].properties, layer.features()[0].properties);
        assert_eq!(back.features()[0].geometry, layer.features()[0].geometry);
    }

    #[test]
    fn wgs84_layers_have_no_crs_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.geojson");

        let layer = PointLayer::new(Crs::WGS84, vec![Feature::new(point!(x: 1.0, y: 2.0), Properties::new())]);
        write_geojson(&layer, &path).unwrap();

        let raw = read_raw_geojson(&path).unwrap();
        assert!(raw.get("crs").is_none());
        assert_eq!(raw["features"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn raw_round_trip_keeps_feature_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.geojson");

        let tree = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {"country": "A"}},
                {"type": "Feature", "geometry": null, "properties": {"country": "B"}},
            ],
        });
        write_raw_geojson(&tree, &path).unwrap();

        let back = read_raw_geojson(&path).unwrap();
        assert_eq!(back, tree);
        // Typed reading skips features without geometry.
        assert!(read_geojson(&path).unwrap().is_empty());
    }

    #[test]
    fn rejects_bare_geometries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("point.geojson");
        std::fs::write(&path, r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#).unwrap();

        assert!(read_geojson(&path).is_err());
    }

    #[test]
    fn unreadable_crs_member_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cells.geojson");
        std::fs::write(&path, serde_json::to_vec(&json!({
            "type": "FeatureCollection",
            "crs": {"type": "link", "properties": {"href": "cells.prj"}},
            "features": [],
        })).unwrap()).unwrap();

        let err = read_geojson(&path).unwrap_err();
        assert!(err.to_string().contains("unrecognised crs member"));
    }

    #[test]
    fn null_crs_member_means_wgs84() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cells.geojson");
        std::fs::write(&path, r#"{"type": "FeatureCollection", "crs": null, "features": []}"#).unwrap();

        assert_eq!(read_geojson(&path).unwrap().crs(), Crs::WGS84);
    }
}
