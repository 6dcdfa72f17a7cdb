use anyhow::{bail, Context, Result};
use geo::{Geometry, MapCoords, MultiPolygon, Point};
use serde_json::{Map, Value};

use crate::geom::{Crs, Reprojector};

/// Attribute name → value mapping carried by every feature.
pub type Properties = Map<String, Value>;

/// A geometry plus its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature<G> {
    pub geometry: G,
    pub properties: Properties,
}

impl<G> Feature<G> {
    pub fn new(geometry: G, properties: Properties) -> Self {
        Self { geometry, properties }
    }

    /// Get a string attribute, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.properties.get(field).and_then(Value::as_str)
    }
}

/// An ordered collection of features sharing a single CRS.
/// Feature order is significant: it is the identity of each feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<G> {
    crs: Crs,
    features: Vec<Feature<G>>,
}

/// Hexagon cells (or any polygon units).
pub type CellLayer = Layer<MultiPolygon<f64>>;

/// Point placements.
pub type PointLayer = Layer<Point<f64>>;

/// A layer of mixed geometry, as read from disk.
pub type VectorLayer = Layer<Geometry<f64>>;

impl<G> Layer<G> {
    pub fn new(crs: Crs, features: Vec<Feature<G>>) -> Self {
        Self { crs, features }
    }

    #[inline] pub fn crs(&self) -> Crs { self.crs }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Feature<G>] { &self.features }

    #[inline] pub fn features_mut(&mut self) -> &mut [Feature<G>] { &mut self.features }

    #[inline] pub fn into_features(self) -> Vec<Feature<G>> { self.features }

    /// Iterate over the geometries in order.
    pub fn geometries(&self) -> impl Iterator<Item = &G> {
        self.features.iter().map(|feature| &feature.geometry)
    }

    /// Keep the features for which `keep` returns true, preserving order.
    pub fn filter(self, mut keep: impl FnMut(&Feature<G>) -> bool) -> Self {
        Self {
            crs: self.crs,
            features: self.features.into_iter().filter(|feature| keep(feature)).collect(),
        }
    }

    /// Convert each geometry, tagging errors with the feature position.
    fn try_map_geometries<H>(self, mut convert: impl FnMut(G) -> Result<H>) -> Result<Layer<H>> {
        let features = self.features.into_iter().enumerate()
            .map(|(idx, feature)| Ok(Feature {
                geometry: convert(feature.geometry).with_context(|| format!("feature {idx}"))?,
                properties: feature.properties,
            }))
            .collect::<Result<Vec<_>>>()?;
        Ok(Layer { crs: self.crs, features })
    }
}

impl<G> Layer<G>
where
    G: MapCoords<f64, f64, Output = G>,
{
    /// Reproject every geometry into `target`. A no-op when the CRS already matches.
    pub fn to_crs(self, target: Crs) -> Result<Self> {
        if self.crs == target {
            return Ok(self);
        }
        let source = self.crs;
        let reproj = Reprojector::new(source, target)?;
        let mut layer = self.try_map_geometries(|geometry| reproj.apply(&geometry))
            .with_context(|| format!("[layer::to_crs] {source} -> {target}"))?;
        layer.crs = target;
        Ok(layer)
    }
}

impl VectorLayer {
    /// Require polygonal geometry, widening polygons to multipolygons.
    pub fn into_multipolygons(self) -> Result<CellLayer> {
        self.try_map_geometries(|geometry| match geometry {
            Geometry::MultiPolygon(mp) => Ok(mp),
            Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
            other => bail!("expected polygon geometry, found {}", geometry_name(&other)),
        })
    }

    /// Require point geometry.
    pub fn into_points(self) -> Result<PointLayer> {
        self.try_map_geometries(|geometry| match geometry {
            Geometry::Point(p) => Ok(p),
            other => bail!("expected point geometry, found {}", geometry_name(&other)),
        })
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
