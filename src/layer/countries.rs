use anyhow::{ensure, Result};
use geo::MultiPolygon;
use serde::Deserialize;
use tracing::warn;

use crate::common::clean_country_name;
use crate::geom::{Crs, Geometries};
use super::CellLayer;

/// How the country name is attached to cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryNaming {
    /// Attach `clean_country_name(name)`, matching cleaned target names.
    #[default]
    Clean,
    /// Attach the dataset's name verbatim.
    Raw,
}

impl CountryNaming {
    fn apply(self, name: &str) -> String {
        match self {
            Self::Clean => clean_country_name(name),
            Self::Raw => name.to_string(),
        }
    }
}

/// Country polygons with their names, spatially indexed.
#[derive(Debug, Clone)]
pub struct Countries {
    crs: Crs,
    names: Vec<String>,
    geoms: Geometries,
}

impl Countries {
    /// Build from a polygon layer, reading the name from `name_field`.
    /// Features without a string name can never match a country and are skipped;
    /// a layer where no feature has one is an error.
    pub fn from_layer(layer: CellLayer, name_field: &str, naming: CountryNaming) -> Result<Self> {
        let crs = layer.crs();
        let total = layer.len();
        let (names, shapes): (Vec<String>, Vec<MultiPolygon<f64>>) = layer.into_features().into_iter()
            .filter_map(|feature| {
                let name = naming.apply(feature.get_str(name_field)?);
                Some((name, feature.geometry))
            })
            .unzip();

        ensure!(
            total == 0 || !names.is_empty(),
            "[layer::Countries] none of {total} features has a string field '{name_field}'"
        );
        if names.len() < total {
            warn!("skipping {} of {total} countries without a '{name_field}' name", total - names.len());
        }

        Ok(Self { crs, names, geoms: Geometries::new(&shapes) })
    }

    #[inline] pub fn crs(&self) -> Crs { self.crs }

    #[inline] pub fn len(&self) -> usize { self.names.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.names.is_empty() }

    #[inline] pub fn names(&self) -> &[String] { &self.names }

    /// Names of every country intersecting `shape`, in dataset order.
    pub fn intersecting(&self, shape: &MultiPolygon<f64>) -> impl Iterator<Item = &str> {
        self.geoms.intersecting(shape).into_iter().map(|idx| self.names[idx].as_str())
    }
}
