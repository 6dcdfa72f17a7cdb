use anyhow::{ensure, Result};
use serde_json::json;
use tracing::debug;

use crate::layer::{CellLayer, Countries, Feature, Layer};

/// Attribute holding the country a cell row belongs to.
pub const COUNTRY_FIELD: &str = "country";

/// Join every cell to every country it intersects.
///
/// Output rows are ordered by cell, then by country. A cell straddling a border
/// yields one row per country; those duplicates are resolved by boundary
/// cleanup. Cells touching no country are dropped.
pub fn assign_country(cells: &CellLayer, countries: &Countries) -> Result<CellLayer> {
    ensure!(
        cells.crs() == countries.crs(),
        "[pipeline::assign_country] cells are in {} but countries are in {}",
        cells.crs(), countries.crs()
    );

    let mut rows = Vec::with_capacity(cells.len());
    let mut unmatched = 0usize;
    for feature in cells.features() {
        let before = rows.len();
        for name in countries.intersecting(&feature.geometry) {
            let mut properties = feature.properties.clone();
            properties.insert(COUNTRY_FIELD.to_string(), json!(name));
            rows.push(Feature::new(feature.geometry.clone(), properties));
        }
        if rows.len() == before {
            unmatched += 1;
        }
    }

    debug!("{} cells produced {} country rows ({unmatched} cells outside every country)", cells.len(), rows.len());

    Ok(Layer::new(cells.crs(), rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Crs;
    use crate::layer::{CountryNaming, Properties};
    use geo::{polygon, MultiPolygon};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]])
    }

    fn countries(naming: CountryNaming) -> Countries {
        let feature = |name: &str, shape| {
            let mut properties = Properties::new();
            properties.insert("NAME".into(), json!(name));
            Feature::new(shape, properties)
        };
        let layer = CellLayer::new(Crs::WGS84, vec![
            feature("A", rect(0.0, 0.0, 10.0, 10.0)),
            feature("Bé", rect(10.0, 0.0, 20.0, 10.0)),
        ]);
        Countries::from_layer(layer, "NAME", naming).unwrap()
    }

    fn cell(id: u64, shape: MultiPolygon<f64>) -> Feature<MultiPolygon<f64>> {
        let mut properties = Properties::new();
        properties.insert("id".into(), json!(id));
        Feature::new(shape, properties)
    }

    #[test]
    fn straddling_cell_yields_one_row_per_country() {
        let cells = CellLayer::new(Crs::WGS84, vec![
            cell(0, rect(1.0, 1.0, 2.0, 2.0)),
            cell(1, rect(9.0, 1.0, 11.0, 2.0)),
            cell(2, rect(50.0, 50.0, 51.0, 51.0)),
        ]);

        let rows = assign_country(&cells, &countries(CountryNaming::Clean)).unwrap();
        let tags: Vec<_> = rows.features().iter()
            .map(|f| (f.properties["id"].as_u64().unwrap(), f.get_str(COUNTRY_FIELD).unwrap().to_string()))
            .collect();

        assert_eq!(tags, vec![(0, "A".to_string()), (1, "A".to_string()), (1, "Be".to_string())]);
    }

    #[test]
    fn raw_naming_keeps_dataset_spelling() {
        let cells = CellLayer::new(Crs::WGS84, vec![cell(0, rect(12.0, 1.0, 13.0, 2.0))]);

        let rows = assign_country(&cells, &countries(CountryNaming::Raw)).unwrap();
        assert_eq!(rows.features()[0].get_str(COUNTRY_FIELD), Some("Bé"));
    }

    #[test]
    fn crs_mismatch_is_rejected() {
        let cells = CellLayer::new(Crs::from_epsg(32633), vec![cell(0, rect(1.0, 1.0, 2.0, 2.0))]);
        assert!(assign_country(&cells, &countries(CountryNaming::Clean)).is_err());
    }
}
