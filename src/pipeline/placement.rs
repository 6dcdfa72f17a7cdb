use anyhow::{ensure, Result};
use serde_json::json;
use tracing::{debug, info};

use crate::geom::Geometries;
use crate::layer::{CellLayer, PointLayer};

/// Attribute holding the number of turbine placements inside a cell.
pub const TURBINE_FIELD: &str = "theo_turbines";

/// Attribute holding the number of PV placements inside a cell.
pub const PV_FIELD: &str = "theo_pv";

/// Count the placements of each category strictly within each cell.
///
/// Every cell receives both count attributes, zero where no point falls inside.
/// Points on a shared cell edge count for neither cell. All three layers must
/// already share a CRS; this is checked before any counting.
pub fn count_placements(mut cells: CellLayer, turbines: &PointLayer, pv: &PointLayer) -> Result<CellLayer> {
    for (label, points) in [("turbine", turbines), ("pv", pv)] {
        ensure!(
            points.crs() == cells.crs(),
            "[pipeline::count_placements] {label} placements are in {} but cells are in {}",
            points.crs(), cells.crs()
        );
    }

    let shapes: Vec<_> = cells.geometries().cloned().collect();
    let index = Geometries::new(&shapes);

    info!(" - Joining turbine locations...");
    let turbine_counts = index.count_within(turbines.geometries());

    info!(" - Joining pv locations...");
    let pv_counts = index.count_within(pv.geometries());

    debug!(
        "{} of {} turbines and {} of {} pv plants fell inside a cell",
        turbine_counts.iter().sum::<u64>(), turbines.len(),
        pv_counts.iter().sum::<u64>(), pv.len(),
    );

    for ((feature, turbines), pv) in cells.features_mut().iter_mut().zip(turbine_counts).zip(pv_counts) {
        feature.properties.insert(TURBINE_FIELD.to_string(), json!(turbines));
        feature.properties.insert(PV_FIELD.to_string(), json!(pv));
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Crs;
    use crate::layer::{Feature, Properties};
    use geo::{point, polygon, MultiPolygon, Point};

    fn cell(x0: f64) -> Feature<MultiPolygon<f64>> {
        Feature::new(
            MultiPolygon(vec![polygon![(x: x0, y: 0.0), (x: x0 + 1.0, y: 0.0), (x: x0 + 1.0, y: 1.0), (x: x0, y: 1.0)]]),
            Properties::new(),
        )
    }

    fn points(crs: Crs, coords: &[Point<f64>]) -> PointLayer {
        PointLayer::new(crs, coords.iter().map(|&p| Feature::new(p, Properties::new())).collect())
    }

    fn counts(cells: &CellLayer, field: &str) -> Vec<u64> {
        cells.features().iter().map(|f| f.properties[field].as_u64().unwrap()).collect()
    }

    #[test]
    fn single_point_in_first_of_three_cells() {
        let cells = CellLayer::new(Crs::WGS84, vec![cell(0.0), cell(1.0), cell(2.0)]);
        let turbines = points(Crs::WGS84, &[point!(x: 0.5, y: 0.5)]);
        let pv = points(Crs::WGS84, &[]);

        let joined = count_placements(cells, &turbines, &pv).unwrap();
        assert_eq!(counts(&joined, TURBINE_FIELD), vec![1, 0, 0]);
        assert_eq!(counts(&joined, PV_FIELD), vec![0, 0, 0]);
    }

    #[test]
    fn counts_are_per_category() {
        let cells = CellLayer::new(Crs::WGS84, vec![cell(0.0), cell(1.0)]);
        let turbines = points(Crs::WGS84, &[point!(x: 1.5, y: 0.5), point!(x: 1.2, y: 0.2), point!(x: 9.0, y: 9.0)]);
        let pv = points(Crs::WGS84, &[point!(x: 0.1, y: 0.9), point!(x: 1.0, y: 0.5)]);

        let joined = count_placements(cells, &turbines, &pv).unwrap();
        assert_eq!(counts(&joined, TURBINE_FIELD), vec![0, 2]);
        // The second pv point sits on the shared edge and is in neither cell.
        assert_eq!(counts(&joined, PV_FIELD), vec![1, 0]);
    }

    #[test]
    fn existing_attributes_are_kept() {
        let mut first = cell(0.0);
        first.properties.insert("h3_index".into(), json!("8a2a1072b59ffff"));
        let cells = CellLayer::new(Crs::WGS84, vec![first]);

        let joined = count_placements(cells, &points(Crs::WGS84, &[]), &points(Crs::WGS84, &[])).unwrap();
        assert_eq!(joined.features()[0].properties["h3_index"], json!("8a2a1072b59ffff"));
    }

    #[test]
    fn crs_mismatch_is_rejected() {
        let cells = CellLayer::new(Crs::WGS84, vec![cell(0.0)]);
        let utm = Crs::from_epsg(32633);

        let err = count_placements(cells, &points(utm, &[]), &points(Crs::WGS84, &[])).unwrap_err();
        assert!(err.to_string().contains("turbine placements are in EPSG:32633"));
    }
}
