use anyhow::{ensure, Result};
use geo::{BooleanOps, MultiPolygon};

use crate::geom::Geometries;
use crate::layer::{CellLayer, Feature};

/// Clip ocean polygons to the union of `mask`'s shapes.
/// Features that only touch the mask, or are clipped to nothing, are dropped.
pub fn clip_oceans(oceans: &CellLayer, mask: &CellLayer) -> Result<CellLayer> {
    ensure!(
        oceans.crs() == mask.crs(),
        "[prepare::clip_oceans] oceans ({}) and clip mask ({}) must share a CRS",
        oceans.crs(), mask.crs()
    );

    let Some(mask_shape) = mask.geometries().cloned().reduce(|a, b| a.union(&b)) else {
        return Ok(CellLayer::new(oceans.crs(), Vec::new()));
    };

    let shapes: Vec<MultiPolygon<f64>> = oceans.geometries().cloned().collect();
    let index = Geometries::new(&shapes);

    let features = index.intersecting(&mask_shape).into_iter()
        .filter_map(|idx| {
            let clipped = index.shapes()[idx].intersection(&mask_shape);
            (!clipped.0.is_empty()).then(|| Feature::new(clipped, oceans.features()[idx].properties.clone()))
        })
        .collect();

    Ok(CellLayer::new(oceans.crs(), features))
}
