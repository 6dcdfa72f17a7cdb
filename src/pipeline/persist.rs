use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use tracing::warn;

use crate::io::{write_geojson, write_raw_geojson};
use crate::layer::CellLayer;
use super::feature_count;

/// Cells in either of the two in-memory shapes the pipeline produces.
#[derive(Debug, Clone, Copy)]
pub enum CellData<'a> {
    /// An untyped feature collection, written without validation.
    Raw(&'a Value),
    /// A typed cell layer.
    Table(&'a CellLayer),
}

/// What `update_cells` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { features: usize },
    /// Nothing was written because there were no cells.
    Skipped,
}

impl WriteOutcome {
    #[inline] pub fn is_written(self) -> bool { matches!(self, Self::Written { .. }) }
}

/// Write cells to `path` as GeoJSON.
///
/// Raw collections are written verbatim. An empty cell layer is not written: a
/// warning is emitted instead and `WriteOutcome::Skipped` returned.
pub fn update_cells(cells: CellData<'_>, path: &Path) -> Result<WriteOutcome> {
    match cells {
        CellData::Raw(tree) => {
            write_raw_geojson(tree, path)?;
            Ok(WriteOutcome::Written { features: feature_count(tree) })
        }
        CellData::Table(layer) if layer.is_empty() => {
            warn!(
                "Hex layer is empty. This can happen when the country is much smaller than the \
                 hexagon size used by the indexer; use smaller hexagons and retry. Not saving {}.",
                path.display()
            );
            Ok(WriteOutcome::Skipped)
        }
        CellData::Table(layer) => {
            write_geojson(layer, path)?;
            Ok(WriteOutcome::Written { features: layer.len() })
        }
    }
}
