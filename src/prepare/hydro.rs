//! Hydropower plant list to point layer.

use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::Point;
use polars::prelude::{AnyValue, DataType};
use serde_json::{Number, Value};
use tracing::info;

use crate::geom::Crs;
use crate::io::read_csv;
use crate::layer::{Feature, PointLayer, Properties};

/// Columns kept from the plant list, in output order.
pub const HYDRO_COLUMNS: [&str; 9] = [
    "id", "lat", "lon", "name", "type", "capacity", "avg_annual_generation_GWh", "head", "country_code",
];

/// Row counts at each filtering stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydroSummary {
    pub rows: usize,
    /// Rows with both coordinates.
    pub located: usize,
    /// Located rows with a known head.
    pub kept: usize,
}

/// Load a plant list as WGS84 points.
///
/// Coordinates that do not parse as numbers become missing and their rows are
/// dropped, as are rows without a `head`. A non-numeric `capacity` is an error.
pub fn load_hydropower(path: &Path) -> Result<(PointLayer, HydroSummary)> {
    let df = read_csv(path)?;
    let mut df = df.select(HYDRO_COLUMNS)
        .with_context(|| format!("[prepare::load_hydropower] missing columns in {}", path.display()))?;

    let lon = df.column("lon")?.cast(&DataType::Float64)?;
    let lat = df.column("lat")?.cast(&DataType::Float64)?;
    let capacity = df.column("capacity")?.as_materialized_series().strict_cast(&DataType::Float64)
        .with_context(|| format!("[prepare::load_hydropower] capacity must be numeric in {}", path.display()))?;
    df.with_column(lon)?;
    df.with_column(lat)?;
    df.with_column(capacity)?;

    let rows = df.height();
    let located_mask = df.column("lon")?.is_not_null() & df.column("lat")?.is_not_null();
    let df = df.filter(&located_mask)?;
    let located = df.height();
    let df = df.filter(&df.column("head")?.is_not_null())?;
    let summary = HydroSummary { rows, located, kept: df.height() };

    let lon = df.column("lon")?.f64()?;
    let lat = df.column("lat")?.f64()?;
    let columns = df.get_columns();

    let features = (0..df.height())
        .map(|row| {
            let (Some(x), Some(y)) = (lon.get(row), lat.get(row)) else {
                bail!("[prepare::load_hydropower] row {row} has no coordinates");
            };
            let properties = columns.iter()
                .map(|column| Ok((column.name().to_string(), any_value_to_json(column.get(row)?))))
                .collect::<Result<Properties>>()?;
            Ok(Feature::new(Point::new(x, y), properties))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        " - {} plants, {} without coordinates, {} without head",
        summary.rows, summary.rows - summary.located, summary.located - summary.kept
    );
    Ok((PointLayer::new(Crs::WGS84, features), summary))
}

fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => Number::from_f64(v as f64).map_or(Value::Null, Value::Number),
        AnyValue::Float64(v) => Number::from_f64(v).map_or(Value::Null, Value::Number),
        other => Value::String(other.to_string()),
    }
}
