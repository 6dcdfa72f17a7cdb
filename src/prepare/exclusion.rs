use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::common::write_atomic;
use crate::geom::Crs;
use crate::layout::Layout;
use crate::settings::Settings;

/// Land-cover raster classes excluded from siting.
pub mod land_cover {
    pub const CROPLAND: u8 = 40;
    pub const BUILT_UP: u8 = 50;
    pub const PERMANENT_WATER: u8 = 80;
    pub const HERBACEOUS_WETLAND: u8 = 90;
}

/// Turbines are laid out on a grid rotated this far from north.
const TURBINE_AXIAL_DIRECTION_DEG: f64 = 45.0;

/// Minimum spacing between placed items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Separation {
    Uniform(f64),
    /// Spacing along and across the axial direction.
    Axial(f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ExclusionStep {
    ExcludeVector { source: PathBuf, buffer_m: f64 },
    ExcludeRaster { source: PathBuf, value: u8, prewarp: bool },
    Save { output: PathBuf },
    DistributeItems {
        output: PathBuf,
        separation_m: Separation,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        axial_direction_deg: Option<f64>,
    },
}

/// An ordered list of exclusion and placement steps for the external land-eligibility tool.
/// Wind steps come first; PV steps build on the wind exclusions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionJob {
    pub country: String,
    pub region: PathBuf,
    pub srs: u32,
    pub pixel_size_m: f64,
    pub steps: Vec<ExclusionStep>,
}

impl ExclusionJob {
    pub fn build(layout: &Layout, settings: &Settings, country: &str, utm: Crs) -> Self {
        let clc = layout.land_cover(country);
        let raster = |value| ExclusionStep::ExcludeRaster { source: clc.clone(), value, prewarp: true };
        let radius = settings.turbine_radius_m;

        let steps = vec![
            ExclusionStep::ExcludeVector {
                source: layout.exclusion_oceans(country),
                buffer_m: settings.coast_buffer_m,
            },
            raster(land_cover::HERBACEOUS_WETLAND),
            raster(land_cover::BUILT_UP),
            raster(land_cover::PERMANENT_WATER),
            ExclusionStep::Save { output: layout.wind_exclusions(country) },
            ExclusionStep::DistributeItems {
                output: layout.turbine_placements(country),
                separation_m: Separation::Axial(radius * 10.0, radius * 5.0),
                axial_direction_deg: Some(TURBINE_AXIAL_DIRECTION_DEG),
            },
            raster(land_cover::CROPLAND),
            ExclusionStep::Save { output: layout.pv_exclusions(country) },
            ExclusionStep::DistributeItems {
                output: layout.pv_placements(country),
                separation_m: Separation::Uniform(settings.pv_separation_m),
                axial_direction_deg: None,
            },
        ];

        Self {
            country: country.to_string(),
            region: layout.boundary_utm(country),
            srs: utm.epsg(),
            pixel_size_m: settings.pixel_size_m,
            steps,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)
            .context("[prepare::ExclusionJob::write] Failed to serialize job")?;
        write_atomic(path, &bytes)
    }
}
