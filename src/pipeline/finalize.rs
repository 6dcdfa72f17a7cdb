use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use tracing::{info, warn};

use crate::common::{clean_country_name, remove_if_exists, require_file_exists};
use crate::io::read_layer;
use crate::layer::Countries;
use crate::layout::Layout;
use crate::settings::Settings;
use super::{assign_country, count_placements, feature_count, remove_extra_cells, update_cells, CellData, WriteOutcome};

/// Every file one country's finalization reads or writes.
#[derive(Debug, Clone)]
pub struct CountryInputs {
    /// Clean country name; also the target of boundary cleanup.
    pub country: String,
    pub hex: PathBuf,
    pub turbines: PathBuf,
    pub pv: PathBuf,
    /// Cells with placement counts.
    pub combined: PathBuf,
    /// Country-attributed, then cleaned, cells.
    pub output: PathBuf,
}

impl CountryInputs {
    /// Standard paths for a clean country name and its short code.
    pub fn from_layout(layout: &Layout, country: &str, code: &str) -> Self {
        Self {
            country: country.to_string(),
            hex: layout.hex_cells(country),
            turbines: layout.turbine_placements(country),
            pv: layout.pv_placements(country),
            combined: layout.combined_cells(country),
            output: layout.final_cells(code),
        }
    }
}

/// Per-stage write results for one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeReport {
    pub country: String,
    pub combined: WriteOutcome,
    pub attributed: WriteOutcome,
    pub cleaned: WriteOutcome,
}

/// Load the world boundary dataset as a country index.
pub fn load_countries(path: &Path, settings: &Settings) -> Result<Countries> {
    require_file_exists(path)?;
    let layer = read_layer(path)?
        .into_multipolygons()
        .with_context(|| format!("[pipeline::load_countries] {}", path.display()))?;
    Countries::from_layer(layer, &settings.world_name_field, settings.country_naming)
}

/// Finalize each country in turn, pairing it with the short code at the same position.
///
/// The code list is checked before any processing: fewer codes than countries is
/// an error, extra codes are ignored. The first failing country aborts the run.
pub fn finalize(layout: &Layout, settings: &Settings, countries: &[String], codes: &[String]) -> Result<Vec<FinalizeReport>> {
    ensure!(
        codes.len() >= countries.len(),
        "[pipeline::finalize] {} countries given but only {} short codes; codes name the final files and are matched by position",
        countries.len(), codes.len()
    );
    if codes.len() > countries.len() {
        warn!("ignoring {} unused short codes: {:?}", codes.len() - countries.len(), &codes[countries.len()..]);
    }

    let world = load_countries(&layout.world(settings), settings)?;

    countries.iter().zip(codes)
        .map(|(country, code)| {
            let inputs = CountryInputs::from_layout(layout, &clean_country_name(country), code);
            finalize_country(&inputs, &world)
        })
        .collect()
}

/// Run placement join, country attribution and boundary cleanup for one country.
pub fn finalize_country(inputs: &CountryInputs, world: &Countries) -> Result<FinalizeReport> {
    let country = inputs.country.as_str();

    // Step 1 - attach placement counts to cells
    info!("Combining placements and cells for {country}:");
    info!(" - Loading files...");
    let hex = read_layer(&inputs.hex)?.into_multipolygons()
        .with_context(|| format!("[pipeline::finalize_country] {}", inputs.hex.display()))?;
    let turbines = read_layer(&inputs.turbines)?.into_points()
        .with_context(|| format!("[pipeline::finalize_country] {}", inputs.turbines.display()))?;
    let pv = read_layer(&inputs.pv)?.into_points()
        .with_context(|| format!("[pipeline::finalize_country] {}", inputs.pv.display()))?;
    ensure!(
        turbines.crs() == pv.crs(),
        "[pipeline::finalize_country] turbine placements ({}) and pv placements ({}) disagree on CRS",
        turbines.crs(), pv.crs()
    );

    let cells = count_placements(hex.to_crs(pv.crs())?, &turbines, &pv)?;
    let combined = update_cells(CellData::Table(&cells), &inputs.combined)?;
    info!("Done! File saved");

    // Step 2 - tag cells with the countries they intersect
    info!("Assigning countries to cells...");
    let cells = cells.to_crs(world.crs())?;
    let attributed_cells = assign_country(&cells, world)?;
    let attributed = update_cells(CellData::Table(&attributed_cells), &inputs.output)?;

    // Step 3 - drop rows for neighbouring countries
    info!("Removing duplicated cells...");
    let cleaned = if attributed.is_written() {
        let kept = remove_extra_cells(&inputs.output, country)?;
        if feature_count(&kept) == 0 {
            warn!(
                "No cells remain for {country} after removing other countries; check the country \
                 name normalisation and the hexagon size. Not saving {}.",
                inputs.output.display()
            );
            WriteOutcome::Skipped
        } else {
            update_cells(CellData::Raw(&kept), &inputs.output)?
        }
    } else {
        WriteOutcome::Skipped
    };

    if cleaned.is_written() {
        info!("Done! File saved");
    } else if remove_if_exists(&inputs.output)? {
        warn!("removed incomplete output {}", inputs.output.display());
    }

    Ok(FinalizeReport { country: inputs.country.clone(), combined, attributed, cleaned })
}
