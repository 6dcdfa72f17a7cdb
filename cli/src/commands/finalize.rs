use anyhow::Result;
use tracing::{info, warn};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::FinalizeArgs) -> Result<()> {
    let (layout, settings) = super::context(cli)?;
    let reports = siteprep::finalize(&layout, &settings, &args.countries, &args.isocodes)?;

    let skipped: Vec<_> = reports.iter()
        .filter(|report| !report.cleaned.is_written())
        .map(|report| report.country.as_str())
        .collect();
    if !skipped.is_empty() {
        warn!("no final cells written for: {}", skipped.join(", "));
    }
    info!("finalized {} of {} countries", reports.len() - skipped.len(), reports.len());
    Ok(())
}
