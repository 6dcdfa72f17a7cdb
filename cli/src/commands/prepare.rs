use anyhow::Result;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::PrepareArgs) -> Result<()> {
    let (layout, settings) = super::context(cli)?;
    siteprep::prepare(&layout, &settings, &args.countries, args.hydro)
}
