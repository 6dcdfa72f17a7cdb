use std::path::PathBuf;

/// Siting input preparation CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "siteprep", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root holding data/, glaes/, ccg-spider/, inputs_*/, defaults to "."
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// TOML settings file overriding the defaults
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Stage boundaries, oceans, OSM layers and configs for the external tools
    Prepare(PrepareArgs),

    /// Attach placement counts and countries to hexagon cells, then clean up
    Finalize(FinalizeArgs),
}

#[derive(clap::Args, Debug)]
pub struct PrepareArgs {
    /// Country names as they appear in the world dataset, e.g. Kenya "Côte d'Ivoire"
    #[arg(required = true)]
    pub countries: Vec<String>,

    /// Also stage hydropower plants and use the hydro config template
    #[arg(long)]
    pub hydro: bool,
}

#[derive(clap::Args, Debug)]
pub struct FinalizeArgs {
    /// Country names, in the same order as --isocodes
    #[arg(required = true)]
    pub countries: Vec<String>,

    /// Short codes naming the final files, one per country, e.g. KE CI
    #[arg(long, required = true, num_args = 1..)]
    pub isocodes: Vec<String>,
}
