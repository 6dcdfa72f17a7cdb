pub mod finalize;
pub mod prepare;

use anyhow::Result;
use siteprep::{Layout, Settings};

/// Resolve the project layout and settings shared by every command.
fn context(cli: &crate::cli::Cli) -> Result<(Layout, Settings)> {
    let layout = Layout::new(cli.root.clone().unwrap_or_else(|| ".".into()));
    let settings = Settings::load(cli.config.as_deref())?;
    Ok((layout, settings))
}
