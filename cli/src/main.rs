mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{finalize, prepare};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    setup_logging(cli.verbose);
    match &cli.command {
        Commands::Prepare(args) => prepare::run(&cli, args),
        Commands::Finalize(args) => finalize::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
