use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;

use followsweep::cli::args::{Cli, Commands};
use followsweep::cli::commands::{self, Context};
use followsweep::config::{Config, Paths};
use followsweep::error::SweepError;
use followsweep::session::SessionStore;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        let code = e.downcast_ref::<SweepError>().map_or(1, SweepError::exit_code);
        std::process::exit(code);
    }
}

/// Logs go to stderr so JSON on stdout stays clean. `RUST_LOG` wins over `-v`.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let paths = Paths::default();
    let config = Config::load_from_path(&paths.config_file).context("Failed to load configuration")?;
    let format = cli.output.unwrap_or(config.general.default_output);
    let store = SessionStore::new(config.session_path(cli.session, &paths));
    log::debug!("Using session file {}", store.path().display());

    let ctx = Context::new(config, store, format);

    let output = match cli.command {
        Commands::Import { file, force } => commands::import(&ctx, &file, force)?,
        Commands::Status => commands::status(&ctx)?,
        Commands::Queue => commands::queue(&ctx)?,
        Commands::Current => commands::current(&ctx)?,
        Commands::Open { no_browser } => commands::open(&ctx, no_browser)?,
        Commands::Complete => commands::complete(&ctx)?,
        Commands::Skip => commands::skip(&ctx)?,
        Commands::Walk { mode, no_browser } => commands::walk(&ctx, mode, no_browser)?,
        Commands::Reset => commands::reset(&ctx)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
