//! Folio CLI - Compute daily library statistics.

use clap::Parser;
use folio_cli::commands;
use folio_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> folio_cli::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    init_tracing(cli.verbose, &config.settings.log_level);

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::List(args) => commands::execute_list(args, &formatter)?,
        Command::Run(args) => commands::execute_run(args, &config, &formatter)?,
        Command::Config => commands::execute_config(&config)?,
    }

    Ok(())
}

/// Log to stderr. `-v` forces debug, then `RUST_LOG`, then the configured level.
fn init_tracing(verbose: bool, configured: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
