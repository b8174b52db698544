//! Holocron - Force Progression Engine
//!
//! CLI entry point for driving progression records on disk.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod settings;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holocron=warn,holocron_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    let config = settings::load_config()?;
    debug!("Starting Holocron v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli::run(cli, config) {
        match e.downcast_ref::<holocron_core::Error>() {
            Some(error) => eprint!("{}", holocron_core::format_error_for_cli(error)),
            None => eprintln!("❌ {e:#}"),
        }
        std::process::exit(1);
    }
    Ok(())
}
