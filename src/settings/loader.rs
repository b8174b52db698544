//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use holocron_core::AbilityTable;
use std::path::Path;
use tracing::{debug, warn};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Embedded ability catalog, used when the configured file is missing
pub const DEFAULT_ABILITIES: &str = include_str!("../../config/abilities.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        // prefix_separator("_") makes HOLOCRON_PROGRESSION__X work with a
        // single underscore after the prefix.
        .add_source(
            Environment::with_prefix("HOLOCRON")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let app: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    app.progression.validate()?;
    Ok(app)
}

/// Load the ability catalog, falling back to the embedded one
pub fn load_catalog(path: &Path) -> Result<AbilityTable> {
    let table = if path.exists() {
        AbilityTable::load(path)?
    } else {
        warn!(path = ?path, "Ability catalog not found, using built-in catalog");
        AbilityTable::from_toml_str(DEFAULT_ABILITIES)?
    };
    debug!(abilities = table.len(), "Ability catalog loaded");
    Ok(table)
}
