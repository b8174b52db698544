//! Application settings
//!
//! Engine tunables plus where records and the ability catalog live.

mod config;
mod loader;

pub use config::{AppConfig, StorageConfig};
pub use loader::{load_catalog, load_config};
