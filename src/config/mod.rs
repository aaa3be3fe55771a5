//! Config module (modularized).
//! Provides configuration types, default paths, XML loading, validation and the
//! process-wide configuration read by the location operations.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor, CONFIG_ENV};
pub use types::{Config, LogLevel};
pub use xml::{load_config_from_xml, load_config_from_xml_path, parse_config_xml};

use std::sync::OnceLock;
use tracing::warn;

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// The process-wide configuration.
///
/// Loaded lazily from XML on first use. A file that fails to load or validate is
/// reported at `warn` and defaults are used instead.
pub fn global() -> &'static Config {
    GLOBAL.get_or_init(|| match load_config_from_xml().and_then(|c| {
        if let Some(cfg) = &c {
            cfg.validate()?;
        }
        Ok(c)
    }) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => Config::default(),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "ignoring config file; using defaults");
            Config::default()
        }
    })
}

/// Install `cfg` as the process-wide configuration before first use.
///
/// Returns `cfg` back if a configuration was already in place.
pub fn install(cfg: Config) -> Result<(), Config> {
    GLOBAL.set(cfg)
}
