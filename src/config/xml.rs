//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Unknown XML fields are rejected to surface misconfigurations early.
//! - Empty elements count as unset.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};
use crate::location::path::expand_tilde;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    log_json: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    preserve_metadata: Option<bool>,
    temp_prefix: Option<String>,
    trash_dir: Option<String>,
}

// Booleans tolerate surrounding whitespace; anything unparseable is treated as unset.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<bool>().ok()))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn xml_path(s: Option<&str>) -> Result<Option<PathBuf>> {
    match non_empty(s) {
        Some(raw) => {
            let p = expand_tilde(Path::new(raw)).with_context(|| format!("expand '{raw}'"))?;
            Ok(Some(p))
        }
        None => Ok(None),
    }
}

// Map XmlConfig -> Config
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = xml_path(parsed.log_file.as_deref())?;
    cfg.trash_dir = xml_path(parsed.trash_dir.as_deref())?;
    if let Some(s) = non_empty(parsed.temp_prefix.as_deref()) {
        cfg.temp_prefix = s.to_string();
    }
    if let Some(b) = parsed.log_json {
        cfg.log_json = b;
    }
    if let Some(b) = parsed.preserve_metadata {
        cfg.preserve_metadata = b;
    }
    Ok(cfg)
}

/// Parse a Config from an XML document.
pub fn parse_config_xml(contents: &str) -> Result<Config> {
    let parsed: XmlConfig = from_xml_str(contents).context("parse config xml")?;
    xml_to_config(parsed)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    parse_config_xml(&contents).with_context(|| format!("load config xml '{}'", path.display()))
}

/// Load from `$FS_LOCATION_CONFIG` or the default path. `Ok(None)` if the file is missing.
pub fn load_config_from_xml() -> Result<Option<Config>> {
    let Some(path) = default_config_path() else {
        debug!("no config path available; using defaults");
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "config file not found; using defaults");
        return Ok(None);
    }
    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "config loaded");
    Ok(Some(cfg))
}
