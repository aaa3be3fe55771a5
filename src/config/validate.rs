//! Config validation logic.
//! Checks that configured paths are usable before anything relies on them.

use anyhow::{bail, Context, Result};
use std::path::{Component, Path};
use tracing::debug;

use super::paths::path_has_symlink_ancestor;
use super::types::Config;
use crate::location::PathState;

impl Config {
    /// Validate the trash override, the log file location and the temporary prefix.
    pub fn validate(&self) -> Result<()> {
        if let Some(trash) = &self.trash_dir
            && PathState::of(trash) == PathState::File
        {
            bail!("trash_dir '{}' is a file", trash.display());
        }

        if let Some(log) = &self.log_file {
            if PathState::of(log) == PathState::Folder {
                bail!("log_file '{}' is a folder", log.display());
            }
            let linked = path_has_symlink_ancestor(log)
                .with_context(|| format!("inspect ancestors of '{}'", log.display()))?;
            if linked {
                bail!(
                    "log_file '{}' is reached through a symlinked folder",
                    log.display()
                );
            }
        }

        ensure_single_component(&self.temp_prefix)?;

        debug!(
            log_level = %self.log_level,
            log_file = ?self.log_file,
            trash_dir = ?self.trash_dir,
            temp_prefix = %self.temp_prefix,
            "config validated"
        );
        Ok(())
    }
}

fn ensure_single_component(prefix: &str) -> Result<()> {
    let mut comps = Path::new(prefix).components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(c)), None) if c == prefix => Ok(()),
        _ => bail!("temp_prefix '{prefix}' must be a single non-empty name"),
    }
}
