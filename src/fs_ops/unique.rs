//! Collision-free names for temporary files and folders.
//!
//! Candidates look like `<prefix>_<token>[.<extension>]` with an 8-character random
//! token. A candidate is accepted when nothing occupies it. Nothing is reserved, so two
//! callers racing in the same folder can still pick the same name.

use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::{LocationError, Result};
use crate::location::path::validate_name;
use crate::location::state::{is_occupied, PathState};

pub const DEFAULT_PREFIX: &str = "tmp";
pub const TOKEN_LEN: usize = 8;
pub const MAX_ATTEMPTS: usize = 1000;

const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_+=#[]";

/// A fresh random token drawn from the filesystem-safe alphabet.
pub fn random_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Pick an unoccupied path inside `folder`.
pub fn unique_name(folder: &Path, prefix: &str, extension: Option<&str>) -> Result<PathBuf> {
    unique_name_with(folder, prefix, extension, random_token)
}

/// Same as [`unique_name`] with a caller-supplied token source.
pub fn unique_name_with<F>(
    folder: &Path,
    prefix: &str,
    extension: Option<&str>,
    mut next_token: F,
) -> Result<PathBuf>
where
    F: FnMut() -> String,
{
    if PathState::of(folder) != PathState::Folder {
        return Err(LocationError::FolderDoesNotExist(folder.to_path_buf()));
    }
    let extension = extension.map(|e| e.trim_start_matches('.')).filter(|e| !e.is_empty());

    for attempt in 1..=MAX_ATTEMPTS {
        let mut name = format!("{}_{}", prefix, next_token());
        if let Some(ext) = extension {
            name.push('.');
            name.push_str(ext);
        }
        validate_name(&name)?;

        let candidate = folder.join(&name);
        if !is_occupied(&candidate) {
            trace!(folder = %folder.display(), %name, attempt, "unique name picked");
            return Ok(candidate);
        }
        trace!(folder = %folder.display(), %name, attempt, "unique name collided");
    }

    Err(LocationError::CouldNotGenerateUniqueName {
        folder: folder.to_path_buf(),
        attempts: MAX_ATTEMPTS,
    })
}
