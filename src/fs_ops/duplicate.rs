//! Numbered variants of a file name: `name`, `name (2)`, `name (3)`, ...
//!
//! Used where a name must be kept recognizable but cannot collide, e.g. entries moved
//! into a trash folder. The caller decides what "taken" means.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use tracing::trace;

use crate::errors::{LocationError, Result};

pub(crate) const MAX_TRIES: u64 = 10_000;

// Conservative filename limits (bytes/characters, platform-specific and approximate).
#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240;
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

/// First variant of `name` for which `taken` returns false.
///
/// Examples:
/// - "movie.mkv" -> "movie.mkv", "movie (2).mkv", "movie (3).mkv", ...
/// - ".env" -> ".env", ".env (2)"
/// - "archive.tar.gz" -> "archive.tar.gz", "archive.tar (2).gz"
pub(crate) fn first_free_name<F>(name: &OsStr, mut taken: F) -> Result<OsString>
where
    F: FnMut(&OsStr) -> bool,
{
    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    let ext: Option<OsString> = base.extension().map(|e| e.to_os_string());

    let first = build_name_with_suffix(&stem, ext.as_deref(), "");
    if !taken(&first) {
        return Ok(first);
    }

    for n in 2..=MAX_TRIES {
        let candidate = build_name_with_suffix(&stem, ext.as_deref(), &format!(" ({n})"));
        if !taken(&candidate) {
            return Ok(candidate);
        }
        if n == 4 {
            trace!(name = ?name, "numbered name: several collisions, still searching");
        }
    }
    Err(LocationError::Unknown(format!(
        "no free numbered variant of {:?} after {MAX_TRIES} tries",
        name
    )))
}

#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// `stem + suffix + ["." + ext]`, shrinking the stem so the result fits MAX_FILENAME_LEN.
fn build_name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let mut overhead = name_len_units(OsStr::new(suffix));
    let mut ext_part = OsString::new();
    if let Some(e) = ext {
        overhead = overhead.saturating_add(1 + name_len_units(e));
        ext_part.push(".");
        ext_part.push(e);
    }

    let mut stem_os = stem.to_os_string();
    if name_len_units(&stem_os) + overhead > MAX_FILENAME_LEN {
        let budget = MAX_FILENAME_LEN.saturating_sub(overhead).max(1);
        // Lossy for non-UTF-8 stems; truncation already changes the name.
        let lossy = stem.to_string_lossy();
        let mut acc = String::new();
        for ch in lossy.chars() {
            if acc.len() + ch.len_utf8() > budget {
                break;
            }
            acc.push(ch);
        }
        if acc.is_empty() {
            acc.push('f');
        }
        stem_os = OsString::from(acc);
    }

    let mut new_name = OsString::new();
    new_name.push(&stem_os);
    new_name.push(suffix);
    new_name.push(&ext_part);
    new_name
}
