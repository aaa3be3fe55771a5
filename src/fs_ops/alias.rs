//! Alias (bookmark) files.
//!
//! An alias is a small XML document that names another entry by absolute path. Unlike a
//! symbolic link it is an ordinary file, so it survives copies to filesystems without
//! link support and is never followed implicitly.

use chrono::{Local, SecondsFormat};
use quick_xml::de::from_str as from_xml_str;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{LocationError, Result};
use crate::location::path::{path_bytes, path_from_bytes, percent_decode, percent_encode};
use crate::location::PathState;

use super::helpers::io_error_with_help;

pub(crate) const ROOT_ELEMENT: &str = "fs_location_bookmark";
pub(crate) const FORMAT_VERSION: &str = "1";
const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
/// Bookmarks are tiny; anything bigger is not one of ours.
const MAX_BOOKMARK_LEN: u64 = 64 * 1024;
const SNIFF_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "fs_location_bookmark")]
#[serde(deny_unknown_fields)]
pub(crate) struct Bookmark {
    #[serde(rename = "@version")]
    pub version: String,
    /// Percent-encoded path bytes, so non-UTF-8 names survive.
    pub target: String,
    pub kind: String,
    pub created: String,
}

impl Bookmark {
    /// The decoded target path; `None` if the stored value is malformed.
    pub(crate) fn target_path(&self) -> Option<PathBuf> {
        percent_decode(&self.target).and_then(path_from_bytes)
    }
}

/// Write a bookmark for `target` at `dest`. `dest` must not exist.
pub(crate) fn write_bookmark(target: &Path, kind: PathState, dest: &Path) -> Result<()> {
    let bookmark = Bookmark {
        version: FORMAT_VERSION.to_string(),
        target: percent_encode(&path_bytes(target)),
        kind: kind.to_string(),
        created: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
    };
    let body = quick_xml::se::to_string(&bookmark)
        .map_err(|e| LocationError::Unknown(format!("serialize bookmark for '{}': {e}", target.display())))?;

    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| LocationError::CouldNotCreateFile {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;
    f.write_all(XML_DECL.as_bytes())
        .and_then(|_| f.write_all(body.as_bytes()))
        .and_then(|_| f.write_all(b"\n"))
        .map_err(io_error_with_help("write bookmark", dest))?;

    info!(alias = %dest.display(), target_path = %target.display(), kind = %kind, "alias created");
    Ok(())
}

/// Parse `path` as a bookmark. `Ok(None)` when it is a readable file of some other kind.
pub(crate) fn read_bookmark(path: &Path) -> Result<Option<Bookmark>> {
    let meta = fs::metadata(path).map_err(io_error_with_help("stat alias", path))?;
    if !meta.is_file() || meta.len() > MAX_BOOKMARK_LEN {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(io_error_with_help("read alias", path))?;
    let Ok(text) = String::from_utf8(bytes) else {
        return Ok(None);
    };
    if !text.contains(ROOT_ELEMENT) {
        return Ok(None);
    }
    match from_xml_str::<Bookmark>(&text) {
        Ok(b) if b.version == FORMAT_VERSION => Ok(Some(b)),
        Ok(b) => {
            debug!(path = %path.display(), version = %b.version, "unsupported bookmark version");
            Ok(None)
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "not a bookmark");
            Ok(None)
        }
    }
}

/// Cheap check: a regular file whose head names our root element and which parses.
pub(crate) fn is_bookmark(path: &Path) -> bool {
    let Ok(mut f) = fs::File::open(path) else {
        return false;
    };
    let mut head = [0u8; SNIFF_LEN];
    let n = f.read(&mut head).unwrap_or(0);
    let needle = ROOT_ELEMENT.as_bytes();
    if !head[..n].windows(needle.len()).any(|w| w == needle) {
        return false;
    }
    matches!(read_bookmark(path), Ok(Some(_)))
}
