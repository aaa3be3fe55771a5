//! Metadata application and preservation.
//! - `apply_attributes` writes caller-supplied attributes onto a fresh entry.
//! - `preserve_metadata` copies timestamps (atime, mtime) and permission bits from a
//!   copy source onto its destination. Best-effort: failures are logged and ignored.
//! - `preserve_xattrs` mirrors extended attributes when the `xattrs` feature is on.

use filetime::{set_file_times, set_file_mtime, FileTime};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

use crate::errors::Result;
use crate::location::Attributes;
use crate::platform;

use super::helpers::io_error_with_help;

/// Apply `attrs` to `path`. Unlike metadata preservation, failures here are errors:
/// the caller asked for these attributes explicitly.
pub(crate) fn apply_attributes(path: &Path, attrs: &Attributes) -> Result<()> {
    if attrs.is_empty() {
        return Ok(());
    }
    if let Some(mode) = attrs.permissions {
        platform::set_mode(path, mode).map_err(io_error_with_help("set permissions", path))?;
    }
    if let Some(modified) = attrs.modified {
        set_file_mtime(path, FileTime::from_system_time(modified))
            .map_err(io_error_with_help("set modification date", path))?;
    }
    // Locking last: a locked entry may refuse the other changes.
    if let Some(locked) = attrs.locked {
        platform::set_locked(path, locked).map_err(io_error_with_help("set locked flag", path))?;
    }
    trace!(path = %path.display(), ?attrs, "applied attributes");
    Ok(())
}

/// Preserve timestamps and permission bits on `dest` using already-fetched `src_meta`.
pub(crate) fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let mt = FileTime::from_unix_time(src_meta.mtime(), src_meta.mtime_nsec() as u32);
        let at = FileTime::from_unix_time(src_meta.atime(), src_meta.atime_nsec() as u32);
        if let Err(e) = set_file_times(dest, at, mt) {
            warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination");
        } else {
            trace!(path = %dest.display(), "set atime/mtime on destination");
        }
    }
    #[cfg(not(unix))]
    {
        let at = src_meta.accessed().ok().map(FileTime::from_system_time);
        let mt = src_meta.modified().ok().map(FileTime::from_system_time);
        if let (Some(a), Some(m)) = (at, mt) {
            if let Err(e) = set_file_times(dest, a, m) {
                warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination");
            }
        }
    }

    let src_mode = platform::mode(src_meta);
    if let Err(e) = platform::set_mode(dest, src_mode) {
        warn!(path = %dest.display(), mode = format!("{:o}", src_mode), error = %e, "failed to set permissions on destination");
    } else {
        trace!(path = %dest.display(), mode = format!("{:o}", src_mode), "set permissions on destination");
    }
}

/// Preserve extended attributes from `src` to `dest`.
/// Requires the "xattrs" feature, otherwise a no-op. Failures are logged and skipped.
pub(crate) fn preserve_xattrs(src: &Path, dest: &Path) {
    #[cfg(feature = "xattrs")]
    {
        match xattr::list(src) {
            Ok(names) => {
                for name in names {
                    let name_disp = name.to_string_lossy().into_owned();
                    match xattr::get(src, &name) {
                        Ok(value) => {
                            let value = value.unwrap_or_default();
                            if let Err(e) = xattr::set(dest, &name, &value) {
                                warn!(src = %src.display(), dest = %dest.display(), xattr = %name_disp, error = %e, "failed to set xattr on destination");
                            } else {
                                trace!(dest = %dest.display(), xattr = %name_disp, size = value.len(), "preserved xattr");
                            }
                        }
                        Err(e) => {
                            warn!(src = %src.display(), xattr = %name_disp, error = %e, "failed to read xattr value from source");
                        }
                    }
                }
            }
            Err(e) => {
                warn!(src = %src.display(), error = %e, "failed to list xattrs; continuing");
            }
        }
    }
    #[cfg(not(feature = "xattrs"))]
    {
        let _ = (src, dest);
    }
}
