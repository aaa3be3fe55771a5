//! Symbolic links.

use std::io;
use std::path::{Path, PathBuf};

use crate::errors::Result;

use super::helpers::io_error_with_help;

/// Create `link` pointing at `target`. Windows needs to know the target kind up front.
#[cfg(unix)]
pub(crate) fn symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
pub(crate) fn symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    if target_is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Canonical path with all links resolved. `dunce` keeps Windows paths free of the
/// `\\?\` prefix where it is safe to do so.
pub(crate) fn canonicalize(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(io_error_with_help("resolve links", path))
}
