//! What currently lives at a path.
//!
//! Every call stats the path again. The filesystem is owned by somebody else, so
//! nothing here is cached.

use std::fmt;
use std::fs;
use std::path::Path;

/// Snapshot of the entry at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathState {
    Folder,
    File,
    /// Nothing (reachable) exists at the path.
    Unknown,
}

impl PathState {
    /// Classify `path`, following symbolic links like stat(2).
    ///
    /// Anything that is not a directory counts as a file, including sockets and
    /// device nodes. A dangling link is `Unknown`.
    pub fn of(path: &Path) -> PathState {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => PathState::Folder,
            Ok(_) => PathState::File,
            Err(_) => PathState::Unknown,
        }
    }
}

impl fmt::Display for PathState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PathState::Folder => "folder",
            PathState::File => "file",
            PathState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Shorthand for [`PathState::of`].
pub fn classify(path: &Path) -> PathState {
    PathState::of(path)
}

/// True if `path` itself is a symbolic link (never follows it).
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// True if any entry occupies `path`, including a dangling symlink.
pub fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
