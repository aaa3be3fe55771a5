//! Core library for `fs_location`.
//!
//! Files and folders as typed values. A `File` or `Folder` is nothing but a normalized
//! absolute path; every attribute read asks the OS again and every mutation checks its
//! preconditions (right kind on disk, destination free) before touching anything.
//!
//! Layout:
//! - `location`: the `Location` trait, `File`, `Folder`, `Item` and path-state rules
//! - `enumerate`: walking folder contents
//! - `search`: background predicate search over folder scopes
//! - `fs_ops`: the OS-facing helpers (move/copy, links, aliases, trash, unique names)
//! - `config`, `logging`: ambient settings and tracing setup for embedding applications

pub mod config;
pub mod enumerate;
pub mod errors;
pub mod fs_ops;
pub mod location;
pub mod logging;
pub mod platform;
pub mod search;

pub use config::{Config, LogLevel};
pub use enumerate::EnumerationOptions;
pub use errors::{LocationError, Result};
pub use fs_ops::{unique_name, Trash, TrashLayout};
pub use location::{
    temporary_file, temporary_folder, Attributes, File, Folder, Item, Location, PathState,
    SearchPath,
};
pub use search::{Search, SearchQuery};

/// Everything needed for day-to-day use: `use fs_location::prelude::*;`.
pub mod prelude {
    pub use crate::enumerate::EnumerationOptions;
    pub use crate::errors::{LocationError, Result};
    pub use crate::location::{Attributes, File, Folder, Item, Location, PathState};
}

/// Scratch folders for tests in dependent crates.
#[cfg(feature = "test-helpers")]
pub mod test_helpers {
    use crate::errors::Result;
    use crate::location::Folder;

    /// A temporary directory and the `Folder` for it. The directory is removed when
    /// the returned guard drops.
    pub fn scratch_folder() -> Result<(tempfile::TempDir, Folder)> {
        let dir = tempfile::tempdir()
            .map_err(crate::fs_ops::helpers::io_error_with_help("create scratch folder", &std::env::temp_dir()))?;
        let folder = Folder::new(dir.path())?;
        Ok((dir, folder))
    }
}
