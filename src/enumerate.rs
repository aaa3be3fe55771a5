//! Folder enumeration.
//!
//! Entries are classified by their own immediate type: links are never followed and alias
//! files never resolved, so a link to a folder comes back as a `File`.

use std::ops::ControlFlow;
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::errors::{LocationError, Result};
use crate::fs_ops::helpers::walk_error_with_help;
use crate::location::content_type::is_package;
use crate::location::{File, Folder, Item, Location, PathState};
use crate::platform;

/// How `Folder::enumerate` walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationOptions {
    /// Immediate children only.
    pub shallow: bool,
    /// Include dot-entries (and entries with the Windows hidden attribute).
    pub include_hidden: bool,
    /// Descend into package directories such as `Foo.app`.
    pub recurse_into_packages: bool,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            shallow: true,
            include_hidden: false,
            recurse_into_packages: false,
        }
    }
}

impl EnumerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep walk, otherwise defaults.
    pub fn recursive() -> Self {
        Self {
            shallow: false,
            ..Self::default()
        }
    }

    pub fn shallow(mut self, yes: bool) -> Self {
        self.shallow = yes;
        self
    }

    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    pub fn recurse_into_packages(mut self, yes: bool) -> Self {
        self.recurse_into_packages = yes;
        self
    }
}

fn is_hidden_entry(entry: &DirEntry) -> bool {
    platform::is_hidden_entry(entry.file_name(), || entry.metadata().ok())
}

impl Folder {
    /// Visit entries below this folder until `visit` breaks or the walk ends.
    ///
    /// Unreadable entries below the root are logged and skipped; failing to read the
    /// root itself is an error.
    pub fn enumerate<F>(&self, opts: EnumerationOptions, mut visit: F) -> Result<()>
    where
        F: FnMut(Item) -> ControlFlow<()>,
    {
        if self.state() != PathState::Folder {
            return Err(LocationError::FileOrFolderDoesNotExist(self.path().to_path_buf()));
        }
        let root = self.path();
        debug!(path = %root.display(), ?opts, "enumerate");

        let mut walker = WalkDir::new(root).follow_links(false).min_depth(1);
        if opts.shallow {
            walker = walker.max_depth(1);
        }
        let mut it = walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || opts.include_hidden || !is_hidden_entry(e));

        let mut visited = 0usize;
        while let Some(next) = it.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(walk_error_with_help("read folder", root, e)),
                Err(e) => {
                    warn!(path = %root.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let is_dir = entry.file_type().is_dir();
            if is_dir && !opts.shallow && !opts.recurse_into_packages && is_package(entry.path()) {
                trace!(path = %entry.path().display(), "not descending into package");
                it.skip_current_dir();
            }

            let path = entry.into_path();
            let item = if is_dir {
                Item::Folder(Folder::from_path_unchecked(path))
            } else {
                Item::File(File::from_path_unchecked(path))
            };
            visited += 1;
            if visit(item).is_break() {
                trace!(path = %root.display(), visited, "enumeration stopped early");
                return Ok(());
            }
        }
        trace!(path = %root.display(), visited, "enumeration complete");
        Ok(())
    }

    /// Every entry the walk yields that passes `filter`, in enumeration order.
    pub fn all_content(
        &self,
        opts: EnumerationOptions,
        filter: Option<&dyn Fn(&Item) -> bool>,
    ) -> Result<Vec<Item>> {
        let mut out = Vec::new();
        self.enumerate(opts, |item| {
            if filter.is_none_or(|f| f(&item)) {
                out.push(item);
            }
            ControlFlow::Continue(())
        })?;
        Ok(out)
    }

    pub fn all_files(
        &self,
        opts: EnumerationOptions,
        filter: Option<&dyn Fn(&Item) -> bool>,
    ) -> Result<Vec<File>> {
        Ok(self
            .all_content(opts, filter)?
            .into_iter()
            .filter_map(Item::into_file)
            .collect())
    }

    pub fn all_subfolders(
        &self,
        opts: EnumerationOptions,
        filter: Option<&dyn Fn(&Item) -> bool>,
    ) -> Result<Vec<Folder>> {
        Ok(self
            .all_content(opts, filter)?
            .into_iter()
            .filter_map(Item::into_folder)
            .collect())
    }

    /// Visible files directly inside this folder.
    pub fn files(&self) -> Result<Vec<File>> {
        self.all_files(EnumerationOptions::default(), None)
    }

    /// Visible subfolders directly inside this folder.
    pub fn subfolders(&self) -> Result<Vec<Folder>> {
        self.all_subfolders(EnumerationOptions::default(), None)
    }
}
