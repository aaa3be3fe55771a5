//! `File`: a location expected to hold a non-directory entry.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{LocationError, Result};
use crate::fs_ops::alias;
use crate::fs_ops::helpers::io_error_with_help;
use crate::fs_ops::metadata::apply_attributes;

use super::path::normalize;
use super::{Attributes, Item, Location, PathState};

/// A file path. Owns nothing but the normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Build a file location without creating anything.
    ///
    /// Fails with `FolderExistsAtPath` if a folder currently sits at `path`. A leading
    /// `~` is expanded and the path is normalized.
    pub fn new(path: impl AsRef<Path>) -> Result<File> {
        let path = normalize(path.as_ref())?;
        if PathState::of(&path) == PathState::Folder {
            return Err(LocationError::FolderExistsAtPath(path));
        }
        Ok(File { path })
    }

    /// `File::new(path)?.actualize(&Attributes::default(), true)`.
    pub fn create(path: impl AsRef<Path>) -> Result<File> {
        File::new(path)?.actualize(&Attributes::default(), true)
    }

    /// Size in bytes.
    pub fn size(&self) -> Result<u64> {
        Ok(self.metadata()?.len())
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        self.require_exists()?;
        fs::read(&self.path).map_err(io_error_with_help("read file", &self.path))
    }

    pub fn read_to_string(&self) -> Result<String> {
        self.require_exists()?;
        fs::read_to_string(&self.path).map_err(io_error_with_help("read file", &self.path))
    }

    /// Replace the contents, creating the file if needed (the parent must exist).
    pub fn write(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        self.refuse_folder()?;
        fs::write(&self.path, contents).map_err(io_error_with_help("write file", &self.path))
    }

    /// Append to the contents, creating the file if needed.
    pub fn append(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        self.refuse_folder()?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error_with_help("open file for append", &self.path))?;
        f.write_all(contents.as_ref())
            .map_err(io_error_with_help("append to file", &self.path))
    }

    /// Follow an alias file to whatever it points at now.
    ///
    /// The result is the variant matching the live state of the target, so an alias to
    /// a folder resolves to `Item::Folder` even though the alias itself is a `File`.
    pub fn resolving_alias(&self) -> Result<Item> {
        self.require_exists()?;
        let bookmark = alias::read_bookmark(&self.path)?
            .ok_or_else(|| LocationError::NotAnAlias(self.path.clone()))?;
        let target = bookmark.target_path().ok_or_else(|| {
            LocationError::Unknown(format!(
                "alias '{}' holds a malformed target '{}'",
                self.path.display(),
                bookmark.target
            ))
        })?;
        debug!(alias = %self.path.display(), target = %target.display(), "resolving alias");
        Item::at(&target)?.ok_or(LocationError::FileOrFolderDoesNotExist(target))
    }

    fn refuse_folder(&self) -> Result<()> {
        if PathState::of(&self.path) == PathState::Folder {
            return Err(LocationError::FolderExistsAtPath(self.path.clone()));
        }
        Ok(())
    }
}

impl Location for File {
    const KIND: PathState = PathState::File;

    fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        File::new(path)
    }

    fn from_path_unchecked(path: PathBuf) -> Self {
        File { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn actualize(self, attrs: &Attributes, create: bool) -> Result<Self> {
        match PathState::of(&self.path) {
            PathState::File => Ok(self),
            PathState::Folder => Err(LocationError::FolderExistsAtPath(self.path)),
            PathState::Unknown if !create => Ok(self),
            PathState::Unknown => {
                if let Some(parent) = self.parent() {
                    parent.actualize(&Attributes::default(), true)?;
                }
                OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&self.path)
                    .map_err(|e: io::Error| LocationError::CouldNotCreateFile {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    })?;
                apply_attributes(&self.path, attrs)?;
                info!(path = %self.path.display(), "file created");
                Ok(self)
            }
        }
    }
}

impl AsRef<Path> for File {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl TryFrom<Item> for File {
    type Error = LocationError;

    fn try_from(item: Item) -> Result<Self> {
        match item {
            Item::File(f) => Ok(f),
            Item::Folder(f) => Err(LocationError::FolderExistsAtPath(f.path().to_path_buf())),
        }
    }
}

impl From<File> for PathBuf {
    fn from(f: File) -> Self {
        f.path
    }
}
