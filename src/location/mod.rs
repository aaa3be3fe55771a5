//! Typed locations: `File` and `Folder` values sharing the `Location` trait.
//!
//! A location is only a normalized absolute path. Every accessor asks the OS again;
//! every mutation re-checks its preconditions right before the OS call and hands back
//! a new value bound to wherever the entry ended up.

pub mod attributes;
pub mod content_type;
mod file;
mod folder;
pub mod path;
pub mod state;

pub use attributes::Attributes;
pub use file::File;
pub use folder::{temporary_file, temporary_folder, Folder, SearchPath};
pub use state::PathState;

use chrono::{DateTime, Local};
use filetime::{set_file_mtime, FileTime};
use std::fmt;
use std::fs;
use std::hash::Hash;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

use crate::config;
use crate::errors::{LocationError, Result};
use crate::fs_ops::helpers::io_error_with_help;
use crate::fs_ops::{alias, link, transfer, trash::Trash};
use crate::platform;

use path::{file_url, normalize, validate_name};
use state::is_occupied;

/// Operations shared by files and folders.
///
/// Variant-specific behaviour keys off `KIND`, the state a value of this type expects
/// to find on disk.
pub trait Location: Sized + Clone + fmt::Debug + PartialEq + Eq + Hash + Send + Sync {
    /// `PathState::File` or `PathState::Folder`.
    const KIND: PathState;

    /// Validating constructor; see `File::new` / `Folder::new`.
    fn from_path(path: impl AsRef<Path>) -> Result<Self>;

    /// Wrap an already-normalized path without touching the disk.
    #[doc(hidden)]
    fn from_path_unchecked(path: PathBuf) -> Self;

    fn path(&self) -> &Path;

    /// Make sure the backing entry exists, creating it when `create` is set.
    fn actualize(self, attrs: &Attributes, create: bool) -> Result<Self>;

    /// `file://` URL; folders end in `/`.
    fn url(&self) -> String {
        file_url(self.path(), Self::KIND == PathState::Folder)
    }

    /// Last path component (the whole path for a filesystem root).
    fn name(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().to_string_lossy().into_owned())
    }

    fn name_excluding_extension(&self) -> String {
        self.path()
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name())
    }

    fn extension(&self) -> Option<String> {
        self.path()
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }

    fn parent(&self) -> Option<Folder> {
        self.path()
            .parent()
            .map(|p| Folder::from_path_unchecked(p.to_path_buf()))
    }

    fn state(&self) -> PathState {
        PathState::of(self.path())
    }

    /// True when an entry of this location's own kind is on disk.
    fn exists(&self) -> bool {
        self.state() == Self::KIND
    }

    fn is_symlink(&self) -> bool {
        state::is_symlink(self.path())
    }

    /// True for bookmark files written by `create_alias`. Folders are never aliases.
    fn is_alias(&self) -> bool {
        Self::KIND == PathState::File && alias::is_bookmark(self.path())
    }

    /// Dot-prefixed name, or the platform hidden attribute.
    fn is_hidden(&self) -> bool {
        self.name().starts_with('.')
            || fs::symlink_metadata(self.path())
                .map(|m| platform::has_hidden_attribute(&m))
                .unwrap_or(false)
    }

    fn is_locked(&self) -> Result<bool> {
        self.require_exists()?;
        platform::is_locked(self.path()).map_err(io_error_with_help("read locked flag", self.path()))
    }

    fn set_locked(&self, locked: bool) -> Result<()> {
        self.require_exists()?;
        platform::set_locked(self.path(), locked)
            .map_err(io_error_with_help("set locked flag", self.path()))
    }

    fn is_readable(&self) -> bool {
        platform::is_readable(self.path())
    }

    fn is_writable(&self) -> bool {
        platform::is_writable(self.path())
    }

    fn is_executable(&self) -> bool {
        platform::is_executable(self.path())
    }

    /// Existing entry inside a folder the process may write to.
    fn is_deletable(&self) -> bool {
        self.exists()
            && self
                .path()
                .parent()
                .map(platform::is_writable)
                .unwrap_or(false)
    }

    fn posix_permissions(&self) -> Result<u32> {
        Ok(platform::mode(&self.metadata()?))
    }

    fn set_posix_permissions(&self, mode: u32) -> Result<()> {
        self.require_exists()?;
        platform::set_mode(self.path(), mode)
            .map_err(io_error_with_help("set permissions", self.path()))
    }

    /// `None` when the entry is gone or the platform doesn't record birth time.
    fn creation_date(&self) -> Option<DateTime<Local>> {
        self.metadata().ok()?.created().ok().map(DateTime::from)
    }

    fn modification_date(&self) -> Option<DateTime<Local>> {
        self.metadata().ok()?.modified().ok().map(DateTime::from)
    }

    fn access_date(&self) -> Option<DateTime<Local>> {
        self.metadata().ok()?.accessed().ok().map(DateTime::from)
    }

    fn set_modification_date(&self, date: DateTime<Local>) -> Result<()> {
        self.require_exists()?;
        set_file_mtime(self.path(), FileTime::from_system_time(SystemTime::from(date)))
            .map_err(io_error_with_help("set modification date", self.path()))
    }

    fn type_identifier(&self) -> Option<String> {
        content_type::type_identifier(self.path())
    }

    fn conforms_to(&self, identifier: &str) -> bool {
        content_type::conforms_to(self.path(), identifier)
    }

    /// Move into `folder`, keeping the name.
    fn move_into(&self, folder: &Folder) -> Result<Self> {
        let dest = self.destination_in(folder)?;
        debug!(path = %self.path().display(), dest = %dest.display(), kind = %Self::KIND, "move");
        transfer::move_item(self.path(), &dest, config::global().preserve_metadata)?;
        info!(path = %self.path().display(), dest = %dest.display(), "moved");
        Ok(Self::from_path_unchecked(dest))
    }

    /// Copy into `folder`, keeping the name. Folders are copied recursively.
    fn copy_into(&self, folder: &Folder) -> Result<Self> {
        let dest = self.destination_in(folder)?;
        debug!(path = %self.path().display(), dest = %dest.display(), kind = %Self::KIND, "copy");
        transfer::copy_item(self.path(), &dest, config::global().preserve_metadata)?;
        info!(path = %self.path().display(), dest = %dest.display(), "copied");
        Ok(Self::from_path_unchecked(dest))
    }

    /// Rename in place; `new_name` is a single path component.
    fn rename(&self, new_name: &str) -> Result<Self> {
        validate_name(new_name)?;
        self.require_exists()?;
        let parent = self
            .path()
            .parent()
            .ok_or_else(|| LocationError::InvalidName(self.path().display().to_string()))?;
        let dest = parent.join(new_name);
        if is_occupied(&dest) {
            return Err(LocationError::DestinationExistsAtPath(dest));
        }
        fs::rename(self.path(), &dest).map_err(io_error_with_help("rename", self.path()))?;
        info!(path = %self.path().display(), dest = %dest.display(), "renamed");
        Ok(Self::from_path_unchecked(dest))
    }

    /// Remove the entry; folders recursively. A symlink is removed, never its target.
    fn delete(self) -> Result<()> {
        let p = self.path();
        let res = if state::is_symlink(p) {
            fs::remove_file(p).or_else(|_| fs::remove_dir(p))
        } else if Self::KIND == PathState::Folder {
            fs::remove_dir_all(p)
        } else {
            fs::remove_file(p)
        };
        res.map_err(io_error_with_help("delete", p))?;
        info!(path = %p.display(), kind = %Self::KIND, "deleted");
        Ok(())
    }

    /// Move into the user's trash; returns the location inside the trash.
    fn trash(&self) -> Result<Self> {
        Trash::from_config(config::global())?.put(self)
    }

    /// Create a symbolic link at `dest` pointing to this location.
    fn create_symlink(&self, dest: impl AsRef<Path>) -> Result<Self> {
        self.require_exists()?;
        let dest = normalize(dest.as_ref())?;
        if is_occupied(&dest) {
            return Err(LocationError::DestinationExistsAtPath(dest));
        }
        link::symlink(self.path(), &dest, Self::KIND == PathState::Folder)
            .map_err(io_error_with_help("create symbolic link", &dest))?;
        info!(target_path = %self.path().display(), link = %dest.display(), "symlink created");
        Ok(Self::from_path_unchecked(dest))
    }

    /// Canonical path with every link resolved. The variant is not re-checked.
    fn resolving_symlinks(&self) -> Result<Self> {
        Ok(Self::from_path_unchecked(link::canonicalize(self.path())?))
    }

    /// Write an alias (bookmark) file at `dest` referring to this location.
    fn create_alias(&self, dest: impl AsRef<Path>) -> Result<File> {
        self.require_exists()?;
        let dest = normalize(dest.as_ref())?;
        if is_occupied(&dest) {
            return Err(LocationError::DestinationExistsAtPath(dest));
        }
        alias::write_bookmark(self.path(), Self::KIND, &dest)?;
        Ok(File::from_path_unchecked(dest))
    }

    #[doc(hidden)]
    fn require_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(LocationError::FileOrFolderDoesNotExist(self.path().to_path_buf()))
        }
    }

    #[doc(hidden)]
    fn metadata(&self) -> Result<fs::Metadata> {
        fs::metadata(self.path()).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LocationError::FileOrFolderDoesNotExist(self.path().to_path_buf())
            } else {
                io_error_with_help("read attributes", self.path())(e)
            }
        })
    }

    /// Shared move/copy preconditions; returns `folder/<name>`.
    #[doc(hidden)]
    fn destination_in(&self, folder: &Folder) -> Result<PathBuf> {
        self.require_exists()?;
        if folder.state() != PathState::Folder {
            return Err(LocationError::DestinationFolderDoesNotExist(folder.path().to_path_buf()));
        }
        let name = self
            .path()
            .file_name()
            .ok_or_else(|| LocationError::InvalidName(self.path().display().to_string()))?;
        if Self::KIND == PathState::Folder && is_within(folder.path(), self.path()) {
            return Err(LocationError::Unknown(format!(
                "cannot place folder '{}' inside itself ('{}')",
                self.path().display(),
                folder.path().display()
            )));
        }
        let dest = folder.path().join(name);
        if is_occupied(&dest) {
            return Err(LocationError::DestinationExistsAtPath(dest));
        }
        Ok(dest)
    }
}

/// `dest` is `src` or lies below it, either lexically or once links are resolved.
fn is_within(dest: &Path, src: &Path) -> bool {
    if dest.starts_with(src) {
        return true;
    }
    match (link::canonicalize(dest), link::canonicalize(src)) {
        (Ok(dest), Ok(src)) => dest.starts_with(&src),
        _ => false,
    }
}

/// The most specific location for an entry: what enumeration, alias resolution and
/// search hand back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Item {
    File(File),
    Folder(Folder),
}

impl Item {
    /// Classify `path` by its live state; `None` if nothing is there.
    pub fn at(path: impl AsRef<Path>) -> Result<Option<Item>> {
        let path = normalize(path.as_ref())?;
        Ok(match PathState::of(&path) {
            PathState::File => Some(Item::File(File::from_path_unchecked(path))),
            PathState::Folder => Some(Item::Folder(Folder::from_path_unchecked(path))),
            PathState::Unknown => None,
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            Item::File(f) => f.path(),
            Item::Folder(f) => f.path(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Item::File(f) => f.name(),
            Item::Folder(f) => f.name(),
        }
    }

    pub fn kind(&self) -> PathState {
        match self {
            Item::File(_) => PathState::File,
            Item::Folder(_) => PathState::Folder,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Item::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Item::Folder(_))
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Item::File(f) => Some(f),
            Item::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Item::Folder(f) => Some(f),
            Item::File(_) => None,
        }
    }

    pub fn into_file(self) -> Option<File> {
        match self {
            Item::File(f) => Some(f),
            Item::Folder(_) => None,
        }
    }

    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Item::Folder(f) => Some(f),
            Item::File(_) => None,
        }
    }
}

impl From<File> for Item {
    fn from(f: File) -> Self {
        Item::File(f)
    }
}

impl From<Folder> for Item {
    fn from(f: Folder) -> Self {
        Item::Folder(f)
    }
}
