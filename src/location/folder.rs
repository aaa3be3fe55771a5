//! `Folder`: a location expected to hold a directory.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config;
use crate::errors::{LocationError, Result};
use crate::fs_ops::helpers::io_error_with_help;
use crate::fs_ops::metadata::apply_attributes;
use crate::fs_ops::unique::unique_name;
use crate::platform;

use super::path::{normalize, validate_name};
use super::{Attributes, File, Item, Location, PathState};

/// Well-known folders that can be looked up by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPath {
    Home,
    Temporary,
    Current,
    Desktop,
    Documents,
    Downloads,
    Caches,
    ApplicationSupport,
    Config,
    Pictures,
    Music,
    Videos,
    Trash,
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchPath::Home => "home",
            SearchPath::Temporary => "temporary",
            SearchPath::Current => "current",
            SearchPath::Desktop => "desktop",
            SearchPath::Documents => "documents",
            SearchPath::Downloads => "downloads",
            SearchPath::Caches => "caches",
            SearchPath::ApplicationSupport => "application support",
            SearchPath::Config => "config",
            SearchPath::Pictures => "pictures",
            SearchPath::Music => "music",
            SearchPath::Videos => "videos",
            SearchPath::Trash => "trash",
        };
        f.write_str(s)
    }
}

impl SearchPath {
    /// Candidate path for this kind, if the platform has one.
    pub fn candidate(self) -> Option<PathBuf> {
        match self {
            SearchPath::Home => dirs::home_dir(),
            SearchPath::Temporary => Some(env::temp_dir()),
            SearchPath::Current => env::current_dir().ok(),
            SearchPath::Desktop => dirs::desktop_dir(),
            SearchPath::Documents => dirs::document_dir(),
            SearchPath::Downloads => dirs::download_dir(),
            SearchPath::Caches => dirs::cache_dir(),
            SearchPath::ApplicationSupport => dirs::data_dir(),
            SearchPath::Config => dirs::config_dir(),
            SearchPath::Pictures => dirs::picture_dir(),
            SearchPath::Music => dirs::audio_dir(),
            SearchPath::Videos => dirs::video_dir(),
            SearchPath::Trash => crate::fs_ops::trash::default_trash_root(),
        }
    }
}

/// A folder path. Owns nothing but the normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Folder {
    path: PathBuf,
}

impl Folder {
    /// Build a folder location without creating anything.
    ///
    /// Fails with `FileExistsAtPath` if a file currently sits at `path`. A leading `~`
    /// is expanded and the path is normalized.
    pub fn new(path: impl AsRef<Path>) -> Result<Folder> {
        let path = normalize(path.as_ref())?;
        if PathState::of(&path) == PathState::File {
            return Err(LocationError::FileExistsAtPath(path));
        }
        Ok(Folder { path })
    }

    /// `Folder::new(path)?.actualize(&Attributes::default(), true)`.
    pub fn create(path: impl AsRef<Path>) -> Result<Folder> {
        Folder::new(path)?.actualize(&Attributes::default(), true)
    }

    /// Look up a well-known folder.
    pub fn well_known(kind: SearchPath) -> Result<Folder> {
        let path = kind
            .candidate()
            .ok_or(LocationError::CouldNotLocateSearchPath(kind))?;
        Folder::new(path)
    }

    pub fn home() -> Result<Folder> {
        Folder::well_known(SearchPath::Home)
    }

    pub fn temporary() -> Result<Folder> {
        Folder::well_known(SearchPath::Temporary)
    }

    pub fn current() -> Result<Folder> {
        Folder::well_known(SearchPath::Current)
    }

    /// `self/name` as a file, without touching the disk beyond validation.
    pub fn file_location(&self, name: &str) -> Result<File> {
        validate_name(name)?;
        File::new(self.path.join(name))
    }

    /// `self/name` as a folder, without touching the disk beyond validation.
    pub fn subfolder_location(&self, name: &str) -> Result<Folder> {
        validate_name(name)?;
        Folder::new(self.path.join(name))
    }

    /// Existing file named `name` directly inside this folder.
    pub fn file(&self, name: &str) -> Result<File> {
        let f = self.file_location(name)?;
        f.require_exists()?;
        Ok(f)
    }

    /// Existing subfolder named `name` directly inside this folder.
    pub fn subfolder(&self, name: &str) -> Result<Folder> {
        let f = self.subfolder_location(name)?;
        f.require_exists()?;
        Ok(f)
    }

    pub fn contains_file(&self, name: &str) -> bool {
        validate_name(name).is_ok() && PathState::of(&self.path.join(name)) == PathState::File
    }

    pub fn contains_subfolder(&self, name: &str) -> bool {
        validate_name(name).is_ok() && PathState::of(&self.path.join(name)) == PathState::Folder
    }

    /// Create (or reuse) the file `name` inside this folder, creating this folder too.
    pub fn create_file(&self, name: &str) -> Result<File> {
        self.file_location(name)?
            .actualize(&Attributes::default(), true)
    }

    /// Create (or reuse) the subfolder `name`, creating intermediate folders.
    pub fn create_subfolder(&self, name: &str) -> Result<Folder> {
        self.subfolder_location(name)?
            .actualize(&Attributes::default(), true)
    }

    /// Create an empty file with a unique name inside this (existing) folder.
    ///
    /// `prefix` defaults to the configured temporary prefix (`tmp`).
    pub fn create_temporary_file(&self, prefix: Option<&str>, extension: Option<&str>) -> Result<File> {
        let prefix = prefix.unwrap_or(config::global().temp_prefix.as_str());
        let path = unique_name(&self.path, prefix, extension)?;
        File::from_path_unchecked(path).actualize(&Attributes::default(), true)
    }

    /// Create an empty subfolder with a unique name inside this (existing) folder.
    pub fn create_temporary_subfolder(&self, prefix: Option<&str>) -> Result<Folder> {
        let prefix = prefix.unwrap_or(config::global().temp_prefix.as_str());
        let path = unique_name(&self.path, prefix, None)?;
        Folder::from_path_unchecked(path).actualize(&Attributes::default(), true)
    }

    /// Sum of file sizes below this folder. Links are not followed; unreadable
    /// entries are skipped.
    pub fn size(&self) -> Result<u64> {
        self.require_exists()?;
        let mut total = 0u64;
        for entry in WalkDir::new(&self.path).follow_links(false) {
            match entry {
                Ok(e) if e.file_type().is_file() => {
                    total += e.metadata().map(|m| m.len()).unwrap_or(0);
                }
                Ok(_) => {}
                Err(e) => warn!(path = %self.path.display(), error = %e, "skipping unreadable entry while sizing"),
            }
        }
        Ok(total)
    }

    /// Free bytes on the volume holding this folder.
    pub fn available_space(&self) -> Result<u64> {
        self.require_exists()?;
        fs2::available_space(&self.path).map_err(io_error_with_help("query free space", &self.path))
    }

    /// True when the folder has no entries. Hidden entries count only with `include_hidden`.
    pub fn is_empty(&self, include_hidden: bool) -> Result<bool> {
        self.require_exists()?;
        let entries = fs::read_dir(&self.path).map_err(io_error_with_help("read folder", &self.path))?;
        for entry in entries {
            let entry = entry.map_err(io_error_with_help("read folder", &self.path))?;
            if include_hidden
                || !platform::is_hidden_entry(&entry.file_name(), || entry.metadata().ok())
            {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Location for Folder {
    const KIND: PathState = PathState::Folder;

    fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Folder::new(path)
    }

    fn from_path_unchecked(path: PathBuf) -> Self {
        Folder { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn actualize(self, attrs: &Attributes, create: bool) -> Result<Self> {
        match PathState::of(&self.path) {
            PathState::Folder => Ok(self),
            PathState::File => Err(LocationError::FileExistsAtPath(self.path)),
            PathState::Unknown if !create => Ok(self),
            PathState::Unknown => {
                fs::create_dir_all(&self.path)
                    .map_err(io_error_with_help("create folder", &self.path))?;
                apply_attributes(&self.path, attrs)?;
                info!(path = %self.path.display(), "folder created");
                Ok(self)
            }
        }
    }
}

impl AsRef<Path> for Folder {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl TryFrom<Item> for Folder {
    type Error = LocationError;

    fn try_from(item: Item) -> Result<Self> {
        match item {
            Item::Folder(f) => Ok(f),
            Item::File(f) => Err(LocationError::FileExistsAtPath(f.path().to_path_buf())),
        }
    }
}

impl From<Folder> for PathBuf {
    fn from(f: Folder) -> Self {
        f.path
    }
}

/// An empty file with a unique name in the system temporary folder.
pub fn temporary_file(extension: Option<&str>) -> Result<File> {
    Folder::temporary()?.create_temporary_file(None, extension)
}

/// An empty folder with a unique name in the system temporary folder.
pub fn temporary_folder() -> Result<Folder> {
    Folder::temporary()?.create_temporary_subfolder(None)
}
