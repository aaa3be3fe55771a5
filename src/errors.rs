//! Typed error definitions for fs_location.
//! Precondition failures get their own variant so callers can tell them apart
//! from whatever the OS reported during the actual mutation.

use std::path::PathBuf;
use thiserror::Error;

use crate::location::SearchPath;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("A file already exists at {0}")]
    FileExistsAtPath(PathBuf),

    #[error("A folder already exists at {0}")]
    FolderExistsAtPath(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExistsAtPath(PathBuf),

    #[error("No file or folder exists at {0}")]
    FileOrFolderDoesNotExist(PathBuf),

    #[error("Destination folder does not exist: {0}")]
    DestinationFolderDoesNotExist(PathBuf),

    #[error("Folder does not exist: {0}")]
    FolderDoesNotExist(PathBuf),

    #[error("Could not create file {path}: {reason}")]
    CouldNotCreateFile { path: PathBuf, reason: String },

    #[error("Could not generate a unique name in {folder} after {attempts} attempts")]
    CouldNotGenerateUniqueName { folder: PathBuf, attempts: usize },

    #[error("Could not locate the {0} folder")]
    CouldNotLocateSearchPath(SearchPath),

    #[error("Invalid name '{0}': must be a single, non-empty path component")]
    InvalidName(String),

    #[error("Not an alias file: {0}")]
    NotAnAlias(PathBuf),

    #[error("Search was already started")]
    SearchAlreadyStarted,

    #[error("{0}")]
    Unknown(String),
}

impl LocationError {
    /// True for the variants raised by precondition checks, before any OS mutation.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, LocationError::Unknown(_) | LocationError::CouldNotCreateFile { .. })
    }
}

pub type Result<T, E = LocationError> = std::result::Result<T, E>;
