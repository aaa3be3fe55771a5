//! Moving entries to the user's trash.
//!
//! Two layouts are understood:
//! - freedesktop (Linux and the other non-macOS Unixes): `<root>/files/<name>` plus a
//!   `<root>/info/<name>.trashinfo` record naming the original path and deletion time.
//! - flat (macOS `~/.Trash`): entries are dropped straight into the root.
//!
//! In the freedesktop layout the `.trashinfo` file is created exclusively first, which
//! reserves the name against other trashers; it is removed again if the move fails.

use chrono::Local;
use std::ffi::{OsStr, OsString};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{self, Config};
use crate::errors::{LocationError, Result};
use crate::location::path::{path_bytes, percent_encode};
use crate::location::state::is_occupied;
use crate::location::{Location, SearchPath};

use super::duplicate::first_free_name;
use super::helpers::io_error_with_help;
use super::transfer;

const INFO_SUFFIX: &str = ".trashinfo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashLayout {
    /// `files/` + `info/` with `.trashinfo` records.
    Freedesktop,
    /// Entries placed directly in the root.
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trash {
    root: PathBuf,
    layout: TrashLayout,
}

/// Where the platform keeps the current user's trash, if it has one we can write to.
pub(crate) fn default_trash_root() -> Option<PathBuf> {
    if cfg!(windows) {
        // The Recycle Bin is only reachable through the shell API.
        None
    } else if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join(".Trash"))
    } else {
        dirs::data_dir().map(|d| d.join("Trash"))
    }
}

impl Trash {
    /// The platform trash for the current user.
    pub fn home() -> Result<Trash> {
        let root = default_trash_root().ok_or(LocationError::CouldNotLocateSearchPath(SearchPath::Trash))?;
        let layout = if cfg!(target_os = "macos") {
            TrashLayout::Flat
        } else {
            TrashLayout::Freedesktop
        };
        Ok(Trash { root, layout })
    }

    /// A freedesktop-layout trash rooted at `root` (created on first use).
    pub fn at(root: impl Into<PathBuf>) -> Trash {
        Trash {
            root: root.into(),
            layout: TrashLayout::Freedesktop,
        }
    }

    /// `trash_dir` from the configuration, or the platform trash.
    pub fn from_config(cfg: &Config) -> Result<Trash> {
        match &cfg.trash_dir {
            Some(dir) => Ok(Trash::at(dir)),
            None => Trash::home(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> TrashLayout {
        self.layout
    }

    /// Folder that receives trashed entries.
    pub fn files_folder(&self) -> PathBuf {
        match self.layout {
            TrashLayout::Freedesktop => self.root.join("files"),
            TrashLayout::Flat => self.root.clone(),
        }
    }

    /// Folder holding `.trashinfo` records; `None` for the flat layout.
    pub fn info_folder(&self) -> Option<PathBuf> {
        match self.layout {
            TrashLayout::Freedesktop => Some(self.root.join("info")),
            TrashLayout::Flat => None,
        }
    }

    /// Move `loc` into the trash. Returns the location it now occupies there.
    pub fn put<L: Location>(&self, loc: &L) -> Result<L> {
        loc.require_exists()?;
        let src = loc.path();
        let name = src
            .file_name()
            .ok_or_else(|| LocationError::InvalidName(src.display().to_string()))?;

        let files = self.files_folder();
        fs::create_dir_all(&files).map_err(io_error_with_help("create trash folder", &files))?;

        let (dest, info) = match self.info_folder() {
            Some(info_dir) => {
                fs::create_dir_all(&info_dir)
                    .map_err(io_error_with_help("create trash info folder", &info_dir))?;
                let (dest, info) = reserve(&files, &info_dir, name, src)?;
                (dest, Some(info))
            }
            None => {
                let chosen = first_free_name(name, |c| is_occupied(&files.join(c)))?;
                (files.join(chosen), None)
            }
        };

        debug!(path = %src.display(), dest = %dest.display(), "trash");
        if let Err(e) = transfer::move_item(src, &dest, config::global().preserve_metadata) {
            if let Some(info) = &info {
                if let Err(rm) = fs::remove_file(info) {
                    warn!(info = %info.display(), error = %rm, "could not remove orphaned trash record");
                }
            }
            return Err(e);
        }
        info!(path = %src.display(), dest = %dest.display(), "moved to trash");
        Ok(L::from_path_unchecked(dest))
    }
}

/// Pick a free name in `files/` and claim it by creating its `.trashinfo` exclusively.
fn reserve(files: &Path, info_dir: &Path, name: &OsStr, original: &Path) -> Result<(PathBuf, PathBuf)> {
    let mut failure: Option<(PathBuf, io::Error)> = None;
    let mut claimed: Option<(PathBuf, fs::File)> = None;

    let chosen = first_free_name(name, |candidate| {
        if is_occupied(&files.join(candidate)) {
            return true;
        }
        let info_path = info_dir.join(info_file_name(candidate));
        match OpenOptions::new().write(true).create_new(true).open(&info_path) {
            Ok(f) => {
                claimed = Some((info_path, f));
                false
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => true,
            Err(e) => {
                // Stop searching; surfaced below.
                failure = Some((info_path, e));
                false
            }
        }
    })?;

    if let Some((path, e)) = failure {
        return Err(io_error_with_help("create trash info record", &path)(e));
    }
    let (info_path, mut f) = claimed
        .ok_or_else(|| LocationError::Unknown(format!("no trash record claimed for {:?}", chosen)))?;

    let record = format!(
        "[Trash Info]\nPath={}\nDeletionDate={}\n",
        percent_encode(&path_bytes(original)),
        Local::now().format("%Y-%m-%dT%H:%M:%S")
    );
    if let Err(e) = f.write_all(record.as_bytes()).and_then(|_| f.sync_all()) {
        let _ = fs::remove_file(&info_path);
        return Err(io_error_with_help("write trash info record", &info_path)(e));
    }
    Ok((files.join(chosen), info_path))
}

fn info_file_name(name: &OsStr) -> OsString {
    let mut s = name.to_os_string();
    s.push(INFO_SUFFIX);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::File;
    use tempfile::tempdir;

    #[test]
    fn freedesktop_layout_paths() {
        let t = Trash::at("/tmp/some-trash");
        assert_eq!(t.files_folder(), PathBuf::from("/tmp/some-trash/files"));
        assert_eq!(t.info_folder(), Some(PathBuf::from("/tmp/some-trash/info")));
    }

    #[test]
    fn info_record_contents() {
        let td = tempdir().unwrap();
        let src = td.path().join("my notes.txt");
        fs::write(&src, b"x").unwrap();
        let trash = Trash::at(td.path().join("Trash"));

        let f = File::new(&src).unwrap();
        let moved = trash.put(&f).unwrap();
        assert_eq!(moved.path(), td.path().join("Trash/files/my notes.txt"));

        let info = fs::read_to_string(td.path().join("Trash/info/my notes.txt.trashinfo")).unwrap();
        let mut lines = info.lines();
        assert_eq!(lines.next(), Some("[Trash Info]"));
        let path_line = lines.next().unwrap();
        assert!(path_line.starts_with("Path="));
        assert!(path_line.ends_with("my%20notes.txt"));
        let date_line = lines.next().unwrap();
        let date = date_line.strip_prefix("DeletionDate=").unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S").is_ok());
    }

    #[test]
    fn stale_record_forces_new_name() {
        let td = tempdir().unwrap();
        let trash = Trash::at(td.path().join("Trash"));
        fs::create_dir_all(td.path().join("Trash/info")).unwrap();
        fs::write(td.path().join("Trash/info/a.txt.trashinfo"), b"[Trash Info]\n").unwrap();

        let src = td.path().join("a.txt");
        fs::write(&src, b"x").unwrap();
        let moved = trash.put(&File::new(&src).unwrap()).unwrap();
        assert_eq!(moved.path(), td.path().join("Trash/files/a (2).txt"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn info_record_keeps_raw_name_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let td = tempdir().unwrap();
        let src = td.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&src, b"x").unwrap();
        let trash = Trash::at(td.path().join("Trash"));

        trash.put(&File::new(&src).unwrap()).unwrap();

        let mut info_name = OsStr::from_bytes(b"caf\xe9.txt").to_os_string();
        info_name.push(".trashinfo");
        let info = fs::read_to_string(td.path().join("Trash/info").join(info_name)).unwrap();
        assert!(info.lines().any(|l| l.starts_with("Path=") && l.ends_with("/caf%E9.txt")));
    }
}
