//! Moving and copying raw paths.
//!
//! Callers (the `Location` operations) have already checked that the source exists and
//! the destination is free; these helpers only talk to the OS.
//!
//! - move: rename first; on a cross-device error fall back to copy + remove.
//! - copy of a file: stream into a hidden temp sibling, fsync, rename into place.
//! - copy of a folder: create the directory skeleton, recreate symlinks, then copy the
//!   files in parallel (rayon). Folder timestamps are restored last, deepest first.
//!   A failed folder copy removes the partial destination it created.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

use crate::errors::{LocationError, Result};

use super::helpers::{io_error_with_help, walk_error_with_help};
use super::link;
use super::metadata::{preserve_metadata, preserve_xattrs};
use super::util::{fsync_dir, is_cross_device, unique_temp_path};

/// Move `src` to `dest` (same name or not). `dest` must not exist.
pub(crate) fn move_item(src: &Path, dest: &Path, preserve: bool) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => {
            if let Some(parent) = dest.parent() {
                // Ignore fsync errors to avoid turning a successful rename into a failure.
                let _ = fsync_dir(parent);
            }
            debug!(src = %src.display(), dest = %dest.display(), "renamed atomically");
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(src = %src.display(), dest = %dest.display(), "cross-device move; falling back to copy + remove");
            copy_item(src, dest, preserve)?;
            remove_any(src)?;
            info!(src = %src.display(), dest = %dest.display(), "copied across devices and removed source");
            Ok(())
        }
        Err(e) => Err(io_error_with_help("move", src)(e)),
    }
}

/// Copy `src` to `dest`; recursive for folders. `dest` must not exist.
pub(crate) fn copy_item(src: &Path, dest: &Path, preserve: bool) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat copy source", src))?;
    let ftype = meta.file_type();
    if ftype.is_symlink() {
        // A top-level link is copied as what it points to, like the OS copy primitive.
        let followed = fs::metadata(src).map_err(io_error_with_help("follow link", src))?;
        if followed.is_dir() {
            copy_tree(src, dest, preserve)
        } else {
            copy_file(src, dest, preserve)
        }
    } else if ftype.is_dir() {
        copy_tree(src, dest, preserve)
    } else {
        copy_file(src, dest, preserve)
    }
}

/// Copy a single file via a temp sibling so `dest` never holds a partial copy.
pub(crate) fn copy_file(src: &Path, dest: &Path, preserve: bool) -> Result<()> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| LocationError::Unknown(format!("destination has no parent: {}", dest.display())))?;
    let tmp = unique_temp_path(dest_dir);

    let bytes = match fs::copy(src, &tmp) {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(io_error_with_help("copy to temporary file", &tmp)(e));
        }
    };
    if let Err(e) = fs::File::open(&tmp).and_then(|f| f.sync_all()) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help("fsync temporary file", &tmp)(e));
    }
    if let Err(e) = fs::rename(&tmp, dest) {
        // Best-effort cleanup of the temp file on failure.
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help("rename temporary file into place", dest)(e));
    }
    let _ = fsync_dir(dest_dir);

    if preserve {
        if let Ok(meta) = fs::metadata(src) {
            preserve_metadata(dest, &meta);
        }
        preserve_xattrs(src, dest);
    }
    trace!(src = %src.display(), dest = %dest.display(), bytes, "file copied");
    Ok(())
}

fn copy_tree(src_dir: &Path, target: &Path, preserve: bool) -> Result<()> {
    let mut dirs: Vec<(PathBuf, PathBuf)> = Vec::new();
    let mut files: Vec<(PathBuf, PathBuf)> = Vec::new();

    if let Err(e) = populate_tree(src_dir, target, preserve, &mut dirs, &mut files) {
        // `target` is the first folder recorded; anything earlier failed before creating it.
        if !dirs.is_empty() {
            match fs::remove_dir_all(target) {
                Ok(()) => debug!(dest = %target.display(), "removed partial folder copy"),
                Err(cleanup) => {
                    warn!(dest = %target.display(), error = %cleanup, "could not remove partial folder copy")
                }
            }
        }
        return Err(e);
    }

    // Pass 3: folder metadata, deepest first, so populating children doesn't bump mtimes.
    if preserve {
        for (src, dst) in dirs.iter().rev() {
            if let Ok(meta) = fs::metadata(src) {
                preserve_metadata(dst, &meta);
            }
        }
    }

    debug!(src = %src_dir.display(), dest = %target.display(), folders = dirs.len(), files = files.len(), "folder copied");
    Ok(())
}

/// Passes 1 and 2 of a folder copy. Created folders are recorded in `dirs` as they appear.
fn populate_tree(
    src_dir: &Path,
    target: &Path,
    preserve: bool,
    dirs: &mut Vec<(PathBuf, PathBuf)>,
    files: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<()> {
    // Pass 1: skeleton and links, in walk order (parents before children).
    for entry in WalkDir::new(src_dir).follow_links(false) {
        let entry = entry.map_err(|e| walk_error_with_help("read folder", src_dir, e))?;
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|e| LocationError::Unknown(e.to_string()))?;
        let dst = target.join(rel);
        let ftype = entry.file_type();

        if ftype.is_dir() {
            fs::create_dir(&dst).map_err(io_error_with_help("create folder", &dst))?;
            dirs.push((entry.path().to_path_buf(), dst));
        } else if ftype.is_symlink() {
            let link_target = fs::read_link(entry.path())
                .map_err(io_error_with_help("read link", entry.path()))?;
            let target_is_dir = fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false);
            link::symlink(&link_target, &dst, target_is_dir)
                .map_err(io_error_with_help("recreate link", &dst))?;
        } else {
            files.push((entry.into_path(), dst));
        }
    }

    // Pass 2: file contents in parallel. The tree is fresh, so no temp siblings needed.
    files.par_iter().try_for_each(|(src, dst)| -> Result<()> {
        fs::copy(src, dst).map_err(io_error_with_help("copy file to destination", dst))?;
        if preserve {
            if let Ok(meta) = fs::metadata(src) {
                preserve_metadata(dst, &meta);
            }
            preserve_xattrs(src, dst);
        }
        Ok(())
    })
}

/// Remove whatever is at `path` without following a top-level link.
fn remove_any(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(io_error_with_help("stat source", path))?;
    let res = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    res.map_err(io_error_with_help("remove source after copy", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn copy_file_leaves_no_temp_behind() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src = temp.child("src.txt");
        src.write_str("hello world").unwrap();
        let dest_dir = temp.child("out");
        dest_dir.create_dir_all().unwrap();
        let dest = dest_dir.child("src.txt");

        copy_file(src.path(), dest.path(), true).unwrap();

        dest.assert("hello world");
        for entry in fs::read_dir(dest_dir.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.starts_with(".fs_location."), "tmp file left behind: {name}");
        }
    }

    #[test]
    fn copy_tree_copies_nested_content() {
        let temp = assert_fs::TempDir::new().unwrap();
        let d = temp.child("folder");
        d.child("one.txt").write_str("one").unwrap();
        d.child("sub").child("two.txt").write_str("two").unwrap();
        d.child("empty").create_dir_all().unwrap();

        let target = temp.child("copy");
        copy_item(d.path(), target.path(), true).unwrap();

        target.child("one.txt").assert("one");
        target.child("sub").child("two.txt").assert("two");
        assert!(target.child("empty").path().is_dir());
        d.child("one.txt").assert("one");
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_inner_links() {
        let temp = assert_fs::TempDir::new().unwrap();
        let d = temp.child("folder");
        d.child("real.txt").write_str("real").unwrap();
        std::os::unix::fs::symlink("real.txt", d.child("link.txt").path()).unwrap();

        let target = temp.child("copy");
        copy_item(d.path(), target.path(), false).unwrap();

        let copied = target.child("link.txt");
        assert!(fs::symlink_metadata(copied.path()).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(copied.path()).unwrap(), PathBuf::from("real.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_tree_copy_removes_partial_target() {
        let temp = assert_fs::TempDir::new().unwrap();
        let d = temp.child("folder");
        d.child("ok.txt").write_str("ok").unwrap();
        // Opening a socket for reading fails, so the file pass errors out.
        let _listener = std::os::unix::net::UnixListener::bind(d.child("zz.sock").path()).unwrap();

        let target = temp.child("copy");
        assert!(copy_item(d.path(), target.path(), false).is_err());
        assert!(!target.path().exists());
        d.child("ok.txt").assert("ok");
    }

    #[test]
    fn move_item_renames_folder() {
        let temp = assert_fs::TempDir::new().unwrap();
        let d = temp.child("a");
        d.child("x.txt").write_str("x").unwrap();
        let dest = temp.child("b");
        move_item(d.path(), dest.path(), true).unwrap();
        assert!(!d.path().exists());
        dest.child("x.txt").assert("x");
    }
}
