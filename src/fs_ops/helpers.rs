//! I/O error adapters.
//!
//! Turns a raw io::Error from an OS call into `LocationError::Unknown` carrying the
//! operation, the path and a platform-aware hint.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create folder", dir))?;

use std::io;
use std::path::Path;

use crate::errors::LocationError;

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" - permission denied; check ownership and write permissions.");
                }
                libc::EXDEV => {
                    msg.push_str(" - cross-filesystem; atomic rename not possible.");
                }
                libc::EBUSY => {
                    msg.push_str(" - resource busy.");
                }
                libc::ENOENT => {
                    msg.push_str(" - path not found; verify it exists.");
                }
                libc::EEXIST => {
                    msg.push_str(" - already exists; pick a unique name or remove the target.");
                }
                libc::ENOTEMPTY => {
                    msg.push_str(" - folder not empty.");
                }
                libc::ENOSPC => {
                    msg.push_str(" - insufficient space on device.");
                }
                libc::EROFS => {
                    msg.push_str(" - read-only filesystem; cannot write here.");
                }
                libc::ELOOP => {
                    msg.push_str(" - too many symbolic link levels (ELOOP); possible symlink cycle.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" - filename or path too long; shorten path segments.");
                }
                libc::EMFILE => {
                    msg.push_str(" - process file descriptor limit reached.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" - access denied; check permissions."), // ERROR_ACCESS_DENIED
                17 => msg.push_str(" - not same device; cross-filesystem move."), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str(" - sharing violation; file is in use."), // ERROR_SHARING_VIOLATION
                2 | 3 => msg.push_str(" - path not found; verify it exists."),
                80 | 183 => msg.push_str(" - already exists; pick a unique name."),
                112 => msg.push_str(" - insufficient disk space."), // ERROR_DISK_FULL
                206 => msg.push_str(" - filename or path too long."), // ERROR_FILENAME_EXCED_RANGE
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" - permission denied; check ownership and write permissions.");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" - path not found; verify it exists.");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" - already exists; remove or choose a unique name.");
            }
            _ => {}
        }
    }

    msg
}

/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> LocationError.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> LocationError + 'a {
    move |e: io::Error| LocationError::Unknown(build_message(op, path, &e))
}

/// Same as `io_error_with_help` for walkdir errors, which may not carry an io::Error.
pub(crate) fn walk_error_with_help(op: &str, root: &Path, e: walkdir::Error) -> LocationError {
    let path = e.path().unwrap_or(root).to_path_buf();
    match e.into_io_error() {
        Some(io) => LocationError::Unknown(build_message(op, &path, &io)),
        None => LocationError::Unknown(format!(
            "{} '{}': filesystem loop detected",
            op,
            path.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notfound_fallback_hint_includes_path() {
        let p = Path::new("/nonexistent/path/for/test");
        let err = io_error_with_help("open", p)(io::Error::from(io::ErrorKind::NotFound));
        let msg = err.to_string();
        assert!(msg.contains("open"));
        assert!(msg.contains("/nonexistent/path/for/test"));
        assert!(msg.contains("path not found"));
        assert!(!err.is_precondition());
    }

    #[cfg(unix)]
    #[test]
    fn enospc_hint_and_os_code_present() {
        let err = io_error_with_help("write", Path::new("/tmp"))(io::Error::from_raw_os_error(
            libc::ENOSPC,
        ));
        let msg = err.to_string();
        assert!(msg.contains("insufficient space"), "msg was: {msg}");
        assert!(msg.contains("os code"));
    }

    #[cfg(unix)]
    #[test]
    fn exdev_hint_present() {
        let err = io_error_with_help("move", Path::new("/tmp/a"))(io::Error::from_raw_os_error(
            libc::EXDEV,
        ));
        assert!(err.to_string().contains("cross-filesystem"));
    }
}
