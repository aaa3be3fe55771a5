//! Path normalization, tilde expansion and URL rendering.

use std::env;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::errors::{LocationError, Result};
use crate::fs_ops::helpers::io_error_with_help;
use crate::location::SearchPath;

/// Expand a leading `~` to the invoking user's home directory.
///
/// Only `~` on its own and `~/...` are touched; `~user` and `$VARS` are left as-is.
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == OsStr::new("~") => {
            let home = dirs::home_dir()
                .ok_or(LocationError::CouldNotLocateSearchPath(SearchPath::Home))?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Lexically normalize `path` into an absolute path.
///
/// Relative paths are resolved against the current directory. `.` is dropped, `..`
/// pops a component and trailing separators disappear. Symlinks are not resolved.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = env::current_dir().map_err(io_error_with_help("read current folder", path))?;
        cwd.join(expanded)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping at the root is a no-op, matching how the OS treats "/..".
                if out.file_name().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Reject anything that is not exactly one normal path component.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == OsStr::new(name) => Ok(()),
        _ => Err(LocationError::InvalidName(name.to_string())),
    }
}

/// `file://` URL for `path`, percent-encoding everything outside the unreserved set.
pub(crate) fn file_url(path: &Path, is_folder: bool) -> String {
    let mut raw = path_bytes(path);
    if cfg!(windows) {
        raw.iter_mut().filter(|b| **b == b'\\').for_each(|b| *b = b'/');
    }
    let mut url = String::from("file://");
    if raw.first() != Some(&b'/') {
        url.push('/');
    }
    url.push_str(&percent_encode(&raw));
    if is_folder && !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// RFC 3986 percent-encoding of everything except unreserved bytes and `/`.
pub(crate) fn percent_encode(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    for &byte in raw {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            b':' if cfg!(windows) => out.push(':'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Inverse of [`percent_encode`]. `None` on a malformed escape.
pub(crate) fn percent_decode(encoded: &str) -> Option<Vec<u8>> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}

/// Raw bytes of a path, without lossy conversion on Unix.
pub(crate) fn path_bytes(path: &Path) -> Vec<u8> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    }
    #[cfg(not(unix))]
    {
        path.to_string_lossy().into_owned().into_bytes()
    }
}

/// Rebuild a path from [`path_bytes`] output. `None` if the bytes cannot name a path here.
pub(crate) fn path_from_bytes(bytes: Vec<u8>) -> Option<PathBuf> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStringExt;
        Some(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
    }
    #[cfg(not(unix))]
    {
        String::from_utf8(bytes).ok().map(PathBuf::from)
    }
}
