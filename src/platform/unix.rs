//! Unix implementations of platform helpers.
//! macOS gets the user-immutable flag for "locked"; other Unixes map it to the
//! write bits.

use std::ffi::CString;
use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

fn c_path(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))
}

/// access(2) for the calling process' real uid/gid.
fn access(path: &Path, mode: libc::c_int) -> bool {
    match c_path(path) {
        Ok(c) => unsafe { libc::access(c.as_ptr(), mode) == 0 },
        Err(_) => false,
    }
}

pub fn is_readable(path: &Path) -> bool {
    access(path, libc::R_OK)
}

pub fn is_writable(path: &Path) -> bool {
    access(path, libc::W_OK)
}

pub fn is_executable(path: &Path) -> bool {
    access(path, libc::X_OK)
}

/// Unix has no hidden attribute; dot-names are handled by the caller.
pub fn has_hidden_attribute(_meta: &Metadata) -> bool {
    false
}

/// Permission bits including setuid/setgid/sticky.
pub fn mode(meta: &Metadata) -> u32 {
    meta.permissions().mode() & 0o7777
}

pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(target_os = "macos")]
pub fn is_locked(path: &Path) -> io::Result<bool> {
    use std::os::macos::fs::MetadataExt;
    let meta = fs::metadata(path)?;
    Ok(meta.st_flags() & libc::UF_IMMUTABLE != 0)
}

#[cfg(target_os = "macos")]
pub fn set_locked(path: &Path, locked: bool) -> io::Result<()> {
    use std::os::macos::fs::MetadataExt;
    let flags = fs::metadata(path)?.st_flags();
    let flags = if locked {
        flags | libc::UF_IMMUTABLE
    } else {
        flags & !libc::UF_IMMUTABLE
    };
    let c = c_path(path)?;
    if unsafe { libc::chflags(c.as_ptr(), flags as _) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub fn is_locked(path: &Path) -> io::Result<bool> {
    Ok(fs::metadata(path)?.permissions().mode() & 0o222 == 0)
}

#[cfg(not(target_os = "macos"))]
pub fn set_locked(path: &Path, locked: bool) -> io::Result<()> {
    let current = fs::metadata(path)?.permissions().mode() & 0o7777;
    let next = if locked {
        current & !0o222
    } else {
        // Give write back to the owner only; group/other write was never ours to grant.
        current | 0o200
    };
    fs::set_permissions(path, fs::Permissions::from_mode(next))
}

/// Open log file for appending; set 0600 only when creating a new file.
/// An existing file keeps its permissions (e.g. group-readable for log shipping).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}
