//! Platform-specific helpers.
//! Hides OS differences (Unix/Windows) behind a uniform API so the location types
//! stay platform-agnostic: permission bits, effective access checks, the hidden
//! attribute, the locked flag and secure log-file opening.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    has_hidden_attribute, is_executable, is_locked, is_readable, is_writable, mode,
    open_log_file_secure_append, set_locked, set_mode,
};

#[cfg(not(unix))]
pub use windows::{
    has_hidden_attribute, is_executable, is_locked, is_readable, is_writable, mode,
    open_log_file_secure_append, set_locked, set_mode,
};

use std::ffi::OsStr;
use std::fs::Metadata;

/// Directory-entry hiddenness: a leading dot anywhere, plus the hidden attribute on
/// Windows. `meta` is only called where that attribute exists.
pub fn is_hidden_entry<F>(name: &OsStr, meta: F) -> bool
where
    F: FnOnce() -> Option<Metadata>,
{
    if name.to_string_lossy().starts_with('.') {
        return true;
    }
    #[cfg(not(unix))]
    {
        meta().is_some_and(|m| has_hidden_attribute(&m))
    }
    #[cfg(unix)]
    {
        drop(meta);
        false
    }
}
