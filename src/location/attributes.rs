//! Attributes applied when a location is actualized.

use std::time::SystemTime;

/// Optional attributes for a newly created file or folder.
///
/// Fields left as `None` are not touched; `Attributes::default()` applies nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// POSIX permission bits (on Windows only the write bits matter).
    pub permissions: Option<u32>,
    /// Modification time.
    pub modified: Option<SystemTime>,
    /// Locked flag (see `Location::set_locked`).
    pub locked: Option<bool>,
}

impl Attributes {
    pub fn with_permissions(mut self, mode: u32) -> Self {
        self.permissions = Some(mode);
        self
    }

    pub fn with_modified(mut self, at: SystemTime) -> Self {
        self.modified = Some(at);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Attributes::default()
    }
}
