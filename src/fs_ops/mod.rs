//! Filesystem operations behind the `Location` API: modularized.

pub(crate) mod alias;
mod duplicate;
pub mod helpers;
pub(crate) mod link;
pub(crate) mod metadata;
pub(crate) mod transfer;
pub mod trash;
pub mod unique;
mod util;

pub use trash::{Trash, TrashLayout};
pub use unique::unique_name;
