//! Directory-to-menu mapping
//!
//! A menu is the listing of one directory: every visible subdirectory becomes a submenu and
//! every executable file becomes an action. Listings are rebuilt on every visit; nothing is
//! cached between renders.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub mod builder;
pub mod entry;
pub mod tree;

pub use builder::{DEFAULT_HEADER_LINES, MenuBuilder};
pub use entry::{EntryKind, MenuEntry};
pub use tree::MenuTree;

/// Errors that can occur while listing a menu directory
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MenuError {
    pub(crate) fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => MenuError::NotFound(path),
            io::ErrorKind::PermissionDenied => MenuError::PermissionDenied(path),
            io::ErrorKind::NotADirectory => MenuError::NotADirectory(path),
            _ => MenuError::Io { path, source },
        }
    }
}
