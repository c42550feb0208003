//! Read-only access to the menu directory tree
//!
//! Everything the menu knows comes from a [`MenuSource`]. The real implementation reads the
//! disk; [`MemorySource`] holds a fake tree so listing and navigation can be exercised
//! without touching the filesystem.

use std::io;
use std::path::{Path, PathBuf};

mod disk;
mod memory;

pub use disk::DiskSource;
pub use memory::MemorySource;

/// Upper bound on the bytes read while scanning a file header.
pub const MAX_HEADER_BYTES: u64 = 64 * 1024;

/// What a directory child turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Directory,
    Executable,
    /// Plain file without an executable bit, or something that is neither file nor directory
    Other,
}

/// A direct child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub name: String,
    pub path: PathBuf,
    pub kind: ChildKind,
}

pub trait MenuSource {
    /// List the direct children of `dir`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns the underlying `io::Error` when `dir` is missing, unreadable or not a directory.
    fn list(&self, dir: &Path) -> io::Result<Vec<Child>>;

    /// Read at most `max_lines` lines from the start of `file`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so binaries can be scanned safely.
    ///
    /// # Errors
    ///
    /// Returns the underlying `io::Error` when `file` cannot be opened or read.
    fn read_header(&self, file: &Path, max_lines: usize) -> io::Result<Vec<String>>;

    /// Whether `path` currently names a directory
    fn is_dir(&self, path: &Path) -> bool;
}

impl<S: MenuSource + ?Sized> MenuSource for &S {
    fn list(&self, dir: &Path) -> io::Result<Vec<Child>> {
        (**self).list(dir)
    }

    fn read_header(&self, file: &Path, max_lines: usize) -> io::Result<Vec<String>> {
        (**self).read_header(file, max_lines)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}

/// Hidden entries start with a dot
#[must_use]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
