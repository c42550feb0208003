use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    Executable,
}

/// A single selectable item in a rendered menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    /// Filesystem base name
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Display text, never empty
    pub label: String,
}

impl MenuEntry {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
