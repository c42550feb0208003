use std::cmp::Ordering;
use std::path::Path;

use log::debug;

use crate::directive::{self, Directive, ExecutionDirective};
use crate::source::{ChildKind, MenuSource, is_hidden};

use super::{EntryKind, MenuEntry, MenuError};

/// How many lines of a script are scanned for directives unless configured otherwise
pub const DEFAULT_HEADER_LINES: usize = 20;

/// Builds menu listings from a [`MenuSource`]
#[derive(Debug, Clone)]
pub struct MenuBuilder<S> {
    source: S,
    header_lines: usize,
}

impl<S: MenuSource> MenuBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            header_lines: DEFAULT_HEADER_LINES,
        }
    }

    /// Scan at most `lines` lines of each file (at least one).
    #[must_use]
    pub fn with_header_lines(mut self, lines: usize) -> Self {
        self.header_lines = lines.max(1);
        self
    }

    /// List `dir` as menu entries, sorted by label (case-insensitive) and then by name.
    ///
    /// Hidden children and files without an executable bit are left out.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::NotFound`, `MenuError::PermissionDenied` or
    /// `MenuError::NotADirectory` when `dir` cannot be listed.
    pub fn build(&self, dir: &Path) -> Result<Vec<MenuEntry>, MenuError> {
        let children = self
            .source
            .list(dir)
            .map_err(|e| MenuError::from_io(dir.to_path_buf(), e))?;

        let mut entries: Vec<MenuEntry> = children
            .into_iter()
            .filter(|child| !is_hidden(&child.name))
            .filter_map(|child| {
                let kind = match child.kind {
                    ChildKind::Directory => EntryKind::Directory,
                    ChildKind::Executable => EntryKind::Executable,
                    ChildKind::Other => return None,
                };
                let label = match kind {
                    EntryKind::Directory => child.name.clone(),
                    EntryKind::Executable => self.label_for(&child.path, &child.name),
                };
                Some(MenuEntry {
                    name: child.name,
                    path: child.path,
                    kind,
                    label,
                })
            })
            .collect();

        entries.sort_by(compare_entries);
        debug!("Listed {} entries in {}", entries.len(), dir.display());
        Ok(entries)
    }

    /// Label from the first `LABEL` directive, falling back to `name`.
    ///
    /// Unreadable files fall back silently.
    pub fn label_for(&self, path: &Path, name: &str) -> String {
        directive::label(&self.header(path))
            .map_or_else(|| name.to_string(), str::to_string)
    }

    /// Read the execution directives of `entry` from disk.
    ///
    /// Called right before a launch so edits to the script are always picked up.
    pub fn directives(&self, entry: &MenuEntry) -> ExecutionDirective {
        ExecutionDirective::from(self.header(&entry.path).as_slice())
    }

    fn header(&self, path: &Path) -> Vec<Directive> {
        match self.source.read_header(path, self.header_lines) {
            Ok(lines) => directive::parse_header(lines.iter().map(String::as_str)),
            Err(e) => {
                debug!("Unable to read header of {}: {e}", path.display());
                Vec::new()
            }
        }
    }
}

fn compare_entries(a: &MenuEntry, b: &MenuEntry) -> Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
