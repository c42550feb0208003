use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;

use crate::directive::ArgSpec;
use crate::source::MenuSource;

use super::{EntryKind, MenuBuilder, MenuError};

/// Directories nested deeper than this are not descended into (guards against symlink loops)
pub const MAX_DEPTH: usize = 16;

/// Snapshot of a whole menu hierarchy, used for non-interactive listing
#[derive(Debug, Clone, Serialize)]
pub struct MenuTree {
    pub name: String,
    pub label: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sudo: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuTree>,
    /// Set when this directory could not be listed (or was too deep to list)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MenuTree {
    /// Walk the menu below `root`.
    ///
    /// Submenus that fail to list are kept with their `error` set; only the root itself
    /// can fail the scan.
    ///
    /// # Errors
    ///
    /// Returns `MenuError` if `root` cannot be listed.
    pub fn scan<S: MenuSource>(builder: &MenuBuilder<S>, root: &Path) -> Result<Self, MenuError> {
        let name = root
            .file_name()
            .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mut tree = MenuTree::directory(name, root.to_path_buf());
        tree.children = scan_children(builder, root, 1)?;
        Ok(tree)
    }

    fn directory(name: String, path: PathBuf) -> Self {
        MenuTree {
            label: name.clone(),
            name,
            path,
            kind: EntryKind::Directory,
            sudo: false,
            args: Vec::new(),
            children: Vec::new(),
            error: None,
        }
    }
}

fn scan_children<S: MenuSource>(
    builder: &MenuBuilder<S>,
    dir: &Path,
    depth: usize,
) -> Result<Vec<MenuTree>, MenuError> {
    let mut children = Vec::new();
    for entry in builder.build(dir)? {
        match entry.kind {
            EntryKind::Executable => {
                let directive = builder.directives(&entry);
                children.push(MenuTree {
                    name: entry.name,
                    label: entry.label,
                    path: entry.path,
                    kind: EntryKind::Executable,
                    sudo: directive.sudo,
                    args: directive.args,
                    children: Vec::new(),
                    error: None,
                });
            }
            EntryKind::Directory => {
                let mut node = MenuTree::directory(entry.name, entry.path);
                if depth >= MAX_DEPTH {
                    node.error = Some("nested too deeply".to_string());
                } else {
                    match scan_children(builder, &node.path, depth + 1) {
                        Ok(grandchildren) => node.children = grandchildren,
                        Err(e) => {
                            warn!("Unable to list submenu: {e}");
                            node.error = Some(e.to_string());
                        }
                    }
                }
                children.push(node);
            }
        }
    }
    Ok(children)
}
