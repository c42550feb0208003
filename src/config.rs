//! Runtime options and menu root resolution
//!
//! There is no configuration file: the menu directory itself is the configuration. These
//! options come from the command line and environment.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

/// Directory name looked up when no menu root is given
pub const DEFAULT_MENU_DIR: &str = "menu";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Directory '{0}' not found.")]
    RootNotFound(PathBuf),
    #[error("Unable to resolve menu directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Behaviour switches for the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Wait for Enter after an action finishes
    pub pause_after_run: bool,
    /// Print the banner above the top-level menu
    pub banner: bool,
    pub color: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            pause_after_run: true,
            banner: true,
            color: false,
        }
    }
}

/// Whether stdout can take ANSI colours.
///
/// Honours `NO_COLOR` and `TERM=dumb`.
#[must_use]
pub fn color_supported() -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if std::env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// The `menu` directory next to the executable, falling back to `./menu`.
#[must_use]
pub fn default_root() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_MENU_DIR)));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from(DEFAULT_MENU_DIR),
    }
}

/// Resolve the menu root, returning its canonical path.
///
/// # Errors
///
/// Returns `ConfigError::RootNotFound` if `path` (or the default location) is not a directory.
pub fn resolve_root(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let root = path.map_or_else(default_root, Path::to_path_buf);
    debug!("Resolving menu root {}", root.display());
    if !root.is_dir() {
        return Err(ConfigError::RootNotFound(root));
    }
    let root = root
        .canonicalize()
        .map_err(|source| ConfigError::Io { path: root, source })?;
    info!("Using menu root {}", root.display());
    Ok(root)
}
