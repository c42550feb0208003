//! A terminal menu generated from a directory tree
//!
//! Subdirectories of the menu root become submenus and executable files become actions that
//! run as child processes. Scripts can describe themselves with header comments (`# LABEL:`,
//! `# SUDO:`, `# ARG:`); see [`directive`] for the grammar.
//!
//! The filesystem is the only source of truth. Every listing is rebuilt on each visit and
//! directives are read again right before each launch.

pub mod config;
pub mod directive;
pub mod input;
pub mod interrupt;
pub mod launcher;
pub mod logger;
pub mod menu;
pub mod navigator;
pub mod render;
pub mod source;
pub mod theme;

pub use config::{ConfigError, Options, resolve_root};
pub use menu::{MenuBuilder, MenuEntry};
pub use navigator::Navigator;
