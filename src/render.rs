//! Text rendering for the menu, prompts and status messages
//!
//! Everything here returns strings so the navigator decides where they go.

use std::fmt::Write;

use crate::directive::ArgSpec;
use crate::launcher::Exit;
use crate::menu::{EntryKind, MenuEntry, MenuTree};
use crate::theme::{self, Palette};

const BANNER: &str = r"  ____
 |  _ \ __ _  ___ ___   ___  _ __
 | |_) / _` |/ __/ _ \ / _ \| '_ \
 |  _ < (_| | (_| (_) | (_) | | | |
 |_| \_\__,_|\___\___/ \___/|_| |_|
";

#[must_use]
pub fn banner(p: Palette) -> String {
    format!("{}\n", p.paint(theme::BRIGHT_GREEN, BANNER))
}

/// A numbered listing followed by the exit (root) or back (submenu) item
#[must_use]
pub fn menu(p: Palette, entries: &[MenuEntry], at_root: bool) -> String {
    let mut out = String::from("\n");
    for (i, entry) in entries.iter().enumerate() {
        let number = p.paint(theme::BRIGHT_GREEN, &format!("[{}]", i + 1));
        let text = match entry.kind {
            EntryKind::Directory => p.paint(theme::DARK_GREEN, &format!("{}/", entry.name)),
            EntryKind::Executable => p.paint(theme::BRIGHT_GREEN, &entry.label),
        };
        let _ = writeln!(out, "  {number}  {text}");
    }
    let leave = if at_root { "Exit" } else { "Back" };
    let _ = writeln!(
        out,
        "\n  {}  {}",
        p.paint(theme::BRIGHT_GREEN, "[0]"),
        p.paint(theme::BRIGHT_GREEN, leave)
    );
    out
}

#[must_use]
pub fn selection_prompt(p: Palette) -> String {
    format!(
        "  {} {}",
        p.paint(theme::DARK_GREEN, ">"),
        p.open(theme::DARK_YELLOW)
    )
}

#[must_use]
pub fn argument_prompt(p: Palette, spec: &ArgSpec) -> String {
    format!(
        "  {} [{}]: {}",
        p.paint(theme::DARK_GREEN, &spec.prompt),
        p.paint(theme::BRIGHT_GREEN, &spec.default),
        p.open(theme::DARK_YELLOW)
    )
}

#[must_use]
pub fn continue_prompt(p: Palette) -> String {
    format!("\n  {}", p.paint(theme::DARK_GREEN, "Press Enter to continue..."))
}

/// `  * message`
#[must_use]
pub fn notice(p: Palette, message: &str) -> String {
    format!("  {} {message}\n", p.paint(theme::BRIGHT_GREEN, "*"))
}

#[must_use]
pub fn failure(p: Palette, message: &str) -> String {
    format!("  {} {message}\n", p.paint(theme::FAILURE, "✘"))
}

#[must_use]
pub fn goodbye(p: Palette) -> String {
    format!("  {}\n", p.paint(theme::DARK_GREEN, "Goodbye."))
}

#[must_use]
pub fn start_message(p: Palette, label: &str) -> String {
    format!("\n  {} {label}\n\n", p.paint(theme::BRIGHT_GREEN, "❱"))
}

#[must_use]
pub fn exit_message(p: Palette, label: &str, exit: Exit) -> String {
    if exit.interrupted() {
        format!("\n{}", notice(p, "Script interrupted"))
    } else if exit.success() {
        format!(
            "\n  {} {label} succeeded {}\n",
            p.paint(theme::BRIGHT_GREEN, "❱"),
            p.paint(theme::DARK_GREEN, "✓")
        )
    } else {
        format!(
            "\n  {} {label} failed {} ({exit})\n",
            p.paint(theme::BRIGHT_GREEN, "❱"),
            p.paint(theme::FAILURE, "✘")
        )
    }
}

/// Render a whole menu hierarchy with tree guides
#[must_use]
pub fn tree(p: Palette, tree: &MenuTree) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.paint(theme::BRIGHT_GREEN, &format!("{}/", tree.name)));
    render_children(p, &tree.children, &mut Vec::new(), &mut out);
    out
}

fn render_children(p: Palette, children: &[MenuTree], ancestors: &mut Vec<bool>, out: &mut String) {
    for (i, node) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let mut prefix = String::new();
        for &ancestor_is_last in ancestors.iter() {
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if is_last { "└─ " } else { "├─ " });

        let text = match node.kind {
            EntryKind::Directory => {
                let mut text = p.paint(theme::DARK_GREEN, &format!("{}/", node.name));
                if let Some(error) = &node.error {
                    let _ = write!(text, " {}", p.paint(theme::FAILURE, &format!("({error})")));
                }
                text
            }
            EntryKind::Executable => {
                let mut details = vec![node.name.clone()];
                if node.sudo {
                    details.push("sudo".to_string());
                }
                match node.args.len() {
                    0 => {}
                    1 => details.push("1 arg".to_string()),
                    n => details.push(format!("{n} args")),
                }
                format!(
                    "{} {}",
                    p.paint(theme::BRIGHT_GREEN, &node.label),
                    p.paint(theme::DIM, &format!("[{}]", details.join(", ")))
                )
            }
        };
        let _ = writeln!(out, "{}{text}", p.paint(theme::DIM, &prefix));

        if !node.children.is_empty() {
            ancestors.push(is_last);
            render_children(p, &node.children, ancestors, out);
            ancestors.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, label: &str, kind: EntryKind) -> MenuEntry {
        MenuEntry {
            name: name.to_string(),
            path: PathBuf::from("/m").join(name),
            kind,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_menu_listing() {
        let entries = vec![
            entry("net", "net", EntryKind::Directory),
            entry("up.sh", "Update", EntryKind::Executable),
        ];
        assert_eq!(
            menu(Palette::plain(), &entries, true),
            "\n  [1]  net/\n  [2]  Update\n\n  [0]  Exit\n"
        );
    }

    #[test]
    fn test_submenu_offers_back() {
        assert_eq!(menu(Palette::plain(), &[], false), "\n\n  [0]  Back\n");
    }

    #[test]
    fn test_argument_prompt_shows_default() {
        let spec = ArgSpec {
            key: "host".to_string(),
            prompt: "Target host".to_string(),
            default: "localhost".to_string(),
        };
        assert_eq!(
            argument_prompt(Palette::plain(), &spec),
            "  Target host [localhost]: "
        );
    }

    #[test]
    fn test_exit_messages() {
        let p = Palette::plain();
        assert_eq!(
            exit_message(p, "Backup", Exit::Code(0)),
            "\n  ❱ Backup succeeded ✓\n"
        );
        assert_eq!(
            exit_message(p, "Backup", Exit::Code(4)),
            "\n  ❱ Backup failed ✘ (exited with status 4)\n"
        );
        assert_eq!(
            exit_message(p, "Backup", Exit::Signal(2)),
            "\n  * Script interrupted\n"
        );
    }
}
