use anstyle::{AnsiColor, Color, Reset, Style};

pub const DARK_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
pub const BRIGHT_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen)));
pub const DARK_YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
pub const FAILURE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
pub const DIM: Style = Style::new().dimmed();

/// Applies styles only when colour output is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    #[must_use]
    pub fn plain() -> Self {
        Self::new(false)
    }

    #[must_use]
    pub fn color(self) -> bool {
        self.color
    }

    #[must_use]
    pub fn paint(self, style: Style, text: &str) -> String {
        if self.color {
            format!("{style}{text}{Reset}")
        } else {
            text.to_string()
        }
    }

    /// Start `style` without closing it, for text the user is about to type
    #[must_use]
    pub fn open(self, style: Style) -> String {
        if self.color {
            style.render().to_string()
        } else {
            String::new()
        }
    }

    /// Undo [`Palette::open`]
    #[must_use]
    pub fn close(self) -> String {
        if self.color {
            Reset.render().to_string()
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_palette_emits_no_escapes() {
        assert_eq!(Palette::plain().paint(FAILURE, "oops"), "oops");
    }

    #[test]
    fn test_colored_palette_wraps_text() {
        let painted = Palette::new(true).paint(DARK_GREEN, "ok");
        assert!(painted.starts_with("\x1b["));
        assert!(painted.contains("ok"));
        assert!(painted.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_open_and_close() {
        assert_eq!(Palette::new(true).open(DARK_YELLOW), "\x1b[33m");
        assert_eq!(Palette::new(true).close(), "\x1b[0m");
        assert!(Palette::plain().open(DARK_YELLOW).is_empty());
        assert!(Palette::plain().close().is_empty());
    }
}
