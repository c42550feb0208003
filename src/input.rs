//! Reading user replies
//!
//! The navigator asks an [`Input`] for one reply at a time. [`TerminalInput`] uses interactive
//! prompts on a real terminal; [`LineInput`] reads plain lines from any reader, which is how
//! piped stdin and the tests drive the menu.

use std::io::{self, BufRead, Write};

use inquire::InquireError;
use inquire::ui::RenderConfig;
use thiserror::Error;

use crate::directive::ArgSpec;
use crate::render;
use crate::theme::Palette;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("unable to read input: {0}")]
    Io(#[from] io::Error),
    #[error("prompt failed: {0}")]
    Prompt(#[from] InquireError),
}

/// What is being asked for
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'a> {
    /// A menu selection
    Selection,
    /// A value for a declared argument
    Argument(&'a ArgSpec),
    /// Acknowledge a finished action
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A line of text without its line terminator
    Line(String),
    /// The user backed out of the prompt (Esc)
    Cancel,
    /// Ctrl-C or end of input
    Interrupt,
}

pub trait Input {
    /// Show `prompt` and wait for a reply.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the underlying terminal or reader fails.
    fn ask(&mut self, prompt: &Prompt<'_>) -> Result<Reply, InputError>;
}

impl<T: Input + ?Sized> Input for &mut T {
    fn ask(&mut self, prompt: &Prompt<'_>) -> Result<Reply, InputError> {
        (**self).ask(prompt)
    }
}

impl<T: Input + ?Sized> Input for Box<T> {
    fn ask(&mut self, prompt: &Prompt<'_>) -> Result<Reply, InputError> {
        (**self).ask(prompt)
    }
}

/// Line-based input over any reader; prompts are written to `writer`
pub struct LineInput<R, W> {
    reader: R,
    writer: W,
    palette: Palette,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            palette: Palette::plain(),
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

impl<R: BufRead, W: Write> Input for LineInput<R, W> {
    fn ask(&mut self, prompt: &Prompt<'_>) -> Result<Reply, InputError> {
        let text = match prompt {
            Prompt::Selection => render::selection_prompt(self.palette),
            Prompt::Argument(spec) => render::argument_prompt(self.palette, spec),
            Prompt::Continue => render::continue_prompt(self.palette),
        };
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;

        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf);
        // Typed input is coloured up to here
        self.writer.write_all(self.palette.close().as_bytes())?;
        if read? == 0 {
            return Ok(Reply::Interrupt);
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line == "\x1b" {
            return Ok(Reply::Cancel);
        }
        Ok(Reply::Line(line.to_string()))
    }
}

/// Interactive prompts on a real terminal
pub struct TerminalInput {
    render_config: RenderConfig<'static>,
}

impl TerminalInput {
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        let render_config = if palette.color() {
            RenderConfig::default_colored()
        } else {
            RenderConfig::empty()
        };
        Self { render_config }
    }
}

impl Input for TerminalInput {
    fn ask(&mut self, prompt: &Prompt<'_>) -> Result<Reply, InputError> {
        let text = match prompt {
            Prompt::Selection => inquire::Text::new(">")
                .with_help_message("number to select, 0 or Esc to go back, q to quit")
                .with_render_config(self.render_config)
                .prompt(),
            // Empty input comes back as an empty line; the navigator substitutes the default
            Prompt::Argument(spec) => inquire::Text::new(&spec.prompt)
                .with_placeholder(&spec.default)
                .with_render_config(self.render_config)
                .prompt(),
            Prompt::Continue => inquire::Text::new("Press Enter to continue...")
                .with_render_config(self.render_config)
                .prompt(),
        };
        match text {
            Ok(line) => Ok(Reply::Line(line)),
            Err(InquireError::OperationCanceled) => Ok(Reply::Cancel),
            Err(InquireError::OperationInterrupted) => Ok(Reply::Interrupt),
            Err(e) => Err(e.into()),
        }
    }
}
