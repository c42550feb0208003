//! The interactive read-render-dispatch loop
//!
//! [`Navigator`] is an explicit state machine. Each call to [`Navigator::step`] performs one
//! transition:
//!
//! - `Browsing` lists the current directory, renders it and reads a selection. Directories are
//!   descended into (the current directory is pushed onto the stack), executables move to
//!   `Prompting` or straight to `Executing`.
//! - `Prompting` collects one argument value per step, substituting the declared default for
//!   empty input.
//! - `Executing` runs the action, reports how it ended and returns to `Browsing` in the
//!   directory it was started from. The listing is rebuilt, so changes the action made to the
//!   menu tree show up immediately.
//! - `Exited` is terminal.
//!
//! Listing failures never end the loop unless the root itself becomes unreadable; the
//! navigator reports them and falls back to the parent menu.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::Options;
use crate::directive::ExecutionDirective;
use crate::input::{Input, InputError, Prompt, Reply};
use crate::launcher::{LaunchRequest, ProcessLauncher};
use crate::menu::{EntryKind, MenuBuilder, MenuEntry, MenuError};
use crate::render;
use crate::source::MenuSource;
use crate::theme::Palette;

#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("menu root is no longer available: {0}")]
    RootUnavailable(#[source] MenuError),
    #[error("unable to write to the terminal: {0}")]
    Output(#[from] io::Error),
    #[error(transparent)]
    Input(#[from] InputError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Browsing {
        dir: PathBuf,
    },
    Prompting {
        dir: PathBuf,
        entry: MenuEntry,
        directive: ExecutionDirective,
        collected: Vec<String>,
    },
    Executing {
        dir: PathBuf,
        entry: MenuEntry,
        sudo: bool,
        args: Vec<String>,
    },
    Exited,
}

/// A parsed menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 1-based position in the displayed listing
    Index(usize),
    Back,
    Quit,
}

/// Why a selection was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotANumber,
    OutOfRange,
}

impl Rejection {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Rejection::NotANumber => "Please enter a number",
            Rejection::OutOfRange => "Invalid choice",
        }
    }
}

/// Parse a selection against a listing of `count` entries.
///
/// `0`, empty input, `b` and `back` go back; `q`, `quit` and `exit` quit.
///
/// # Errors
///
/// Returns a `Rejection` for non-numeric or out-of-range input.
pub fn parse_selection(input: &str, count: usize) -> Result<Selection, Rejection> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "" | "0" | "b" | "back" => return Ok(Selection::Back),
        "q" | "quit" | "exit" => return Ok(Selection::Quit),
        _ => {}
    }
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Rejection::NotANumber);
    }
    // Digits that overflow are still a number, just never a listed one
    let Ok(index) = input.parse::<usize>() else {
        return Err(Rejection::OutOfRange);
    };
    if index == 0 {
        return Ok(Selection::Back);
    }
    if index > count {
        return Err(Rejection::OutOfRange);
    }
    Ok(Selection::Index(index))
}

pub struct Navigator<S, I, L, W> {
    builder: MenuBuilder<S>,
    input: I,
    launcher: L,
    out: W,
    options: Options,
    palette: Palette,
    stack: Vec<PathBuf>,
    state: State,
}

impl<S, I, L, W> Navigator<S, I, L, W>
where
    S: MenuSource,
    I: Input,
    L: ProcessLauncher,
    W: Write,
{
    pub fn new(builder: MenuBuilder<S>, root: PathBuf, input: I, launcher: L, out: W) -> Self {
        let options = Options::default();
        Self {
            builder,
            input,
            launcher,
            out,
            palette: Palette::new(options.color),
            options,
            stack: Vec::new(),
            state: State::Browsing { dir: root },
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.palette = Palette::new(options.color);
        self.options = options;
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Directories between the root and the current menu, root first
    pub fn stack(&self) -> &[PathBuf] {
        &self.stack
    }

    /// Drive the loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns `NavigatorError::RootUnavailable` if the root menu can no longer be listed, or
    /// an I/O error from the terminal.
    pub fn run(&mut self) -> Result<(), NavigatorError> {
        if self.options.banner {
            self.write(&render::banner(self.palette))?;
        }
        while self.state != State::Exited {
            self.step()?;
        }
        Ok(())
    }

    /// Perform a single state transition.
    ///
    /// # Errors
    ///
    /// See [`Navigator::run`].
    pub fn step(&mut self) -> Result<(), NavigatorError> {
        let state = std::mem::replace(&mut self.state, State::Exited);
        self.state = match state {
            State::Browsing { dir } => self.browse(dir)?,
            State::Prompting {
                dir,
                entry,
                directive,
                collected,
            } => self.prompt(dir, entry, directive, collected)?,
            State::Executing {
                dir,
                entry,
                sudo,
                args,
            } => self.execute(dir, &entry, sudo, &args)?,
            State::Exited => State::Exited,
        };
        Ok(())
    }

    fn browse(&mut self, dir: PathBuf) -> Result<State, NavigatorError> {
        let entries = match self.builder.build(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Unable to list {}: {e}", dir.display());
                self.write(&render::failure(self.palette, &e.to_string()))?;
                return match self.stack.pop() {
                    Some(parent) => Ok(State::Browsing { dir: parent }),
                    None => Err(NavigatorError::RootUnavailable(e)),
                };
            }
        };

        let at_root = self.stack.is_empty();
        self.write(&render::menu(self.palette, &entries, at_root))?;

        loop {
            let selection = match self.input.ask(&Prompt::Selection)? {
                Reply::Line(line) => parse_selection(&line, entries.len()),
                Reply::Cancel => Ok(Selection::Back),
                Reply::Interrupt => Ok(Selection::Quit),
            };
            match selection {
                Ok(Selection::Index(index)) => {
                    let entry = entries[index - 1].clone();
                    return Ok(self.select(dir, entry));
                }
                Ok(Selection::Back) => {
                    return match self.stack.pop() {
                        Some(parent) => {
                            debug!("Back to {}", parent.display());
                            Ok(State::Browsing { dir: parent })
                        }
                        None => self.quit(),
                    };
                }
                Ok(Selection::Quit) => return self.quit(),
                Err(rejection) => {
                    self.write(&render::notice(self.palette, rejection.message()))?;
                }
            }
        }
    }

    fn select(&mut self, dir: PathBuf, entry: MenuEntry) -> State {
        match entry.kind {
            EntryKind::Directory => {
                info!("Entering {}", entry.path.display());
                self.stack.push(dir);
                State::Browsing { dir: entry.path }
            }
            EntryKind::Executable => {
                let directive = self.builder.directives(&entry);
                if directive.args.is_empty() {
                    State::Executing {
                        dir,
                        entry,
                        sudo: directive.sudo,
                        args: Vec::new(),
                    }
                } else {
                    State::Prompting {
                        dir,
                        entry,
                        directive,
                        collected: Vec::new(),
                    }
                }
            }
        }
    }

    fn prompt(
        &mut self,
        dir: PathBuf,
        entry: MenuEntry,
        directive: ExecutionDirective,
        mut collected: Vec<String>,
    ) -> Result<State, NavigatorError> {
        if let Some(spec) = directive.args.get(collected.len()) {
            match self.input.ask(&Prompt::Argument(spec))? {
                Reply::Line(value) if value.is_empty() => collected.push(spec.default.clone()),
                Reply::Line(value) => collected.push(value),
                Reply::Cancel => {
                    self.write(&render::notice(self.palette, "Cancelled"))?;
                    return Ok(State::Browsing { dir });
                }
                Reply::Interrupt => return self.quit(),
            }
        }

        if collected.len() < directive.args.len() {
            return Ok(State::Prompting {
                dir,
                entry,
                directive,
                collected,
            });
        }
        Ok(State::Executing {
            dir,
            entry,
            sudo: directive.sudo,
            args: collected,
        })
    }

    fn execute(
        &mut self,
        dir: PathBuf,
        entry: &MenuEntry,
        sudo: bool,
        args: &[String],
    ) -> Result<State, NavigatorError> {
        self.write(&render::start_message(self.palette, &entry.label))?;
        let request = LaunchRequest {
            program: &entry.path,
            args,
            elevate: sudo,
        };
        match self.launcher.launch(&request) {
            Ok(exit) => {
                self.write(&render::exit_message(self.palette, &entry.label, exit))?;
            }
            Err(e) => {
                warn!("Unable to run {}: {e}", entry.path.display());
                self.write(&render::failure(self.palette, &e.to_string()))?;
            }
        }

        if self.options.pause_after_run
            && self.input.ask(&Prompt::Continue)? == Reply::Interrupt
        {
            return self.quit();
        }
        Ok(State::Browsing { dir })
    }

    fn quit(&mut self) -> Result<State, NavigatorError> {
        self.write(&render::goodbye(self.palette))?;
        Ok(State::Exited)
    }

    fn write(&mut self, text: &str) -> Result<(), NavigatorError> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<S, I, L, W> Navigator<S, I, L, W> {
    /// The directory currently being browsed, prompted in or executed from
    pub fn current_dir(&self) -> Option<&Path> {
        match &self.state {
            State::Browsing { dir }
            | State::Prompting { dir, .. }
            | State::Executing { dir, .. } => Some(dir),
            State::Exited => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::{ElevationError, Exit, LaunchError};
    use crate::input::LineInput;
    use crate::source::MemorySource;
    use std::io::Cursor;

    /// Records launches and answers with scripted results
    #[derive(Default)]
    struct FakeLauncher {
        launches: Vec<(PathBuf, Vec<String>, bool)>,
        results: Vec<Result<Exit, LaunchError>>,
    }

    impl ProcessLauncher for FakeLauncher {
        fn launch(&mut self, request: &LaunchRequest<'_>) -> Result<Exit, LaunchError> {
            self.launches.push((
                request.program.to_path_buf(),
                request.args.to_vec(),
                request.elevate,
            ));
            if self.results.is_empty() {
                Ok(Exit::Code(0))
            } else {
                self.results.remove(0)
            }
        }
    }

    fn quiet() -> Options {
        Options {
            banner: false,
            pause_after_run: false,
            ..Options::default()
        }
    }

    fn source() -> MemorySource {
        MemorySource::new("/menu")
            .with_dir("/menu/net")
            .with_script("/menu/net/ping.sh", "# LABEL: Ping\n")
            .with_script(
                "/menu/greet.sh",
                "#!/bin/sh\n# LABEL: Greet\n# ARG: name \"Enter name\" \"default-x\"\n# ARG: greeting \"Greeting\" \"hello\"\n",
            )
            .with_script("/menu/update.sh", "# LABEL: Update\n# SUDO: true\n")
    }

    fn run_script(
        source: &MemorySource,
        script: &str,
        launcher: &mut FakeLauncher,
    ) -> (String, Result<(), NavigatorError>) {
        let mut out = Vec::new();
        let result = Navigator::new(
            MenuBuilder::new(source),
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new(script.to_string()), io::sink()),
            &mut *launcher,
            &mut out,
        )
        .with_options(quiet())
        .run();
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!(parse_selection("2", 3), Ok(Selection::Index(2)));
        assert_eq!(parse_selection(" 3 ", 3), Ok(Selection::Index(3)));
        assert_eq!(parse_selection("0", 3), Ok(Selection::Back));
        assert_eq!(parse_selection("", 3), Ok(Selection::Back));
        assert_eq!(parse_selection("Back", 3), Ok(Selection::Back));
        assert_eq!(parse_selection("q", 3), Ok(Selection::Quit));
        assert_eq!(parse_selection("4", 3), Err(Rejection::OutOfRange));
        assert_eq!(
            parse_selection("99999999999999999999999", 3),
            Err(Rejection::OutOfRange)
        );
        assert_eq!(parse_selection("+2", 3), Err(Rejection::NotANumber));
        assert_eq!(parse_selection("two", 3), Err(Rejection::NotANumber));
        assert_eq!(parse_selection("-1", 3), Err(Rejection::NotANumber));
    }

    #[test]
    fn test_descend_then_back_restores_root() {
        let source = source();
        let builder = MenuBuilder::new(&source);
        let root_listing = builder.build(Path::new("/menu")).unwrap();
        let mut launcher = FakeLauncher::default();
        let mut out = Vec::new();
        let mut nav = Navigator::new(
            builder,
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new("2\n0\n"), io::sink()),
            &mut launcher,
            &mut out,
        )
        .with_options(quiet());

        // Listing is Greet, net, Update
        nav.step().unwrap();
        assert_eq!(nav.current_dir(), Some(Path::new("/menu/net")));
        assert_eq!(nav.stack(), [PathBuf::from("/menu")]);

        nav.step().unwrap();
        assert_eq!(nav.current_dir(), Some(Path::new("/menu")));
        assert!(nav.stack().is_empty());

        // Input is exhausted: the root is rendered once more, then the navigator quits
        nav.step().unwrap();
        assert_eq!(nav.state(), &State::Exited);
        drop(nav);

        let rendered = String::from_utf8(out).unwrap();
        let root_menu = render::menu(Palette::plain(), &root_listing, true);
        assert_eq!(rendered.matches(&root_menu).count(), 2);
        assert!(rendered.contains("[0]  Back"));
    }

    #[test]
    fn test_back_at_root_quits() {
        let mut launcher = FakeLauncher::default();
        let (out, result) = run_script(&source(), "0\n", &mut launcher);
        result.unwrap();
        assert!(out.ends_with("Goodbye.\n"));
        assert!(launcher.launches.is_empty());
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let mut launcher = FakeLauncher::default();
        let (out, result) = run_script(&source(), "abc\n9\nq\n", &mut launcher);
        result.unwrap();
        assert!(out.contains("* Please enter a number"));
        assert!(out.contains("* Invalid choice"));
        // Rejections re-prompt without re-rendering the menu
        assert_eq!(out.matches("[0]  Exit").count(), 1);
    }

    #[test]
    fn test_undecodable_input_reprompts() {
        let source = source();
        let mut out = Vec::new();
        Navigator::new(
            MenuBuilder::new(&source),
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new(vec![0xff, b'\n', b'q', b'\n']), io::sink()),
            FakeLauncher::default(),
            &mut out,
        )
        .with_options(quiet())
        .run()
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("* Please enter a number"));
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_huge_number_is_an_invalid_choice() {
        let mut launcher = FakeLauncher::default();
        let (out, result) =
            run_script(&source(), "99999999999999999999999\nq\n", &mut launcher);
        result.unwrap();
        assert!(out.contains("* Invalid choice"));
        assert!(!out.contains("Please enter a number"));
    }

    #[test]
    fn test_arguments_use_defaults_for_empty_input() {
        let mut launcher = FakeLauncher::default();
        let (_, result) = run_script(&source(), "1\n\nhowdy\nq\n", &mut launcher);
        result.unwrap();
        assert_eq!(
            launcher.launches,
            vec![(
                PathBuf::from("/menu/greet.sh"),
                vec!["default-x".to_string(), "howdy".to_string()],
                false
            )]
        );
    }

    #[test]
    fn test_typed_argument_is_kept_verbatim() {
        let mut launcher = FakeLauncher::default();
        let (_, result) = run_script(&source(), "1\n  Ada Lovelace \n\nq\n", &mut launcher);
        result.unwrap();
        assert_eq!(launcher.launches[0].1, vec!["  Ada Lovelace ", "hello"]);
    }

    #[test]
    fn test_prompting_collects_one_value_per_step() {
        let source = source();
        let mut launcher = FakeLauncher::default();
        let mut nav = Navigator::new(
            MenuBuilder::new(&source),
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new("1\nbob\n\n"), io::sink()),
            &mut launcher,
            io::sink(),
        )
        .with_options(quiet());

        nav.step().unwrap();
        assert!(matches!(nav.state(), State::Prompting { collected, .. } if collected.is_empty()));
        nav.step().unwrap();
        assert!(matches!(nav.state(), State::Prompting { collected, .. } if collected == &["bob"]));
        nav.step().unwrap();
        assert!(
            matches!(nav.state(), State::Executing { args, sudo: false, .. } if args == &["bob", "hello"])
        );
        nav.step().unwrap();
        assert_eq!(nav.state(), &State::Browsing { dir: PathBuf::from("/menu") });
    }

    #[test]
    fn test_cancel_while_prompting_returns_to_menu() {
        let mut launcher = FakeLauncher::default();
        let (out, result) = run_script(&source(), "1\n\x1b\nq\n", &mut launcher);
        result.unwrap();
        assert!(out.contains("* Cancelled"));
        assert!(launcher.launches.is_empty());
        assert_eq!(out.matches("[0]  Exit").count(), 2);
    }

    #[test]
    fn test_sudo_directive_requests_elevation() {
        let mut launcher = FakeLauncher::default();
        let (_, result) = run_script(&source(), "3\nq\n", &mut launcher);
        result.unwrap();
        assert_eq!(
            launcher.launches,
            vec![(PathBuf::from("/menu/update.sh"), vec![], true)]
        );
    }

    #[test]
    fn test_failing_action_returns_to_same_menu() {
        let mut launcher = FakeLauncher {
            results: vec![Ok(Exit::Code(2))],
            ..FakeLauncher::default()
        };
        let (out, result) = run_script(&source(), "2\n1\nq\n", &mut launcher);
        result.unwrap();
        assert!(out.contains("Ping failed ✘ (exited with status 2)"));
        // The submenu is listed again after the failure
        assert_eq!(out.matches("[0]  Back").count(), 2);
    }

    #[test]
    fn test_elevation_failure_is_reported() {
        let mut launcher = FakeLauncher {
            results: vec![Err(LaunchError::Elevation(ElevationError::Declined {
                program: "sudo".to_string(),
                exit: Exit::Code(1),
            }))],
            ..FakeLauncher::default()
        };
        let (out, result) = run_script(&source(), "3\nq\n", &mut launcher);
        result.unwrap();
        assert!(out.contains("✘ elevation with `sudo` was declined (exited with status 1)"));
    }

    #[test]
    fn test_menu_is_rebuilt_after_execution() {
        let source = source();
        let mut launcher = FakeLauncher::default();
        let mut out = Vec::new();
        let mut nav = Navigator::new(
            MenuBuilder::new(&source),
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new("3\n"), io::sink()),
            &mut launcher,
            &mut out,
        )
        .with_options(quiet());

        nav.step().unwrap();
        // The action removes a submenu while it runs
        source.remove("/menu/net");
        nav.step().unwrap();
        nav.step().unwrap();
        drop(nav);

        let rendered = String::from_utf8(out).unwrap();
        let last_menu = rendered.rsplit("[0]  Exit").nth(1).unwrap();
        assert!(!last_menu.contains("net/"));
    }

    #[test]
    fn test_vanished_submenu_falls_back_to_parent() {
        let source = source();
        let mut launcher = FakeLauncher::default();
        let mut out = Vec::new();
        let mut nav = Navigator::new(
            MenuBuilder::new(&source),
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new("2\n"), io::sink()),
            &mut launcher,
            &mut out,
        )
        .with_options(quiet());

        nav.step().unwrap();
        source.remove("/menu/net");
        nav.step().unwrap();
        assert_eq!(nav.state(), &State::Browsing { dir: PathBuf::from("/menu") });
        assert!(nav.stack().is_empty());
        drop(nav);

        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("✘ Directory not found: /menu/net"));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let source = MemorySource::new("/other");
        let mut launcher = FakeLauncher::default();
        let mut nav = Navigator::new(
            MenuBuilder::new(&source),
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new(""), io::sink()),
            &mut launcher,
            io::sink(),
        );
        assert!(matches!(
            nav.run(),
            Err(NavigatorError::RootUnavailable(MenuError::NotFound(_)))
        ));
    }

    #[test]
    fn test_pause_waits_for_enter() {
        let source = source();
        let mut launcher = FakeLauncher::default();
        let mut shown = Vec::new();
        let mut nav = Navigator::new(
            MenuBuilder::new(&source),
            PathBuf::from("/menu"),
            LineInput::new(Cursor::new("3\n\nq\n"), &mut shown),
            &mut launcher,
            io::sink(),
        )
        .with_options(Options {
            banner: false,
            ..Options::default()
        });
        nav.run().unwrap();
        drop(nav);

        assert_eq!(launcher.launches.len(), 1);
        let shown = String::from_utf8(shown).unwrap();
        assert!(shown.contains("Press Enter to continue..."));
    }
}
