use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use dirmenu::input::{Input, LineInput, TerminalInput};
use dirmenu::launcher::{Elevation, SystemLauncher};
use dirmenu::source::DiskSource;
use dirmenu::theme::Palette;
use dirmenu::{MenuBuilder, Navigator, Options};

#[derive(Args, Debug)]
pub struct MenuArgs {
    /// Don't print the banner above the top-level menu
    #[arg(long)]
    no_banner: bool,

    /// Return to the menu immediately after an action finishes
    #[arg(long)]
    no_pause: bool,

    /// Program used to run `SUDO` actions with elevated privileges
    #[arg(long, default_value = "sudo")]
    sudo_command: String,
}

/// Run the interactive menu.
///
/// # Errors
///
/// Returns an error if the root menu becomes unavailable or the terminal fails.
pub fn run(
    args: &MenuArgs,
    root: PathBuf,
    header_lines: usize,
    color: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let options = Options {
        pause_after_run: !args.no_pause,
        banner: !args.no_banner,
        color,
    };
    let palette = Palette::new(color);
    let input: Box<dyn Input> = if io::stdin().is_terminal() {
        Box::new(TerminalInput::new(palette))
    } else {
        Box::new(LineInput::new(io::stdin().lock(), io::stdout()).with_palette(palette))
    };
    let launcher = SystemLauncher::new(Elevation::with_program(&args.sudo_command));
    let builder = MenuBuilder::new(DiskSource).with_header_lines(header_lines);

    Navigator::new(builder, root, input, launcher, io::stdout())
        .with_options(options)
        .run()?;
    Ok(ExitCode::SUCCESS)
}
