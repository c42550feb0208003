mod list;
mod menu;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use dirmenu::menu::DEFAULT_HEADER_LINES;
use dirmenu::resolve_root;

#[derive(Parser, Debug)]
#[command(name = "dirmenu", about = "A terminal menu built from a directory of scripts")]
struct Cli {
    /// Menu directory (defaults to `menu` next to the executable, then `./menu`)
    #[arg(env = "DIRMENU_ROOT")]
    path: Option<PathBuf>,

    /// Log file path (logging is disabled without one)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Number of lines scanned for directives at the top of each script
    #[arg(long, default_value_t = DEFAULT_HEADER_LINES)]
    header_lines: usize,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    menu: menu::MenuArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the whole menu tree without running anything
    List(list::ListArgs),
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    dirmenu::logger::init(log_file);

    let root = resolve_root(cli.path.as_deref())?;
    let color = !cli.no_color && dirmenu::config::color_supported();
    let header_lines = cli.header_lines.max(1);

    match cli.command {
        Some(Commands::List(ref args)) => list::run(args, &root, header_lines, color),
        None => menu::run(&cli.menu, root, header_lines, color),
    }
}
