use std::path::Path;
use std::process::ExitCode;

use clap::Args;

use dirmenu::MenuBuilder;
use dirmenu::menu::MenuTree;
use dirmenu::render;
use dirmenu::source::DiskSource;
use dirmenu::theme::Palette;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the tree as JSON
    #[arg(long)]
    json: bool,
}

/// Print the menu tree below `root`.
///
/// # Errors
///
/// Returns an error if the root cannot be listed or JSON serialization fails.
pub fn run(
    args: &ListArgs,
    root: &Path,
    header_lines: usize,
    color: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let builder = MenuBuilder::new(DiskSource).with_header_lines(header_lines);
    let tree = MenuTree::scan(&builder, root)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", render::tree(Palette::new(color), &tree));
    }
    Ok(ExitCode::SUCCESS)
}
