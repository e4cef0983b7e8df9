// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The tool takes exactly two required options:
//   --source_folder <path>   the folder of HTML files to scan
//   --output_file <path>     where the CSV report is written
//
// clap gives us --help and --version for free.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "link-inspector",
    version = "0.1.0",
    about = "Scan a folder of HTML files for missing link targets and unclosed anchor tags",
    long_about = "link-inspector walks a folder of HTML files and writes a CSV report of every \
                  link whose target does not exist on disk and every <a> tag that is never closed."
)]
pub struct Cli {
    /// Root folder to scan (searched recursively for *.html files)
    ///
    /// The flag keeps its underscore spelling: --source_folder
    #[arg(long = "source_folder", value_name = "PATH")]
    pub source_folder: PathBuf,

    /// CSV file the findings are written to (created or truncated)
    #[arg(long = "output_file", value_name = "PATH")]
    pub output_file: PathBuf,
}
