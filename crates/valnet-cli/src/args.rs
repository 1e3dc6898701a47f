//! Command-line argument definitions for the Valnet CLI.
//!
//! Arguments select the export to read, the part of it to draw, where the
//! SVG goes and which configuration file to use. Layout settings given
//! here override the configuration file.

use clap::Parser;

/// Command-line arguments for the Valnet process graph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the value network JSON export
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Part of the network to draw: all, project:<id>, agent:<id> or order:<id>
    #[arg(short, long, default_value = "all")]
    pub scope: String,

    /// Axes the force layout may move nodes on (none, x, y, both)
    #[arg(long)]
    pub axes: Option<String>,

    /// Number of force layout iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
