//! Command-line argument definitions for the GraphCanvas CLI.
//!
//! [`Args`] is parsed from the command line with [`clap`]. Arguments select
//! the input document, the output path, the configuration file, the layout
//! engine and the logging verbosity.

use clap::Parser;

/// Command-line arguments for the GraphCanvas tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph document
    #[arg(help = "Path to the input TOML graph document")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout engine (dot, neato, fdp, sfdp, circo, twopi, osage, patchwork)
    #[arg(short, long)]
    pub engine: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
