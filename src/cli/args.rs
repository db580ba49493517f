//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::net::IpAddr;
use std::path::PathBuf;

/// Serve a directory of notes as rendered HTML with live refresh
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Directory containing the notes
    #[arg(short = 'd', long, default_value = "~/notes", value_hint = clap::ValueHint::DirPath)]
    pub notes_dir: PathBuf,

    /// Extra converter flags, space separated (overrides the settings file)
    #[arg(
        short = 'f',
        long,
        env = "NOTESERVE_FLAGS",
        value_delimiter = ' ',
        allow_hyphen_values = true,
        action = clap::ArgAction::Append
    )]
    pub converter_flags: Option<Vec<String>>,

    /// Stylesheet injected into every rendered note
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub css: Option<PathBuf>,

    /// Settings file (default: noteserve.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub settings: Option<PathBuf>,

    /// Interval between freshness polls in the browser, in milliseconds
    #[arg(short = 'r', long, default_value_t = 500)]
    pub refresh_interval: u64,

    /// Document extensions to serve
    #[arg(short = 'e', long = "ext", value_delimiter = ',', default_values = ["md", "markdown", "txt"])]
    pub extensions: Vec<String>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long, default_value = "127.0.0.1")]
    pub interface: IpAddr,

    /// Port number to listen on
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Disable the file watcher (only mtime checks keep the cache fresh)
    #[arg(long)]
    pub no_watch: bool,

    /// Print debug logs
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
