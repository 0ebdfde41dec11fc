//! Command-line interface

pub mod commands;
pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Geocode a spreadsheet of postal addresses
#[derive(Parser)]
#[command(name = "geocoder-cli", version)]
#[command(about = "Add latitude/longitude columns to an Excel file of addresses", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session: authenticate, load files, geocode, download (default)
    Session(SessionArgs),
    /// Geocode a single file and write the result
    Geocode(GeocodeArgs),
}

#[derive(Args)]
pub struct SessionArgs {
    /// Directory downloads are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Default for SessionArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Args)]
pub struct GeocodeArgs {
    /// Excel file with columns address1, city, sta, zip
    pub input: PathBuf,

    /// Directory the geocoded file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Access secret (prompted for when omitted)
    #[arg(long)]
    pub secret: Option<String>,

    /// Skip the data preview and result table
    #[arg(short, long)]
    pub quiet: bool,
}
