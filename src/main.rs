//! Music Catalog - a music library cataloguing tool.
//!
//! Imports a directory tree of audio files into a SQLite catalog, lists
//! albums, artists, genres and tracks, bulk-edits album/artist tags and
//! copies the library into an album-based folder layout.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
pub mod organizer;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Logs go to stderr so listings on stdout stay clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("music_catalog=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli::run_command(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
