//! Command-line interface for music-catalog.
//!
//! This module provides the commands for importing, listing, retagging and
//! reorganizing the catalog.

mod commands;

pub use commands::{Cli, Commands, run_command};
