//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `import`: Library import into the catalog
//! - `list`: Album, artist, genre and track listings
//! - `update`: Bulk album/artist tag edits
//! - `reorganize`: Copying tracks into an album layout

mod import;
mod list;
mod reorganize;
mod update;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tokio::runtime::{Builder, Runtime};

use crate::config::{self, Config};
use crate::db;

pub use import::cmd_import;
pub use list::{cmd_list_albums, cmd_list_artists, cmd_list_genres, cmd_list_tracks};
pub use reorganize::cmd_reorganize;
pub use update::cmd_update_files;

/// Music Catalog CLI
#[derive(Parser)]
#[command(author, version, about = "Catalog, query, retag and reorganize a music library", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ./config.toml, then the user config directory)
    #[arg(long, global = true, env = "MUSIC_CATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Import the configured music library
    Import {
        /// Remove all catalog data before importing
        #[arg(long)]
        clean: bool,
    },
    /// List albums in the collection
    ListAlbums,
    /// List artists in the collection
    ListArtists,
    /// List genres in the collection
    ListGenres,
    /// List tracks in the collection
    ListTracks {
        /// Exact album name; also sorts by track number
        #[arg(long)]
        album: Option<String>,
        /// Genre (case-insensitive)
        #[arg(long)]
        genre: Option<String>,
        /// Artist substring (case-sensitive)
        #[arg(long)]
        artist: Option<String>,
        /// Title substring (case-insensitive)
        #[arg(long)]
        title: Option<String>,
    },
    /// Update the album and/or artist tags of files
    UpdateFiles {
        /// Directory of files to update
        #[arg(long)]
        directory: PathBuf,
        /// New album name
        #[arg(long)]
        album: Option<String>,
        /// New artist name
        #[arg(long)]
        artist: Option<String>,
    },
    /// Copy the library into Album/NN - Title folders
    Reorganize {
        /// Output root directory (must exist)
        #[arg(long)]
        directory: PathBuf,
        /// Show what would be copied without touching the filesystem
        #[arg(long)]
        dry_run: bool,
        /// Write a JSON report of copies, duplicates and failures
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Run the parsed CLI command.
///
/// Loads the configuration first: a missing or malformed config file is an
/// error for every command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let rt = Builder::new_current_thread().enable_all().build()?;

    match &cli.command {
        Commands::Import { clean } => cmd_import(&rt, &config, *clean),
        Commands::ListAlbums => cmd_list_albums(&rt, &config),
        Commands::ListArtists => cmd_list_artists(&rt, &config),
        Commands::ListGenres => cmd_list_genres(&rt, &config),
        Commands::ListTracks {
            album,
            genre,
            artist,
            title,
        } => cmd_list_tracks(
            &rt,
            &config,
            title.as_deref(),
            artist.as_deref(),
            album.as_deref(),
            genre.as_deref(),
        ),
        Commands::UpdateFiles {
            directory,
            album,
            artist,
        } => cmd_update_files(&rt, &config, directory, album.clone(), artist.clone()),
        Commands::Reorganize {
            directory,
            dry_run,
            report,
        } => cmd_reorganize(&rt, &config, directory, *dry_run, report.as_deref()),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Open the catalog named by the config.
pub(crate) async fn open_store(config: &Config) -> anyhow::Result<SqlitePool> {
    let url = db::db_url(config.storage_location());
    db::init_db(&url)
        .await
        .with_context(|| format!("Failed to open database {url}"))
}

/// Open the catalog, run `f` against it and close it again, whatever `f`
/// returns.
pub(crate) fn with_store<T, F>(rt: &Runtime, config: &Config, f: F) -> anyhow::Result<T>
where
    F: AsyncFnOnce(&SqlitePool) -> anyhow::Result<T>,
{
    rt.block_on(async {
        let pool = open_store(config).await?;
        let result = f(&pool).await;
        pool.close().await;
        result
    })
}

/// Report a missing directory argument.
///
/// Returns `false` (after printing to stderr) when `dir` is not a directory.
pub(crate) fn require_directory(dir: &Path) -> bool {
    if dir.is_dir() {
        return true;
    }
    eprintln!("Directory does not exist: {}", dir.display());
    false
}
