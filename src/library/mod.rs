//! Library pipelines: import into the catalog and bulk tag updates.
//!
//! Both walk a directory with [`scanner::audio_files`] and handle one file at
//! a time. A file that cannot be read or written is logged, recorded in the
//! summary and skipped; storage errors abort the pipeline.

pub mod convert;
pub mod update;

use serde::Serialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::db;
use crate::error::{Error, Result};
use crate::metadata::TagReader;
use crate::scanner;

pub use update::{UpdateSummary, update_files};

/// A file a pipeline gave up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

impl FileFailure {
    pub fn new(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self {
            path: path.into(),
            error: error.to_string(),
        }
    }
}

/// The catalog key for `path`.
///
/// Keys are stored as text and later reopened, so a path that is not valid
/// UTF-8 has no key.
pub(crate) fn catalog_key(path: &Path) -> std::result::Result<&str, FileFailure> {
    path.to_str()
        .ok_or_else(|| FileFailure::new(path, "path is not valid UTF-8"))
}

/// Outcome of [`import_library`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// New tracks inserted
    pub imported: usize,
    /// Files already in the catalog
    pub skipped: usize,
    /// Files whose tags could not be read
    pub failed: Vec<FileFailure>,
    /// Artists added by the rebuild at the end
    pub artists_added: usize,
}

/// Import every audio file under `root` that is not yet in the catalog.
///
/// With `clean`, all tracks and artists are deleted first. A file counts as
/// present when a row with its (absolute) path exists, so re-running over an
/// unchanged tree inserts nothing. The artist list is rebuilt once at the end.
pub async fn import_library<R: TagReader>(
    pool: &SqlitePool,
    reader: &R,
    root: &Path,
    clean: bool,
) -> Result<ImportSummary> {
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    if clean {
        db::clear_all(pool).await?;
    }

    let mut summary = ImportSummary::default();

    for path in scanner::audio_files(root) {
        let key = match catalog_key(&path) {
            Ok(key) => key,
            Err(failure) => {
                warn!(path = %path.display(), "Skipping path that is not valid UTF-8");
                summary.failed.push(failure);
                continue;
            }
        };

        if !db::get_tracks_by_path(pool, key).await?.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let raw = match reader.read_tags(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read tags");
                summary.failed.push(FileFailure::new(&path, e));
                continue;
            }
        };

        let track = convert::to_track(&raw);
        db::add_track(pool, &track).await?;
        debug!(path = %path.display(), title = %track.title, "Imported track");
        summary.imported += 1;
    }

    summary.artists_added = db::populate_artists_from_tracks(pool).await?;

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        failed = summary.failed.len(),
        artists_added = summary.artists_added,
        "Import complete"
    );

    Ok(summary)
}
