//! Bulk album/artist edits written to files and mirrored into the catalog.

use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{FileFailure, catalog_key};
use crate::db;
use crate::error::{Error, Result};
use crate::metadata::{TagEdit, TagWriter};
use crate::scanner;

/// Outcome of [`update_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Files whose tags were rewritten
    pub files_written: usize,
    /// Catalog rows changed by the mirrored updates
    pub rows_updated: u64,
    /// Files left alone because the edit was empty
    pub unchanged: usize,
    /// Files whose tags could not be written
    pub failed: Vec<FileFailure>,
}

/// Apply `edit` to every audio file under `directory`.
///
/// Each file's tags are saved in place first; only then is the catalog row
/// with the same path updated. Files not in the catalog are still rewritten.
/// An empty edit walks the tree but writes nothing.
pub async fn update_files<W: TagWriter>(
    pool: &SqlitePool,
    writer: &W,
    directory: &Path,
    edit: &TagEdit,
) -> Result<UpdateSummary> {
    if !directory.is_dir() {
        return Err(Error::not_found(directory));
    }

    let mut summary = UpdateSummary::default();

    for path in scanner::audio_files(directory) {
        if edit.is_empty() {
            summary.unchanged += 1;
            continue;
        }

        let key = match catalog_key(&path) {
            Ok(key) => key,
            Err(failure) => {
                warn!(path = %path.display(), "Skipping path that is not valid UTF-8");
                summary.failed.push(failure);
                continue;
            }
        };

        if let Err(e) = writer.write_tags(&path, edit) {
            warn!(path = %path.display(), error = %e, "Failed to write tags");
            summary.failed.push(FileFailure::new(&path, e));
            continue;
        }
        summary.files_written += 1;

        if let Some(album) = &edit.album {
            summary.rows_updated += db::update_track_album(pool, key, album).await?;
        }
        if let Some(artist) = &edit.artist {
            summary.rows_updated += db::update_track_artist(pool, key, artist).await?;
        }
        debug!(path = %path.display(), "Updated tags");
    }

    info!(
        written = summary.files_written,
        rows = summary.rows_updated,
        failed = summary.failed.len(),
        "Update complete"
    );

    Ok(summary)
}
