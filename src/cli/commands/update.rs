//! Bulk tag update command.

use std::path::Path;
use tokio::runtime::Runtime;

use super::{require_directory, with_store};
use crate::config::Config;
use crate::library;
use crate::metadata::{LoftyTags, TagEdit};

/// Set album and/or artist on every audio file under a directory
pub fn cmd_update_files(
    rt: &Runtime,
    config: &Config,
    directory: &Path,
    album: Option<String>,
    artist: Option<String>,
) -> anyhow::Result<()> {
    if !require_directory(directory) {
        return Ok(());
    }

    let edit = TagEdit::new(album, artist);
    if edit.is_empty() {
        println!("Nothing to update: pass --album and/or --artist");
    }

    with_store(rt, config, async |pool| {
        println!("Updating files in: {}", directory.display());

        let summary = library::update_files(pool, &LoftyTags, directory, &edit).await?;

        for failure in &summary.failed {
            eprintln!("ERROR updating {}: {}", failure.path.display(), failure.error);
        }
        println!(
            "\nUpdated {} files ({} catalog rows), {} errors",
            summary.files_written,
            summary.rows_updated,
            summary.failed.len()
        );
        Ok(())
    })
}
