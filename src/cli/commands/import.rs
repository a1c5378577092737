//! Library import command.

use tokio::runtime::Runtime;

use super::{require_directory, with_store};
use crate::config::Config;
use crate::library;
use crate::metadata::LoftyTags;

/// Import the configured library into the catalog
pub fn cmd_import(rt: &Runtime, config: &Config, clean: bool) -> anyhow::Result<()> {
    let root = config.library_directory();
    if !require_directory(root) {
        return Ok(());
    }

    with_store(rt, config, async |pool| {
        if clean {
            println!("Clearing database");
        }
        println!("Importing library: {}", root.display());

        let summary = library::import_library(pool, &LoftyTags, root, clean).await?;

        for failure in &summary.failed {
            eprintln!("ERROR reading {}: {}", failure.path.display(), failure.error);
        }
        println!(
            "\nImported {} tracks ({} already catalogued, {} errors), {} new artists",
            summary.imported,
            summary.skipped,
            summary.failed.len(),
            summary.artists_added
        );
        Ok(())
    })
}
