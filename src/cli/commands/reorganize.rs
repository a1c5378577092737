//! Library reorganization command.

use anyhow::Context;
use std::path::Path;
use tokio::runtime::Runtime;

use super::{require_directory, with_store};
use crate::config::Config;
use crate::organizer::{self, ReorganizeOptions};

/// Copy every catalogued track into `<directory>/<Album>/<NN> - <Title>.<ext>`
pub fn cmd_reorganize(
    rt: &Runtime,
    config: &Config,
    directory: &Path,
    dry_run: bool,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    if !require_directory(directory) {
        return Ok(());
    }

    let report = with_store(rt, config, async |pool| {
        println!("Reorganizing into: {}", directory.display());
        if dry_run {
            println!("\n[DRY RUN MODE - No files will be copied]\n");
        }

        let report = organizer::reorganize(pool, directory, ReorganizeOptions { dry_run }).await?;
        Ok(report)
    })?;

    for copy in &report.copied {
        if dry_run {
            println!("WOULD COPY: {} -> {}", copy.source.display(), copy.destination.display());
        }
    }
    for duplicate in &report.duplicates {
        println!("  !DUPLICATE: {}", duplicate.destination.display());
        for candidate in &duplicate.candidates {
            println!("    * {}", candidate.display());
        }
    }
    for failure in &report.failed {
        eprintln!("ERROR copying {}: {}", failure.path.display(), failure.error);
    }

    println!(
        "\nCompleted: {} copied, {} duplicates, {} errors",
        report.copied.len(),
        report.duplicates.len(),
        report.failed.len()
    );

    if let Some(path) = report_path {
        report
            .save_json(path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
