//! Copying the catalog into an album-based directory layout.
//!
//! Every stored track is copied to
//! `<root>/<Album>/<TrackNum> - <Title>.<ext>`. Source files are never moved
//! or modified, and existing destination files are never overwritten: a
//! taken destination is reported as a [`Duplicate`] for manual resolution.

use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::db;
use crate::error::{Error, Result, ResultExt};
use crate::library::FileFailure;
use crate::model::Track;

/// Characters no mainstream filesystem accepts in a file name.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replacement for each invalid character.
const REPLACEMENT: char = '-';

/// Options for [`reorganize`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorganizeOptions {
    /// Compute and report destinations without touching the filesystem
    pub dry_run: bool,
}

/// A file copied (or, in dry-run, to be copied).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A track whose destination was already taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub destination: PathBuf,
    /// The track that was not copied
    pub source: PathBuf,
    /// Every stored track with the same album and title
    pub candidates: Vec<PathBuf>,
}

/// Outcome of [`reorganize`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReorganizeReport {
    pub dry_run: bool,
    pub copied: Vec<CopiedFile>,
    pub duplicates: Vec<Duplicate>,
    pub failed: Vec<FileFailure>,
}

impl ReorganizeReport {
    /// Write the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        fs::write(path, json).with_context(format!("writing report {}", path.display()))
    }
}

/// Sanitizes a file name by replacing invalid characters with `-`.
///
/// Covers `< > : " / \ | ? *` and control characters. A name made only of
/// dots gets those replaced too, so it can never address the current or
/// parent directory.
pub fn sanitize_filename(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c == '.') {
        return name.chars().map(|_| REPLACEMENT).collect();
    }

    name.chars()
        .map(|c| {
            if c < ' ' || INVALID_CHARS.contains(&c) {
                REPLACEMENT
            } else {
                c
            }
        })
        .collect()
}

/// Where `track` belongs under `root`.
///
/// `<root>/<trimmed album>/<NN> - <title><.ext>`, each component sanitized.
/// The extension is the source file's, empty if it has none.
pub fn destination_for(track: &Track, root: &Path) -> PathBuf {
    let album = sanitize_filename(track.album.trim());
    let name = sanitize_filename(&format!("{:02} - {}", track.track_number, track.title));
    let ext = Path::new(&track.path)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    root.join(album).join(format!("{name}{ext}"))
}

/// Copy every catalogued track into the album layout under `output_root`.
///
/// The output root must already exist; album directories are created as
/// needed. Filesystem errors on one track are recorded and the run goes on.
pub async fn reorganize(
    pool: &SqlitePool,
    output_root: &Path,
    options: ReorganizeOptions,
) -> Result<ReorganizeReport> {
    if !output_root.is_dir() {
        return Err(Error::not_found(output_root));
    }

    let mut report = ReorganizeReport {
        dry_run: options.dry_run,
        ..Default::default()
    };
    // Destinations claimed during this run; dry-run never creates them on disk
    let mut planned: HashSet<PathBuf> = HashSet::new();

    for track in db::get_tracks(pool).await? {
        let source = PathBuf::from(&track.path);
        let destination = destination_for(&track, output_root);

        if planned.contains(&destination) || destination.exists() {
            let candidates = db::get_tracks_by_album(pool, &track.album)
                .await?
                .into_iter()
                .filter(|t| t.title == track.title)
                .map(|t| PathBuf::from(t.path))
                .collect();
            warn!(destination = %destination.display(), source = %source.display(), "Duplicate destination");
            report.duplicates.push(Duplicate {
                destination,
                source,
                candidates,
            });
            continue;
        }

        if !options.dry_run {
            if let Err(e) = copy_track(&source, &destination) {
                warn!(source = %source.display(), error = %e, "Failed to copy track");
                report.failed.push(FileFailure::new(&source, e));
                continue;
            }
            debug!(source = %source.display(), destination = %destination.display(), "Copied track");
        }

        planned.insert(destination.clone());
        report.copied.push(CopiedFile {
            source,
            destination,
        });
    }

    info!(
        copied = report.copied.len(),
        duplicates = report.duplicates.len(),
        failed = report.failed.len(),
        dry_run = options.dry_run,
        "Reorganize complete"
    );

    Ok(report)
}

fn copy_track(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(format!("creating directory {}", parent.display()))?;
    }
    fs::copy(source, destination).with_context(format!(
        "copying {} to {}",
        source.display(),
        destination.display()
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_track, temp_db, touch};
    use tempfile::tempdir;

    fn track(title: &str, album: &str, number: i64, path: &Path) -> Track {
        Track {
            title: title.to_string(),
            album: album.to_string(),
            track_number: number,
            path: path.to_string_lossy().into_owned(),
            ..mock_track()
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("AC/DC"), "AC-DC");
        assert_eq!(sanitize_filename("Track: Title"), "Track- Title");
        assert_eq!(sanitize_filename("Valid Name"), "Valid Name");
        assert_eq!(sanitize_filename("Artist?"), "Artist-");
        assert_eq!(sanitize_filename("a<b>c"), "a-b-c");
        assert_eq!(sanitize_filename("tab\there"), "tab-here");
        assert_eq!(sanitize_filename(".."), "--");
        assert_eq!(sanitize_filename("..a"), "..a");
    }

    #[test]
    fn test_destination_for() {
        let t = track("Song Title", "Test Album", 5, Path::new("/src/song.mp3"));
        assert_eq!(
            destination_for(&t, Path::new("/music")),
            PathBuf::from("/music/Test Album/05 - Song Title.mp3")
        );
    }

    #[test]
    fn test_destination_sanitizes_and_trims_album() {
        let t = track("What?", "  Back: In Black ", 12, Path::new("/src/x.M4A"));
        assert_eq!(
            destination_for(&t, Path::new("/out")),
            PathBuf::from("/out/Back- In Black/12 - What-.M4A")
        );
    }

    #[test]
    fn test_destination_without_extension() {
        let t = track("Raw", "Album", 0, Path::new("/src/raw"));
        assert_eq!(
            destination_for(&t, Path::new("/out")),
            PathBuf::from("/out/Album/00 - Raw")
        );
    }

    #[tokio::test]
    async fn test_reorganize_copies_files() {
        let (pool, _dir) = temp_db().await;
        let lib = tempdir().unwrap();
        let out = tempdir().unwrap();
        let source = touch(lib.path(), "in/song.mp3");
        db::add_track(&pool, &track("Song", "Album: One", 2, &source))
            .await
            .unwrap();

        let report = reorganize(&pool, out.path(), ReorganizeOptions::default())
            .await
            .unwrap();

        let expected = out.path().join("Album- One").join("02 - Song.mp3");
        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.copied[0].destination, expected);
        assert!(expected.exists());
        assert!(source.exists(), "source must be left in place");
        assert_eq!(
            fs::read_to_string(&expected).unwrap(),
            fs::read_to_string(&source).unwrap()
        );
    }

    #[tokio::test]
    async fn test_reorganize_reports_collision() {
        let (pool, _dir) = temp_db().await;
        let lib = tempdir().unwrap();
        let out = tempdir().unwrap();
        let first = touch(lib.path(), "first.mp3");
        let second = touch(lib.path(), "second.mp3");
        db::add_track(&pool, &track("Y", "X", 1, &first)).await.unwrap();
        db::add_track(&pool, &track("Y", "X", 1, &second)).await.unwrap();

        let report = reorganize(&pool, out.path(), ReorganizeOptions::default())
            .await
            .unwrap();

        let destination = out.path().join("X").join("01 - Y.mp3");
        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(fs::read_dir(out.path().join("X")).unwrap().count(), 1);
        assert_eq!(
            fs::read_to_string(&destination).unwrap(),
            fs::read_to_string(&first).unwrap()
        );

        let duplicate = &report.duplicates[0];
        assert_eq!(duplicate.destination, destination);
        assert_eq!(duplicate.source, second);
        assert_eq!(duplicate.candidates, vec![first, second]);
    }

    #[tokio::test]
    async fn test_reorganize_never_overwrites_existing_file() {
        let (pool, _dir) = temp_db().await;
        let lib = tempdir().unwrap();
        let out = tempdir().unwrap();
        let source = touch(lib.path(), "song.mp3");
        db::add_track(&pool, &track("Song", "Album", 1, &source))
            .await
            .unwrap();
        let existing = touch(out.path(), "Album/01 - Song.mp3");
        fs::write(&existing, "keep me").unwrap();

        let report = reorganize(&pool, out.path(), ReorganizeOptions::default())
            .await
            .unwrap();

        assert!(report.copied.is_empty());
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing_but_detects_collisions() {
        let (pool, _dir) = temp_db().await;
        let lib = tempdir().unwrap();
        let out = tempdir().unwrap();
        let first = touch(lib.path(), "first.mp3");
        let second = touch(lib.path(), "second.mp3");
        db::add_track(&pool, &track("Y", "X", 1, &first)).await.unwrap();
        db::add_track(&pool, &track("Y", "X", 1, &second)).await.unwrap();

        let report = reorganize(&pool, out.path(), ReorganizeOptions { dry_run: true })
            .await
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.duplicates.len(), 1);
        assert!(!out.path().join("X").exists());
    }

    #[tokio::test]
    async fn test_missing_source_is_recorded() {
        let (pool, _dir) = temp_db().await;
        let lib = tempdir().unwrap();
        let out = tempdir().unwrap();
        let present = touch(lib.path(), "present.mp3");
        db::add_track(&pool, &track("Gone", "Album", 1, &lib.path().join("gone.mp3")))
            .await
            .unwrap();
        db::add_track(&pool, &track("Here", "Album", 2, &present))
            .await
            .unwrap();

        let report = reorganize(&pool, out.path(), ReorganizeOptions::default())
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].path.ends_with("gone.mp3"));
        assert_eq!(report.copied.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_output_root_is_not_found() {
        let (pool, _dir) = temp_db().await;
        let out = tempdir().unwrap();

        let result = reorganize(&pool, &out.path().join("nope"), ReorganizeOptions::default()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_report_save_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = ReorganizeReport {
            duplicates: vec![Duplicate {
                destination: PathBuf::from("/out/X/01 - Y.mp3"),
                source: PathBuf::from("/in/b.mp3"),
                candidates: vec![PathBuf::from("/in/a.mp3"), PathBuf::from("/in/b.mp3")],
            }],
            ..Default::default()
        };

        report.save_json(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["duplicates"][0]["candidates"][1], "/in/b.mp3");
        assert_eq!(json["dry_run"], false);
    }
}
