//! Test utilities and fixtures for music-catalog tests.
//!
//! Provides a throwaway database, track fixtures and [`FakeTags`], an
//! in-memory tag store standing in for lofty so pipelines can be tested with
//! empty placeholder files.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{temp_db, mock_track};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     db::add_track(&pool, &mock_track()).await.unwrap();
//! }
//! ```

use sqlx::sqlite::SqlitePool;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::metadata::{RawTags, TagEdit, TagReader, TagWriter};
use crate::model::Track;

/// Creates a temporary database for testing.
///
/// The database lives in a temporary directory that is removed when the
/// returned `TempDir` is dropped, so keep it alive for the whole test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let pool = crate::db::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// Creates a mock Track with sensible defaults.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let custom = Track {
///     title: "Custom Title".to_string(),
///     ..mock_track()
/// };
/// ```
pub fn mock_track() -> Track {
    Track {
        title: "Test Track".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        track_number: 1,
        genre: "Rock".to_string(),
        year: 2020,
        duration: 180,
        path: "/test/music/track.mp3".to_string(),
    }
}

/// Raw tags for a file with the given text fields.
pub fn raw_tags(path: &Path, title: &str, artist: &str, album: &str) -> RawTags {
    RawTags {
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        track_number: Some(1),
        genre: "Rock".to_string(),
        year: Some(2020),
        duration: 180,
        path: path.to_path_buf(),
        additional: HashMap::new(),
    }
}

/// Create a placeholder file (and its parent directories) under `dir`.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, format!("fake audio: {name}")).expect("Failed to write file");
    path
}

/// In-memory tag store.
///
/// Reading or writing a path that was never inserted fails like an
/// unreadable file would.
#[derive(Debug, Default)]
pub struct FakeTags {
    files: RefCell<HashMap<PathBuf, RawTags>>,
    writes: RefCell<Vec<(PathBuf, TagEdit)>>,
}

impl FakeTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register tags for `raw.path`.
    pub fn insert(&self, raw: RawTags) {
        self.files.borrow_mut().insert(raw.path.clone(), raw);
    }

    /// Current tags of a file.
    pub fn get(&self, path: &Path) -> Option<RawTags> {
        self.files.borrow().get(path).cloned()
    }

    /// Every successful write, in order.
    pub fn writes(&self) -> Vec<(PathBuf, TagEdit)> {
        self.writes.borrow().clone()
    }
}

impl TagReader for FakeTags {
    fn read_tags(&self, path: &Path) -> Result<RawTags> {
        self.get(path)
            .ok_or_else(|| Error::metadata(path, "no tags registered"))
    }
}

impl TagWriter for FakeTags {
    fn write_tags(&self, path: &Path, edit: &TagEdit) -> Result<()> {
        let mut files = self.files.borrow_mut();
        let raw = files
            .get_mut(path)
            .ok_or_else(|| Error::metadata(path, "no tags registered"))?;

        if let Some(album) = &edit.album {
            raw.album = album.clone();
        }
        if let Some(artist) = &edit.artist {
            raw.artist = artist.clone();
        }
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), edit.clone()));
        Ok(())
    }
}
