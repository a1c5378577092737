//! Audio file tag reading and writing.
//!
//! The pipelines only see the [`TagReader`] and [`TagWriter`] capabilities;
//! [`LoftyTags`] implements both with the lofty crate, which handles MP3
//! (ID3v2) and M4A (MP4 ilst) among others. Tests substitute an in-memory
//! implementation.

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, ItemValue, Tag, TagExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Tag fields as read from a file, before any catalog policy is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track_number: Option<u32>,
    pub genre: String,
    pub year: Option<u32>,
    /// Duration in seconds
    pub duration: u64,
    pub path: PathBuf,
    /// Text items with keys lofty does not map to a standard field, by raw key
    pub additional: HashMap<String, String>,
}

/// Album/artist change applied by `update-files`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEdit {
    pub album: Option<String>,
    pub artist: Option<String>,
}

impl TagEdit {
    /// Build an edit, treating empty strings as "leave unchanged".
    pub fn new(album: Option<String>, artist: Option<String>) -> Self {
        Self {
            album: album.filter(|s| !s.is_empty()),
            artist: artist.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.album.is_none() && self.artist.is_none()
    }
}

/// Reads tags from an audio file.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags>;
}

/// Persists tag edits back into an audio file.
pub trait TagWriter {
    fn write_tags(&self, path: &Path, edit: &TagEdit) -> Result<()>;
}

/// lofty-backed tag access.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTags;

impl TagReader for LoftyTags {
    fn read_tags(&self, path: &Path) -> Result<RawTags> {
        read(path)
    }
}

impl TagWriter for LoftyTags {
    fn write_tags(&self, path: &Path, edit: &TagEdit) -> Result<()> {
        write(path, edit)
    }
}

/// Read the tags and duration of an audio file.
pub fn read(path: &Path) -> Result<RawTags> {
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("failed to open file: {e}")))?
        .read()
        .map_err(|e| Error::metadata(path, format!("failed to read tags: {e}")))?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    // Missing text fields read as empty strings
    let title = tag
        .and_then(|t| t.title().map(|s| s.to_string()))
        .unwrap_or_default();
    let artist = tag
        .and_then(|t| t.artist().map(|s| s.to_string()))
        .unwrap_or_default();
    let album = tag
        .and_then(|t| t.album().map(|s| s.to_string()))
        .unwrap_or_default();
    let genre = tag
        .and_then(|t| t.genre().map(|s| s.to_string()))
        .unwrap_or_default();

    // Non-standard items from every tag; the first occurrence of a key wins
    let mut additional = HashMap::new();
    for t in tagged_file.tags() {
        for item in t.items() {
            if let (ItemKey::Unknown(key), ItemValue::Text(value)) = (item.key(), item.value()) {
                additional
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }
    }

    Ok(RawTags {
        title,
        artist,
        album,
        track_number: tag.and_then(|t| t.track()),
        genre,
        year: tag.and_then(|t| t.year()),
        duration: tagged_file.properties().duration().as_secs(),
        path: path.to_path_buf(),
        additional,
    })
}

/// Apply an album/artist edit to a file's primary tag and save it in place.
///
/// A primary tag is created when the file has none.
pub fn write(path: &Path, edit: &TagEdit) -> Result<()> {
    let mut tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("failed to open file: {e}")))?
        .read()
        .map_err(|e| Error::metadata(path, format!("failed to read tags: {e}")))?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let Some(tag) = tagged_file.tag_mut(tag_type) else {
        return Err(Error::metadata(path, "no writable tag"));
    };

    if let Some(album) = &edit.album {
        tag.set_album(album.clone());
    }
    if let Some(artist) = &edit.artist {
        tag.set_artist(artist.clone());
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::metadata(path, format!("failed to write tags: {e}")))
}
