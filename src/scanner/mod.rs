//! Recursive discovery of audio files.

use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the catalog imports, lowercase and without the dot.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a"];

/// Check if a path has a supported audio extension (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

/// Make `path` absolute and drop `.` and `..` components lexically.
///
/// Symlinks are not resolved, so `a/link/..` becomes `a` even if `link`
/// points elsewhere.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Walks `root` recursively and yields every supported audio file.
///
/// The root goes through [`normalize_path`] so yielded paths are stable
/// catalog keys regardless of the working directory or how the root was
/// spelled. Entries that cannot be read are logged and skipped.
pub fn audio_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    let root = normalize_path(root);

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_audio_file(path))
}
