//! Conversion from raw file tags to catalog [`Track`] records.
//!
//! Older taggers stored some fields under ID3v2.2 frame names that modern
//! readers do not map (historically with a trailing NUL, e.g. `"TAL\0"`).
//! Those items show up in [`RawTags::additional`] and take precedence over
//! the standard fields. The mapping lives in [`LEGACY_KEYS`].

use crate::metadata::RawTags;
use crate::model::Track;

/// Standard field a legacy key overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Artist,
    Album,
    /// Applied only if the value parses as an integer
    TrackNumber,
    /// Applied only if the value parses as an integer
    Year,
}

/// Legacy key to standard field, applied in order.
pub const LEGACY_KEYS: &[(&str, Field)] = &[
    ("TAL", Field::Album),
    ("TP1", Field::Artist),
    ("TRK", Field::TrackNumber),
    ("TT2", Field::Title),
    ("TYE", Field::Year),
];

/// Look up a legacy key. The NUL-terminated spelling wins over the bare one.
fn legacy_value<'a>(raw: &'a RawTags, key: &str) -> Option<&'a str> {
    raw.additional
        .get(&format!("{key}\0"))
        .or_else(|| raw.additional.get(key))
        .map(String::as_str)
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Build a catalog track from raw tags.
///
/// - missing track number and year become 0
/// - legacy keys override the standard fields (see [`LEGACY_KEYS`])
/// - an empty album falls back to the title
/// - genre is kept exactly as tagged
pub fn to_track(raw: &RawTags) -> Track {
    let mut track = Track {
        title: raw.title.clone(),
        artist: raw.artist.clone(),
        album: raw.album.clone(),
        track_number: raw.track_number.map(i64::from).unwrap_or(0),
        genre: raw.genre.clone(),
        year: raw.year.map(i64::from).unwrap_or(0),
        duration: i64::try_from(raw.duration).unwrap_or(i64::MAX),
        path: raw.path.to_string_lossy().into_owned(),
    };

    for &(key, field) in LEGACY_KEYS {
        let Some(value) = legacy_value(raw, key) else {
            continue;
        };
        match field {
            Field::Title => track.title = value.to_string(),
            Field::Artist => track.artist = value.to_string(),
            Field::Album => track.album = value.to_string(),
            Field::TrackNumber => {
                if let Some(n) = parse_int(value) {
                    track.track_number = n;
                }
            }
            Field::Year => {
                if let Some(y) = parse_int(value) {
                    track.year = y;
                }
            }
        }
    }

    if track.album.is_empty() {
        track.album = track.title.clone();
    }

    track
}
