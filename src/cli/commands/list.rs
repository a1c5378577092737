//! Catalog listing commands.

use tokio::runtime::Runtime;

use super::with_store;
use crate::config::Config;
use crate::db;
use crate::model::Track;

/// List distinct albums
pub fn cmd_list_albums(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    with_store(rt, config, async |pool| {
        print_section("Albums", db::get_albums(pool).await?);
        Ok(())
    })
}

/// List the split, deduplicated artists
pub fn cmd_list_artists(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    with_store(rt, config, async |pool| {
        let artists = db::list_artists(pool).await?;
        print_section("Artists", artists.into_iter().map(|a| a.name));
        Ok(())
    })
}

/// List distinct genres
pub fn cmd_list_genres(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    with_store(rt, config, async |pool| {
        print_section("Genres", db::get_genres_from_tracks(pool).await?);
        Ok(())
    })
}

/// List tracks matching the given filters
pub fn cmd_list_tracks(
    rt: &Runtime,
    config: &Config,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
    genre: Option<&str>,
) -> anyhow::Result<()> {
    let album_scoped = album.is_some_and(|a| !a.is_empty());

    with_store(rt, config, async |pool| {
        let tracks = db::query_tracks(pool, title, artist, album).await?;
        print_section(
            "Tracks",
            tracks
                .iter()
                .filter(|t| matches_genre(t, genre))
                .map(|t| format_track(t, album_scoped)),
        );
        Ok(())
    })
}

fn print_section(heading: &str, lines: impl IntoIterator<Item = String>) {
    println!("{heading}");
    for line in lines {
        println!("    {line}");
    }
}

/// Case-insensitive genre equality; no genre matches everything.
fn matches_genre(track: &Track, genre: Option<&str>) -> bool {
    match genre {
        Some(genre) if !genre.is_empty() => track.genre.to_lowercase() == genre.to_lowercase(),
        _ => true,
    }
}

/// Album listings lead with the track number, others with the title.
fn format_track(track: &Track, album_scoped: bool) -> String {
    if album_scoped {
        format!(
            "{} • {} • {} • {}",
            track.track_number, track.title, track.album, track.artist
        )
    } else {
        format!(
            "{} • {} • {} • {}",
            track.title, track.album, track.track_number, track.artist
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_track;

    #[test]
    fn test_matches_genre() {
        let track = Track {
            genre: "Hip-Hop".to_string(),
            ..mock_track()
        };
        assert!(matches_genre(&track, None));
        assert!(matches_genre(&track, Some("")));
        assert!(matches_genre(&track, Some("hip-hop")));
        assert!(!matches_genre(&track, Some("hip")));
    }

    #[test]
    fn test_format_track() {
        let track = Track {
            title: "Song".to_string(),
            album: "Alb".to_string(),
            artist: "A; B".to_string(),
            track_number: 3,
            ..mock_track()
        };
        assert_eq!(format_track(&track, false), "Song • Alb • 3 • A; B");
        assert_eq!(format_track(&track, true), "3 • Song • Alb • A; B");
    }
}
