//! Track persistence and the filtered track query.
//!
//! Filters are built from [`Predicate`] values rendered through
//! [`sqlx::QueryBuilder`], so every user-supplied value reaches SQLite as a
//! bound parameter.

use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::QueryBuilder;

use crate::model::Track;

const TRACK_COLUMNS: &str = "title, artist, album, track_number, genre, year, duration, path";

// ============================================================================
// Query Builder
// ============================================================================

/// A single filter condition on the `tracks` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match on the title.
    ///
    /// Folding uses SQLite's `lower()`, which only folds ASCII letters unless
    /// SQLite was built with ICU.
    TitleContains(String),
    /// Case-sensitive substring match on the raw artist string.
    ArtistContains(String),
    /// Case-sensitive exact match on the album.
    AlbumIs(String),
}

impl Predicate {
    fn push_to(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        match self {
            Self::TitleContains(title) => {
                qb.push("instr(lower(title), lower(")
                    .push_bind(title.clone())
                    .push(")) > 0");
            }
            Self::ArtistContains(artist) => {
                qb.push("instr(artist, ").push_bind(artist.clone()).push(") > 0");
            }
            Self::AlbumIs(album) => {
                qb.push("album = ").push_bind(album.clone());
            }
        }
    }
}

/// Result ordering of a [`TrackQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Album listings come back in track order.
    TrackNumber,
    /// Everything else is alphabetical.
    Title,
}

/// Composable filter over stored tracks.
///
/// Predicates are ANDed. Empty values are dropped when added, so an empty
/// filter argument behaves exactly like an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackQuery {
    predicates: Vec<Predicate>,
}

impl TrackQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from the optional title/artist/album filters.
    pub fn from_filters(title: Option<&str>, artist: Option<&str>, album: Option<&str>) -> Self {
        let mut query = Self::new();
        if let Some(title) = title {
            query = query.title_contains(title);
        }
        if let Some(artist) = artist {
            query = query.artist_contains(artist);
        }
        if let Some(album) = album {
            query = query.album_is(album);
        }
        query
    }

    pub fn title_contains(self, title: &str) -> Self {
        self.with(Predicate::TitleContains, title)
    }

    pub fn artist_contains(self, artist: &str) -> Self {
        self.with(Predicate::ArtistContains, artist)
    }

    pub fn album_is(self, album: &str) -> Self {
        self.with(Predicate::AlbumIs, album)
    }

    fn with(mut self, make: fn(String) -> Predicate, value: &str) -> Self {
        if !value.is_empty() {
            self.predicates.push(make(value.to_string()));
        }
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Track order when scoped to an album, title order otherwise.
    pub fn ordering(&self) -> Ordering {
        if self
            .predicates
            .iter()
            .any(|p| matches!(p, Predicate::AlbumIs(_)))
        {
            Ordering::TrackNumber
        } else {
            Ordering::Title
        }
    }

    /// Render the query as SQL with bound parameters.
    pub fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT {TRACK_COLUMNS} FROM tracks"));

        for (i, predicate) in self.predicates.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_to(&mut qb);
        }

        qb.push(match self.ordering() {
            Ordering::TrackNumber => " ORDER BY track_number, id",
            Ordering::Title => " ORDER BY title, id",
        });
        qb
    }

    /// Run the query.
    pub async fn fetch(&self, pool: &SqlitePool) -> sqlx::Result<Vec<Track>> {
        let mut qb = self.build();
        qb.build_query_as::<Track>().fetch_all(pool).await
    }
}

// ============================================================================
// Track Operations
// ============================================================================

/// Insert one track row.
///
/// There is no uniqueness constraint on `path`; callers check
/// [`get_tracks_by_path`] first when they need idempotence.
pub async fn add_track(pool: &SqlitePool, track: &Track) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO tracks (title, artist, album, track_number, genre, year, duration, path)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(track.track_number)
    .bind(&track.genre)
    .bind(track.year)
    .bind(track.duration)
    .bind(&track.path)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All tracks stored under exactly this path.
pub async fn get_tracks_by_path(pool: &SqlitePool, path: &str) -> sqlx::Result<Vec<Track>> {
    sqlx::query_as::<_, Track>(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks WHERE path = ? ORDER BY id"
    ))
    .bind(path)
    .fetch_all(pool)
    .await
}

/// All tracks, in insertion order.
pub async fn get_tracks(pool: &SqlitePool) -> sqlx::Result<Vec<Track>> {
    sqlx::query_as::<_, Track>(&format!("SELECT {TRACK_COLUMNS} FROM tracks ORDER BY id"))
        .fetch_all(pool)
        .await
}

/// Tracks of one album, ordered by track number.
pub async fn get_tracks_by_album(pool: &SqlitePool, album: &str) -> sqlx::Result<Vec<Track>> {
    query_tracks(pool, None, None, Some(album)).await
}

/// Filtered track listing.
///
/// - `title`: case-insensitive substring (ASCII folding, see
///   [`Predicate::TitleContains`])
/// - `artist`: case-sensitive substring
/// - `album`: case-sensitive exact match
///
/// Absent or empty filters are ignored. Results are ordered by track number
/// when `album` is given, by title otherwise.
pub async fn query_tracks(
    pool: &SqlitePool,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
) -> sqlx::Result<Vec<Track>> {
    TrackQuery::from_filters(title, artist, album)
        .fetch(pool)
        .await
}

/// Distinct album names, ascending.
pub async fn get_albums(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar("SELECT DISTINCT album FROM tracks ORDER BY album")
        .fetch_all(pool)
        .await
}

/// Distinct raw artist strings (not split), ascending.
pub async fn get_artists_from_tracks(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar("SELECT DISTINCT artist FROM tracks ORDER BY artist")
        .fetch_all(pool)
        .await
}

/// Distinct genres, ascending.
pub async fn get_genres_from_tracks(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar("SELECT DISTINCT genre FROM tracks ORDER BY genre")
        .fetch_all(pool)
        .await
}

/// Set the album of every track stored under `path`.
///
/// Returns the number of rows changed; an unknown path changes none.
pub async fn update_track_album(pool: &SqlitePool, path: &str, album: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE tracks SET album = ? WHERE path = ?")
        .bind(album)
        .bind(path)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Set the artist of every track stored under `path`.
///
/// Returns the number of rows changed; an unknown path changes none.
pub async fn update_track_artist(
    pool: &SqlitePool,
    path: &str,
    artist: &str,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE tracks SET artist = ? WHERE path = ?")
        .bind(artist)
        .bind(path)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
