//! Database module for track and artist persistence.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//! The schema is created on demand (`CREATE TABLE IF NOT EXISTS`); there are
//! no migrations.
//!
//! - [`tracks`]: track CRUD and the filtered track query
//! - [`artists`]: the derived, deduplicated artist list
//!
//! # Example
//!
//! ```ignore
//! use music_catalog::db::{self, init_db};
//!
//! let pool = init_db(&db::db_url("music.db")).await?;
//! let albums = db::get_albums(&pool).await?;
//! ```

pub mod artists;
pub mod tracks;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub use artists::{add_artist, find_artists, list_artists, populate_artists_from_tracks, split_artists};
pub use tracks::{
    Ordering, Predicate, TrackQuery, add_track, get_albums, get_artists_from_tracks,
    get_genres_from_tracks, get_tracks, get_tracks_by_album, get_tracks_by_path, query_tracks,
    update_track_album, update_track_artist,
};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "music_catalog.db";

/// Build a SQLite database URL from the configured storage location.
///
/// A location that already is a `sqlite:` URL is used verbatim; an empty one
/// falls back to [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(location: &str) -> String {
    if location.starts_with("sqlite:") {
        location.to_string()
    } else if location.is_empty() {
        format!("sqlite:{}", DEFAULT_DB_NAME)
    } else {
        format!("sqlite:{}", location)
    }
}

/// Open the catalog database and make sure the schema exists.
///
/// Creates the database file if it doesn't exist. The pool holds a single
/// connection: the catalog has exactly one reader and writer.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Schema creation fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(db_url)
        .await?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Create the `tracks` and `artists` tables if they are missing.
///
/// Idempotent; does nothing to existing tables or rows.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY ASC,
            title TEXT NOT NULL DEFAULT '',
            artist TEXT NOT NULL DEFAULT '',
            album TEXT NOT NULL DEFAULT '',
            track_number INTEGER NOT NULL DEFAULT 0,
            genre TEXT NOT NULL DEFAULT '',
            year INTEGER NOT NULL DEFAULT 0,
            duration INTEGER NOT NULL DEFAULT 0,
            path TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY ASC,
            name TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete every track and artist row.
///
/// Ensures the schema first so a clear on a fresh store succeeds.
pub async fn clear_all(pool: &SqlitePool) -> sqlx::Result<()> {
    ensure_schema(pool).await?;

    sqlx::query("DELETE FROM artists").execute(pool).await?;
    sqlx::query("DELETE FROM tracks").execute(pool).await?;

    tracing::info!("Cleared all tracks and artists");
    Ok(())
}
