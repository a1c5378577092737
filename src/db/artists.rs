//! The derived artist list.
//!
//! Track artist fields may name several performers joined with `;`. The
//! `artists` table holds each individual name once, rebuilt by
//! [`populate_artists_from_tracks`] after every import.

use sqlx::sqlite::SqlitePool;

use super::tracks::get_artists_from_tracks;
use crate::model::Artist;

/// Separator between performers in a track's artist field.
pub const ARTIST_DELIMITER: char = ';';

/// Split a raw artist field into trimmed, non-empty performer names.
///
/// `"A; B;"` yields `A` and `B`; the empty trailing component is dropped.
pub fn split_artists(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(ARTIST_DELIMITER)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Insert an artist row unconditionally.
pub async fn add_artist(pool: &SqlitePool, name: &str) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO artists (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Artists with exactly this name.
pub async fn find_artists(pool: &SqlitePool, name: &str) -> sqlx::Result<Vec<Artist>> {
    sqlx::query_as::<_, Artist>("SELECT name FROM artists WHERE name = ?")
        .bind(name)
        .fetch_all(pool)
        .await
}

/// All artists, ascending by name.
pub async fn list_artists(pool: &SqlitePool) -> sqlx::Result<Vec<Artist>> {
    sqlx::query_as::<_, Artist>("SELECT name FROM artists ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Add every performer named in the tracks table that is not yet listed.
///
/// Each distinct raw artist string is split with [`split_artists`]; a name is
/// inserted only when [`find_artists`] finds no row for it. Existing rows are
/// never touched, so repeated runs add nothing new. The lookup-then-insert is
/// only sound with a single writer.
///
/// Returns the number of artists inserted.
pub async fn populate_artists_from_tracks(pool: &SqlitePool) -> sqlx::Result<usize> {
    let mut added = 0;

    for raw in get_artists_from_tracks(pool).await? {
        for name in split_artists(&raw) {
            if find_artists(pool, name).await?.is_empty() {
                add_artist(pool, name).await?;
                tracing::debug!(artist = name, "Added artist");
                added += 1;
            }
        }
    }

    Ok(added)
}
