//! Core data models for the music catalog.
//!
//! Defines the two stored entities, [`Track`] and [`Artist`]. Both derive
//! SQLx's `FromRow` for database mapping.
//!
//! # Database Schema
//!
//! - `tracks` - One row per imported audio file, identified by `path`
//! - `artists` - Individual performer names split out of `tracks.artist`

use serde::Serialize;
use sqlx::FromRow;

/// A track (audio file) in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct Track {
    /// Track title
    pub title: String,
    /// Raw artist string, possibly several names joined with `;`
    pub artist: String,
    /// Album title
    pub album: String,
    /// Track number on album (0 when unknown)
    pub track_number: i64,
    /// Genre, as tagged
    pub genre: String,
    /// Release year (0 when unknown)
    pub year: i64,
    /// Duration in seconds
    pub duration: i64,
    /// Absolute file path (import identity)
    pub path: String,
}

/// A single performer derived from track artist fields.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Artist {
    pub name: String,
}
