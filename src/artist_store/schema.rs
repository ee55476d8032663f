//! SQLite schema definitions for the artist mapping database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

/// One row per artist name, one nullable identifier column per platform.
pub const ARTISTS_TABLE_V_0: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("spotify_id", &SqlType::Text),
        sqlite_column!("youtube_id", &SqlType::Text),
        sqlite_column!("am_id", &SqlType::Text),
        sqlite_column!("itunes_id", &SqlType::Text),
        sqlite_column!("genius_id", &SqlType::Text),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

pub const ARTIST_STORE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ARTISTS_TABLE_V_0],
}];
