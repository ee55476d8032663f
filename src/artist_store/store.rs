//! SQLite-backed artist mapping store implementation.

use super::connection::{ConnectionSource, SqliteFileSource};
use super::models::{validate_name, ArtistMapping, ArtistStoreError, Platform, UpsertOutcome};
use super::schema::{ARTISTS_TABLE_V_0, ARTIST_STORE_VERSIONED_SCHEMAS};
use super::trait_def::ArtistMappingStore;
use crate::sqlite_persistence::initialize_schema;
use anyhow::{Context, Result};
use rusqlite::{
    ffi, params, Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use std::path::Path;
use tracing::{debug, error, info, warn};

const ARTISTS: &str = ARTISTS_TABLE_V_0.name;

/// SQLite-backed artist mapping store.
///
/// No connection is kept between calls: each operation opens one through its
/// [`ConnectionSource`] and drops it before returning.
pub struct SqliteArtistStore {
    source: Box<dyn ConnectionSource>,
}

impl SqliteArtistStore {
    /// Open (creating if needed) the artist database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        info!("Opening artist database at {:?}", db_path);
        Self::with_source(Box::new(SqliteFileSource::new(db_path)))
    }

    /// Build a store on top of an arbitrary connection source. The schema is
    /// created or validated using one connection from the source.
    pub fn with_source(source: Box<dyn ConnectionSource>) -> Result<Self> {
        {
            let conn = source
                .connect()
                .context("Failed to open artist database")?;
            let version = initialize_schema(&conn, ARTIST_STORE_VERSIONED_SCHEMAS)?;
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", ARTISTS), [], |r| {
                    r.get(0)
                })
                .context("Failed to count artists")?;
            info!(
                "Artist store ready: schema version {}, {} artists",
                version, count
            );
        }
        Ok(Self { source })
    }
}

fn mapping_from_row(row: &Row) -> rusqlite::Result<ArtistMapping> {
    Ok(ArtistMapping {
        id: row.get(0)?,
        name: row.get(1)?,
        spotify_id: row.get(2)?,
        youtube_id: row.get(3)?,
        am_id: row.get(4)?,
        itunes_id: row.get(5)?,
        genius_id: row.get(6)?,
    })
}

const SELECT_MAPPING_COLUMNS: &str =
    "SELECT id, name, spotify_id, youtube_id, am_id, itunes_id, genius_id FROM artists";

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Runs `f` inside an immediate transaction. On success the transaction is
/// committed, on failure it is rolled back before the error is returned.
fn in_transaction<T>(
    conn: &mut Connection,
    f: impl FnOnce(&Transaction) -> rusqlite::Result<T>,
) -> Result<T, ArtistStoreError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match f(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            warn!("Rolling back artist store transaction: {}", err);
            if let Err(rollback_err) = tx.rollback() {
                error!("Failed to roll back transaction: {}", rollback_err);
            }
            Err(err.into())
        }
    }
}

fn update_platform_id(
    tx: &Transaction,
    artist_id: i64,
    platform: Platform,
    external_id: &str,
) -> rusqlite::Result<()> {
    tx.execute(
        &format!(
            "UPDATE {} SET {} = ?1 WHERE id = ?2",
            ARTISTS,
            platform.column()
        ),
        params![external_id, artist_id],
    )?;
    Ok(())
}

/// Inserts a new row for `name`. If another writer created the row first the
/// insert trips the unique constraint on `name`, and the platform column of
/// that row is updated instead.
fn insert_or_update(
    tx: &Transaction,
    name: &str,
    platform: Platform,
    external_id: &str,
) -> rusqlite::Result<UpsertOutcome> {
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} (name, {}) VALUES (?1, ?2)",
            ARTISTS,
            platform.column()
        ),
        params![name, external_id],
    );
    match inserted {
        Ok(_) => Ok(UpsertOutcome::Created {
            name: name.to_string(),
            platform,
        }),
        Err(err) if is_unique_violation(&err) => {
            debug!("Artist '{}' already exists, updating instead", name);
            tx.execute(
                &format!(
                    "UPDATE {} SET {} = ?1 WHERE name = ?2",
                    ARTISTS,
                    platform.column()
                ),
                params![external_id, name],
            )?;
            Ok(UpsertOutcome::Updated {
                name: name.to_string(),
                platform,
            })
        }
        Err(err) => Err(err),
    }
}

impl ArtistMappingStore for SqliteArtistStore {
    fn upsert(
        &self,
        name: &str,
        platform: Platform,
        external_id: &str,
    ) -> Result<UpsertOutcome, ArtistStoreError> {
        validate_name(name)?;

        let mut conn = self.source.connect()?;
        let outcome = in_transaction(&mut conn, |tx| {
            let existing: Option<i64> = tx
                .query_row(
                    &format!("SELECT id FROM {} WHERE name = ?1", ARTISTS),
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;

            match existing {
                Some(artist_id) => {
                    update_platform_id(tx, artist_id, platform, external_id)?;
                    Ok(UpsertOutcome::Updated {
                        name: name.to_string(),
                        platform,
                    })
                }
                None => insert_or_update(tx, name, platform, external_id),
            }
        })?;

        info!("{}", outcome.message());
        Ok(outcome)
    }

    fn get_artist_mapping(&self, name: &str) -> Result<Option<ArtistMapping>, ArtistStoreError> {
        let conn = self.source.connect()?;
        let mapping = conn
            .query_row(
                &format!("{} WHERE name = ?1", SELECT_MAPPING_COLUMNS),
                params![name],
                mapping_from_row,
            )
            .optional()?;
        Ok(mapping)
    }

    fn list_artist_mappings(&self) -> Result<Vec<ArtistMapping>, ArtistStoreError> {
        let conn = self.source.connect()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_MAPPING_COLUMNS))?;
        let mappings = stmt
            .query_map([], mapping_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(mappings)
    }
}
