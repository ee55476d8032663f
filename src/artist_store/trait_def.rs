//! ArtistMappingStore trait definition.

use super::models::{ArtistMapping, ArtistStoreError, Platform, UpsertOutcome};

/// Trait for artist mapping storage backends.
pub trait ArtistMappingStore: Send + Sync {
    /// Set the identifier of `name` on `platform`, creating the artist row if
    /// no row with exactly that name exists yet.
    fn upsert(
        &self,
        name: &str,
        platform: Platform,
        external_id: &str,
    ) -> Result<UpsertOutcome, ArtistStoreError>;

    /// Same as [`ArtistMappingStore::upsert`], taking the platform as its
    /// textual tag. Unknown tags fail with `InvalidArgument` without touching
    /// the database.
    fn upsert_platform_id(
        &self,
        name: &str,
        platform: &str,
        external_id: &str,
    ) -> Result<UpsertOutcome, ArtistStoreError> {
        let platform: Platform = platform.parse()?;
        self.upsert(name, platform, external_id)
    }

    /// Get the row stored for an exact artist name.
    fn get_artist_mapping(&self, name: &str) -> Result<Option<ArtistMapping>, ArtistStoreError>;

    /// All stored rows, oldest first.
    fn list_artist_mappings(&self) -> Result<Vec<ArtistMapping>, ArtistStoreError>;
}
