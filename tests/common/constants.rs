//! Shared constants for end-to-end tests
//!
//! When stub provider data changes, update only this file.

// ============================================================================
// Stub provider artists
// ============================================================================

/// Spotify id the stub provider knows as "Radiohead"
pub const RADIOHEAD_SPOTIFY_ID: &str = "4Z8W4fKeB5YxbusRsdQVPb";

/// YouTube channel id used when mapping Radiohead
pub const RADIOHEAD_YOUTUBE_ID: &str = "UCr_3OtCCmiQu60BEQ5ZL_lg";

pub const RADIOHEAD_NAME: &str = "Radiohead";

/// Second search hit returned by the stub for "Radiohead"
pub const TRIBUTE_NAME: &str = "Radiohead Tribute Band";

/// The stub answers 429 for this artist
pub const RATE_LIMITED_ARTIST_ID: &str = "rate-limited";

/// The stub answers 401 for this artist
pub const REVOKED_TOKEN_ARTIST_ID: &str = "revoked-token";

/// The stub answers 500 for this artist
pub const FAILING_ARTIST_ID: &str = "server-error";

/// The stub answers 200 with a body missing required fields
pub const MALFORMED_ARTIST_ID: &str = "malformed";

/// Token handed out by the stub's accounts endpoint
pub const STUB_ACCESS_TOKEN: &str = "stub-access-token";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
