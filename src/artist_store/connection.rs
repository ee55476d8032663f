//! How the artist store gets hold of a database connection.

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Hands out a fresh connection for each store operation.
///
/// The connection is owned by the operation that requested it and is closed
/// when dropped, whichever way the operation returns.
pub trait ConnectionSource: Send + Sync {
    fn connect(&self) -> rusqlite::Result<Connection>;
}

/// Opens connections to a SQLite database file.
pub struct SqliteFileSource {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

impl ConnectionSource for SqliteFileSource {
    fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }
}
