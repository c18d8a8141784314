//! Database connection management
//!
//! Utilities for opening and configuring SQLite connections

use std::path::Path;

use rusqlite::Connection;

use cmdbase_core::errors::Result;

use crate::errors::from_rusqlite;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|err| from_rusqlite("open", err))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|err| from_rusqlite("open", err))
}

/// Configure a connection with optimal settings
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|err| from_rusqlite("configure", err))?;

    // journal_mode reports the resulting mode as a row
    conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))
        .map_err(|err| from_rusqlite("configure", err))?;

    Ok(())
}
