use std::path::Path;

use log::info;
use rusqlite::{Connection, OpenFlags};

/// Owns the browser's single SQLite connection.
pub struct DbManager {
    conn: Connection,
}

impl DbManager {
    /// Opens an existing database file read-only. A missing file is an error
    /// rather than a freshly created empty database.
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        info!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> Result<(), rusqlite::Error> {
        info!("Closing database connection");
        self.conn.close().map_err(|(_, err)| err)
    }
}
