//! In-memory music database shared by unit tests.

use rusqlite::Connection;

use crate::db_manager::DbManager;

/// Two artists, one album each, two songs on "Low".
pub const MUSIC_FIXTURE_SQL: &str = "
    CREATE TABLE artists (_id INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE albums (_id INTEGER PRIMARY KEY, name TEXT NOT NULL, artist INTEGER);
    CREATE TABLE songs (_id INTEGER PRIMARY KEY, track INTEGER, title TEXT NOT NULL, album INTEGER);

    INSERT INTO artists (_id, name) VALUES (1, 'Bowie'), (2, 'Queen');
    INSERT INTO albums (_id, name, artist) VALUES
        (10, 'Low', 1),
        (11, 'A Night at the Opera', 2);
    INSERT INTO songs (_id, track, title, album) VALUES
        (100, 2, 'Breaking Glass', 10),
        (101, 1, 'Speed of Life', 10),
        (102, 11, 'Bohemian Rhapsody', 11);
";

pub fn music_db() -> DbManager {
    db_with(MUSIC_FIXTURE_SQL)
}

pub fn db_with(sql: &str) -> DbManager {
    let conn = Connection::open_in_memory().expect("in-memory db");
    conn.execute_batch(sql).expect("fixture sql");
    DbManager::from_connection(conn)
}
