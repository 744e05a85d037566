#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

pub(crate) fn memory_db() -> Connection {
    Connection::open_in_memory().expect("in-memory database should open")
}

/// Table `t` from the probe example: `A_foo` all null, `B_foo` with one
/// non-null row, `other` non-null but not matching the `foo` filter.
pub(crate) fn sample_probe_table(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE t (A_foo TEXT, B_foo TEXT, other TEXT);
         INSERT INTO t (A_foo, B_foo, other) VALUES (NULL, NULL, 'x');
         INSERT INTO t (A_foo, B_foo, other) VALUES (NULL, 'y', NULL);
         INSERT INTO t (A_foo, B_foo, other) VALUES (NULL, NULL, NULL);",
    )
    .expect("fixture table should build");
}

/// A small people table with a single-column integer primary key, a default,
/// and a NOT NULL column; used by the rebuild tests.
pub(crate) fn sample_people_table(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE people (
             id INTEGER PRIMARY KEY,
             name TEXT NOT NULL,
             status TEXT DEFAULT 'new'
         );
         INSERT INTO people (id, name, status) VALUES (1, 'ada', 'new');
         INSERT INTO people (id, name) VALUES (2, 'grace');",
    )
    .expect("fixture table should build");
}

pub(crate) fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{nanos}"));
    std::fs::create_dir_all(&dir).expect("should create temp dir");
    dir
}
