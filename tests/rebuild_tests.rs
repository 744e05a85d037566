mod support;

use colshape::catalog::metadata::{self, TableRef};
use colshape::error::Error;
use colshape::executor::runner;
use colshape::generator::column_def::{NewColumn, Position};
use colshape::generator::rebuild::DEFAULT_TMP_SUFFIX;

fn new_column(
    name: &str,
    decl_type: &str,
    position: Position,
    anchor: &str,
    default: Option<&str>,
    nullable: bool,
) -> NewColumn {
    NewColumn {
        name: name.to_string(),
        decl_type: decl_type.to_string(),
        nullable,
        default: default.map(str::to_string),
        position,
        anchor: anchor.to_string(),
    }
}

fn column_names(conn: &rusqlite::Connection, table: &TableRef) -> Vec<String> {
    metadata::table_columns(conn, table)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn rebuild_places_new_columns_at_requested_positions() {
    let mut conn = support::memory_db();
    support::sample_people_table(&conn);
    let table = TableRef::parse("people").unwrap();

    let specs = vec![
        new_column("age", "INTEGER", Position::After, "name", Some("0"), true),
        new_column("prefix", "TEXT", Position::Before, "id", None, true),
    ];
    runner::rebuild_table(&mut conn, &table, &specs, DEFAULT_TMP_SUFFIX).unwrap();

    assert_eq!(
        column_names(&conn, &table),
        vec!["prefix", "id", "name", "age", "status"]
    );
}

#[test]
fn rebuild_copies_rows_and_backfills_defaults_and_nulls() {
    let mut conn = support::memory_db();
    support::sample_people_table(&conn);
    let table = TableRef::parse("people").unwrap();

    let specs = vec![
        new_column("age", "INTEGER", Position::After, "name", Some("42"), true),
        new_column("note", "TEXT", Position::After, "age", None, true),
    ];
    runner::rebuild_table(&mut conn, &table, &specs, DEFAULT_TMP_SUFFIX).unwrap();

    let (count, ages, notes): (i64, i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), SUM(age = 42), COUNT(note) FROM people",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(count, 2, "both rows should survive the rebuild");
    assert_eq!(ages, 2, "default expression should backfill every row");
    assert_eq!(notes, 0, "spec without default should backfill NULL");

    let name: String = conn
        .query_row("SELECT name FROM people WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "ada");
}

#[test]
fn rebuild_preserves_the_primary_key_and_constraints() {
    let mut conn = support::memory_db();
    support::sample_people_table(&conn);
    let table = TableRef::parse("people").unwrap();

    let specs = vec![new_column("age", "INTEGER", Position::After, "id", None, true)];
    runner::rebuild_table(&mut conn, &table, &specs, DEFAULT_TMP_SUFFIX).unwrap();

    let columns = metadata::table_columns(&conn, &table).unwrap();
    let id = columns.iter().find(|c| c.name == "id").unwrap();
    assert_eq!(id.pk_ordinal, 1);

    let name = columns.iter().find(|c| c.name == "name").unwrap();
    assert!(name.not_null);

    let status = columns.iter().find(|c| c.name == "status").unwrap();
    assert_eq!(status.default.as_deref(), Some("'new'"));

    // Uniqueness still enforced after the rebuild.
    let dup = conn.execute("INSERT INTO people (id, name) VALUES (1, 'dup')", []);
    assert!(dup.is_err());
}

#[test]
fn failed_rebuild_rolls_back_and_leaves_the_original_table() {
    let mut conn = support::memory_db();
    support::sample_people_table(&conn);
    let table = TableRef::parse("people").unwrap();

    // NOT NULL without a default cannot backfill a populated table.
    let specs = vec![new_column("strict", "TEXT", Position::After, "id", None, false)];
    let plan = runner::plan_rebuild(&conn, &table, &specs, DEFAULT_TMP_SUFFIX).unwrap();
    runner::apply_rebuild(&mut conn, &plan).expect_err("NULL backfill should violate NOT NULL");

    assert_eq!(column_names(&conn, &table), vec!["id", "name", "status"]);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);

    // The staging table must not survive the rollback.
    assert!(!metadata::table_exists(&conn, &plan.tmp_table).unwrap());
}

#[test]
fn planning_does_not_touch_the_database() {
    let conn = support::memory_db();
    support::sample_people_table(&conn);
    let table = TableRef::parse("people").unwrap();

    let specs = vec![new_column("age", "INTEGER", Position::After, "id", None, true)];
    let plan = runner::plan_rebuild(&conn, &table, &specs, DEFAULT_TMP_SUFFIX).unwrap();

    assert!(plan.script().contains("CREATE TABLE \"people_reorder_tmp\""));
    assert_eq!(column_names(&conn, &table), vec!["id", "name", "status"]);
    assert!(!metadata::table_exists(&conn, &plan.tmp_table).unwrap());
}

#[test]
fn unknown_anchor_fails_before_any_statement_runs() {
    let conn = support::memory_db();
    support::sample_people_table(&conn);
    let table = TableRef::parse("people").unwrap();

    let specs = vec![new_column("age", "INTEGER", Position::After, "ghost", None, true)];
    let err = runner::plan_rebuild(&conn, &table, &specs, DEFAULT_TMP_SUFFIX)
        .expect_err("unknown anchor should fail");
    assert!(matches!(err, Error::AnchorNotFound(ref a) if a == "ghost"));
}

#[test]
fn probe_count_reflects_a_rebuilt_layout() {
    let mut conn = support::memory_db();
    support::sample_probe_table(&conn);
    let table = TableRef::parse("t").unwrap();

    assert_eq!(runner::count_matching_non_null(&conn, &table, "foo").unwrap(), 1);

    // C_foo defaults to 'z', so every copied row gets a non-null value.
    let specs = vec![new_column("C_foo", "TEXT", Position::After, "B_foo", Some("'z'"), true)];
    runner::rebuild_table(&mut conn, &table, &specs, DEFAULT_TMP_SUFFIX).unwrap();

    assert_eq!(runner::count_matching_non_null(&conn, &table, "foo").unwrap(), 2);
}
