//! Executes assembled statements against a live `SQLite` database.
//!
//! The probe path is read-only and a single scalar query; the rebuild path
//! runs its four statements inside one transaction so a failure leaves the
//! original table untouched.

use std::path::Path;

use rusqlite::Connection;

use crate::catalog::metadata::{self, TableRef};
use crate::error::{Error, Result};
use crate::generator::column_def::NewColumn;
use crate::generator::nonnull;
use crate::generator::rebuild::{self, RebuildPlan};

/// Open the database file at `path`.
pub fn open_database(path: &Path) -> Result<Connection> {
    Ok(Connection::open(path)?)
}

/// Assemble the probe query for columns of `table` matching `pattern`.
///
/// `None` when no column matches (including when the table does not resolve);
/// the defined count for that case is 0 and nothing is executed.
pub fn count_query_sql(
    conn: &Connection,
    table: &TableRef,
    pattern: &str,
) -> Result<Option<String>> {
    let columns = metadata::matching_columns(conn, table, pattern)?;
    Ok(nonnull::build_count_query(table, &columns))
}

/// Count how many columns of `table` whose name contains `pattern` hold at
/// least one non-null value.
pub fn count_matching_non_null(conn: &Connection, table: &TableRef, pattern: &str) -> Result<i64> {
    match count_query_sql(conn, table, pattern)? {
        None => Ok(0),
        Some(sql) => {
            let count = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(count)
        }
    }
}

/// Build a rebuild plan for `table`, verifying the table resolves and the
/// temporary table name is free.
pub fn plan_rebuild(
    conn: &Connection,
    table: &TableRef,
    specs: &[NewColumn],
    suffix: &str,
) -> Result<RebuildPlan> {
    if !metadata::table_exists(conn, table)? {
        return Err(Error::TableNotFound(table.qualified_sql()));
    }
    let existing = metadata::table_columns(conn, table)?;
    let plan = rebuild::build_rebuild_plan(table, &existing, specs, suffix)?;
    if metadata::table_exists(conn, &plan.tmp_table)? {
        return Err(Error::TmpTableExists(plan.tmp_table.table().to_string()));
    }
    Ok(plan)
}

/// Execute a rebuild plan inside a single transaction.
pub fn apply_rebuild(conn: &mut Connection, plan: &RebuildPlan) -> Result<()> {
    let tx = conn.transaction()?;
    for statement in plan.statements() {
        tx.execute_batch(statement)?;
    }
    tx.commit()?;
    Ok(())
}

/// Plan and execute a rebuild in one step, returning the applied plan.
pub fn rebuild_table(
    conn: &mut Connection,
    table: &TableRef,
    specs: &[NewColumn],
    suffix: &str,
) -> Result<RebuildPlan> {
    let plan = plan_rebuild(conn, table, specs, suffix)?;
    apply_rebuild(conn, &plan)?;
    Ok(plan)
}
