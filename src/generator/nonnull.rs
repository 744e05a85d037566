//! Assembles the dynamic query that counts columns with at least one
//! non-null value.
//!
//! One fragment per column emits the column's name as a literal when any row
//! holds a non-null value in it; the fragments are unioned and wrapped in a
//! `COUNT(*)`. An empty column list produces no query at all — the caller
//! short-circuits to a count of 0 instead of executing an empty `UNION`.

use crate::catalog::metadata::{ColumnInfo, TableRef};
use crate::catalog::names;

/// One probe fragment for a single column.
///
/// `SELECT 'c' AS ColumnName WHERE EXISTS (SELECT 1 FROM <table> WHERE "c" IS NOT NULL)`
fn column_fragment(table: &TableRef, column: &str) -> String {
    format!(
        "SELECT {literal} AS ColumnName WHERE EXISTS \
         (SELECT 1 FROM {table} WHERE {ident} IS NOT NULL)",
        literal = names::quote_literal(column),
        table = table.qualified_sql(),
        ident = names::quote_identifier(column),
    )
}

/// Build the full count query over the given columns.
///
/// Returns `None` when `columns` is empty; there is no valid empty union and
/// the defined result for that case is 0.
pub fn build_count_query(table: &TableRef, columns: &[ColumnInfo]) -> Option<String> {
    if columns.is_empty() {
        return None;
    }

    let fragments: Vec<String> = columns
        .iter()
        .map(|c| column_fragment(table, &c.name))
        .collect();

    Some(format!(
        "SELECT COUNT(*) AS MatchingNonNullColumnCount FROM ({}) AS x;",
        fragments.join(" UNION ALL ")
    ))
}
