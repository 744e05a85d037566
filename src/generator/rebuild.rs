//! Plans a table rebuild that inserts new columns at requested physical
//! positions.
//!
//! SQLite's `ALTER TABLE ... ADD COLUMN` only appends, so reordering means
//! rebuilding: create a temporary table with the target layout, copy the
//! rows across (backfilling new columns from their default expression or
//! NULL), drop the original, and rename the temporary table into place. The
//! plan is pure data; execution and transaction scoping live in
//! [`crate::executor`].

use crate::catalog::metadata::{ColumnInfo, TableRef};
use crate::catalog::names;
use crate::error::{Error, Result};
use crate::generator::column_def::{self, NewColumn, Position};

/// Suffix appended to the table name to form the temporary table.
pub const DEFAULT_TMP_SUFFIX: &str = "_reorder_tmp";

/// The four ordered statements of a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildPlan {
    /// Temporary table the rows are staged in.
    pub tmp_table: TableRef,
    /// `CREATE TABLE` with the target column layout.
    pub create_table: String,
    /// `INSERT INTO ... SELECT` copying and backfilling the rows.
    pub copy_rows: String,
    /// Drops the original table.
    pub drop_original: String,
    /// Renames the temporary table to the original name.
    pub rename_tmp: String,
}

impl RebuildPlan {
    /// The statements in execution order.
    pub fn statements(&self) -> [&str; 4] {
        [
            &self.create_table,
            &self.copy_rows,
            &self.drop_original,
            &self.rename_tmp,
        ]
    }

    /// The full plan as one SQL script, one statement per line group.
    pub fn script(&self) -> String {
        self.statements().join("\n")
    }
}

/// Insert each new column before/after its anchor in the existing layout.
///
/// Anchors are matched case-insensitively against the working list, so a
/// later spec may anchor on a column inserted by an earlier one. Unknown
/// anchors and name collisions are errors.
pub fn insert_new_columns(
    existing: &[ColumnInfo],
    specs: &[NewColumn],
) -> Result<Vec<ColumnInfo>> {
    let mut ordered: Vec<ColumnInfo> = existing.to_vec();

    for spec in specs {
        names::validate_identifier(&spec.name)?;

        let name_lower = spec.name.to_ascii_lowercase();
        if ordered
            .iter()
            .any(|c| c.name.to_ascii_lowercase() == name_lower)
        {
            return Err(Error::DuplicateColumn(spec.name.clone()));
        }

        let anchor_lower = spec.anchor.to_ascii_lowercase();
        let idx = ordered
            .iter()
            .position(|c| c.name.to_ascii_lowercase() == anchor_lower)
            .ok_or_else(|| Error::AnchorNotFound(spec.anchor.clone()))?;

        let insert_idx = match spec.position {
            Position::Before => idx,
            Position::After => idx + 1,
        };
        ordered.insert(insert_idx, spec.to_column_info());
    }

    Ok(ordered)
}

/// Build the rebuild plan for `table` with `specs` inserted into `existing`.
pub fn build_rebuild_plan(
    table: &TableRef,
    existing: &[ColumnInfo],
    specs: &[NewColumn],
    suffix: &str,
) -> Result<RebuildPlan> {
    let ordered = insert_new_columns(existing, specs)?;
    let tmp_table = table.sibling(&format!("{}{}", table.table(), suffix))?;

    Ok(RebuildPlan {
        create_table: render_create_table(&tmp_table, &ordered),
        copy_rows: render_copy_rows(table, &tmp_table, existing, specs, &ordered),
        drop_original: format!("DROP TABLE {};", table.qualified_sql()),
        rename_tmp: format!(
            "ALTER TABLE {} RENAME TO {};",
            tmp_table.qualified_sql(),
            names::quote_identifier(table.table())
        ),
        tmp_table,
    })
}

fn render_create_table(tmp_table: &TableRef, ordered: &[ColumnInfo]) -> String {
    let mut pk_columns: Vec<&ColumnInfo> =
        ordered.iter().filter(|c| c.pk_ordinal > 0).collect();
    pk_columns.sort_by_key(|c| c.pk_ordinal);
    let inline_pk = pk_columns.len() == 1;

    let mut defs: Vec<String> = ordered
        .iter()
        .map(|c| column_def::render_column_def(c, inline_pk && c.pk_ordinal > 0))
        .collect();

    if pk_columns.len() > 1 {
        let key_list: Vec<String> = pk_columns
            .iter()
            .map(|c| names::quote_identifier(&c.name))
            .collect();
        defs.push(format!("PRIMARY KEY ({})", key_list.join(", ")));
    }

    format!(
        "CREATE TABLE {} (\n    {}\n);",
        tmp_table.qualified_sql(),
        defs.join(",\n    ")
    )
}

fn render_copy_rows(
    table: &TableRef,
    tmp_table: &TableRef,
    existing: &[ColumnInfo],
    specs: &[NewColumn],
    ordered: &[ColumnInfo],
) -> String {
    let insert_cols: Vec<String> = ordered
        .iter()
        .map(|c| names::quote_identifier(&c.name))
        .collect();

    let select_exprs: Vec<String> = ordered
        .iter()
        .map(|c| {
            let name_lower = c.name.to_ascii_lowercase();
            let is_existing = existing
                .iter()
                .any(|e| e.name.to_ascii_lowercase() == name_lower);
            if is_existing {
                return names::quote_identifier(&c.name);
            }
            // A column introduced by a spec; backfill from its default or NULL.
            let default = specs
                .iter()
                .find(|s| s.name.to_ascii_lowercase() == name_lower)
                .and_then(|s| s.default.clone());
            match default {
                Some(expr) => format!("{} AS {}", expr, names::quote_identifier(&c.name)),
                None => format!("NULL AS {}", names::quote_identifier(&c.name)),
            }
        })
        .collect();

    format!(
        "INSERT INTO {} ({})\nSELECT {}\nFROM {};",
        tmp_table.qualified_sql(),
        insert_cols.join(", "),
        select_exprs.join(", "),
        table.qualified_sql()
    )
}
