//! Column definition rendering for rebuilt tables, and the serde model for
//! operator-supplied new-column specs.

use std::path::Path;

use serde::Deserialize;

use crate::catalog::metadata::ColumnInfo;
use crate::catalog::names;
use crate::error::Result;

/// Where a new column lands relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Insert immediately before the anchor column.
    Before,
    /// Insert immediately after the anchor column.
    After,
}

/// One new column to insert during a rebuild.
///
/// Deserialized from the operator's JSON spec file:
///
/// ```json
/// {
///   "name": "Score",
///   "type": "INTEGER",
///   "nullable": false,
///   "default": "0",
///   "position": "after",
///   "anchor": "Name"
/// }
/// ```
///
/// `default` is a raw SQL expression, trusted operator input exactly as a
/// `DEFAULT` clause would be in hand-written DDL.
#[derive(Debug, Clone, Deserialize)]
pub struct NewColumn {
    /// Name of the column to create.
    pub name: String,
    /// Declared type text, e.g. `INTEGER` or `NVARCHAR(50)`.
    #[serde(rename = "type")]
    pub decl_type: String,
    /// Whether NULLs are allowed; defaults to true.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default expression used in the definition and to backfill copied rows.
    #[serde(default)]
    pub default: Option<String>,
    /// Placement relative to `anchor`.
    pub position: Position,
    /// Existing column the placement is relative to.
    pub anchor: String,
}

fn default_nullable() -> bool {
    true
}

impl NewColumn {
    /// Metadata for the column as it will exist after the rebuild.
    pub fn to_column_info(&self) -> ColumnInfo {
        ColumnInfo {
            cid: -1,
            name: self.name.clone(),
            decl_type: self.decl_type.clone(),
            not_null: !self.nullable,
            default: self.default.clone(),
            pk_ordinal: 0,
        }
    }
}

/// Parse a list of [`NewColumn`] specs from JSON text.
pub fn parse_new_columns(json: &str) -> Result<Vec<NewColumn>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a [`NewColumn`] spec file.
pub fn load_new_columns(path: &Path) -> Result<Vec<NewColumn>> {
    let json = std::fs::read_to_string(path)?;
    parse_new_columns(&json)
}

/// Render one column definition for a `CREATE TABLE` statement.
///
/// `inline_pk` marks the sole primary-key column of a single-column key;
/// multi-column keys are rendered as a table constraint by the caller.
pub fn render_column_def(col: &ColumnInfo, inline_pk: bool) -> String {
    let mut def = names::quote_identifier(&col.name);
    if !col.decl_type.is_empty() {
        def.push(' ');
        def.push_str(&col.decl_type);
    }
    if inline_pk {
        def.push_str(" PRIMARY KEY");
    }
    if let Some(default) = &col.default {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }
    if col.not_null {
        def.push_str(" NOT NULL");
    }
    def
}
