use rusqlite::Connection;

use crate::catalog::names;
use crate::error::Result;

/// A validated, optionally schema-qualified table reference.
///
/// Parsing splits and validates the parts once; every later use renders them
/// through [`names::quote_identifier`] or binds them as parameters, so the
/// raw input text never reaches generated SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    schema: Option<String>,
    table: String,
}

impl TableRef {
    /// Parse a table name such as `users`, `main.users`, or `"aux"."Order Items"`.
    pub fn parse(name: &str) -> Result<Self> {
        let (schema, table) = match names::split_schema_and_relation(name) {
            Some((schema, table)) => (Some(schema), table),
            None => (None, names::unquote_identifier(name.trim()).to_string()),
        };
        if let Some(schema) = &schema {
            names::validate_identifier(schema)?;
        }
        names::validate_identifier(&table)?;
        Ok(TableRef { schema, table })
    }

    /// The bare (unquoted) table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The schema part, when the reference was qualified.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Quoted rendering for interpolation into generated SQL,
    /// e.g. `"main"."users"` or `"users"`.
    pub fn qualified_sql(&self) -> String {
        match &self.schema {
            Some(schema) => format!(
                "{}.{}",
                names::quote_identifier(schema),
                names::quote_identifier(&self.table)
            ),
            None => names::quote_identifier(&self.table),
        }
    }

    /// A sibling reference in the same schema with a different table name.
    ///
    /// Used for the rebuild's temporary table.
    pub fn sibling(&self, table: &str) -> Result<Self> {
        names::validate_identifier(table)?;
        Ok(TableRef {
            schema: self.schema.clone(),
            table: table.to_string(),
        })
    }
}

/// One column row from `pragma_table_info`, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Catalog position (`cid`); `-1` for columns not yet in the catalog.
    pub cid: i64,
    /// Column name as declared.
    pub name: String,
    /// Declared type text; may be empty for typeless columns.
    pub decl_type: String,
    /// `NOT NULL` constraint present.
    pub not_null: bool,
    /// Default expression text, when declared.
    pub default: Option<String>,
    /// 1-based position within the primary key, 0 when not part of it.
    pub pk_ordinal: i64,
}

/// True when the referenced table exists.
pub fn table_exists(conn: &Connection, table: &TableRef) -> Result<bool> {
    let sql = match table.schema() {
        Some(schema) => format!(
            "SELECT COUNT(*) FROM {}.sqlite_master WHERE type = 'table' AND name = ?1",
            names::quote_identifier(schema)
        ),
        None => "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1".to_string(),
    };
    let count: i64 = conn.query_row(&sql, [table.table()], |row| row.get(0))?;
    Ok(count > 0)
}

/// All columns of the referenced table in declared (`cid`) order.
///
/// An unresolvable table yields an empty vec rather than an error: the
/// catalog function simply returns no rows. Callers that need a hard failure
/// check [`table_exists`] first.
pub fn table_columns(conn: &Connection, table: &TableRef) -> Result<Vec<ColumnInfo>> {
    // Table and schema names are bound as parameters; pragma_table_info is a
    // table-valued function, so no identifier interpolation is needed here.
    let (sql, params): (&str, Vec<&str>) = match table.schema() {
        Some(schema) => (
            "SELECT cid, name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?1, ?2) ORDER BY cid",
            vec![table.table(), schema],
        ),
        None => (
            "SELECT cid, name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?1) ORDER BY cid",
            vec![table.table()],
        ),
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params), |row| {
        Ok(ColumnInfo {
            cid: row.get(0)?,
            name: row.get(1)?,
            decl_type: row.get(2)?,
            not_null: row.get::<_, i64>(3)? != 0,
            default: row.get(4)?,
            pk_ordinal: row.get(5)?,
        })
    })?;
    let columns = rows.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Columns whose name contains `pattern`, ASCII case-insensitively.
///
/// Order and NotFound-style silence follow [`table_columns`].
pub fn matching_columns(
    conn: &Connection,
    table: &TableRef,
    pattern: &str,
) -> Result<Vec<ColumnInfo>> {
    let needle = pattern.to_ascii_lowercase();
    let columns = table_columns(conn, table)?
        .into_iter()
        .filter(|c| c.name.to_ascii_lowercase().contains(&needle))
        .collect();
    Ok(columns)
}
