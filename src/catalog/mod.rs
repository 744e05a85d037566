/// Column metadata fetched through the `pragma_table_info` catalog function.
pub mod metadata;
/// Identifier normalization, validation, and quoting (schema-qualified names).
pub mod names;
