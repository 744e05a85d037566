use crate::error::{Error, Result};

/// Return the identifier without surrounding double quotes.
pub fn unquote_identifier(ident: &str) -> &str {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ident)
}

/// Normalize an identifier for case-insensitive matching.
///
/// Trims whitespace, removes surrounding double quotes on a single identifier,
/// and lowercases the result.
pub fn normalize_identifier(ident: &str) -> String {
    unquote_identifier(ident.trim()).to_ascii_lowercase()
}

/// Split a potentially schema-qualified name into `(schema, relation)`.
///
/// Handles dots inside quoted identifiers, e.g. `"my.schema"."table.name"`.
pub fn split_schema_and_relation(name: &str) -> Option<(String, String)> {
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut parts: Vec<&str> = Vec::new();

    for (idx, ch) in name.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => {
                parts.push(name[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(name[start..].trim());

    if parts.len() < 2 {
        return None;
    }

    let schema = unquote_identifier(parts[parts.len() - 2]).to_string();
    let relation = unquote_identifier(parts[parts.len() - 1]).to_string();
    Some((schema, relation))
}

/// Render an identifier as a double-quoted SQL identifier.
///
/// Embedded double quotes are doubled, so any validated identifier is safe to
/// interpolate into generated statements.
pub fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Render text as a single-quoted SQL string literal.
///
/// Embedded single quotes are doubled. Used for the column-name literals in
/// the non-null probe query.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Reject identifiers that cannot be safely quoted.
///
/// Quoting handles quotes and punctuation, so validation only refuses what no
/// amount of quoting makes sensible: empty names, NUL bytes, and other
/// control characters.
pub fn validate_identifier(ident: &str) -> Result<()> {
    if ident.trim().is_empty() {
        return Err(Error::InvalidIdentifier {
            ident: ident.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if let Some(ch) = ident.chars().find(|c| c.is_control()) {
        return Err(Error::InvalidIdentifier {
            ident: ident.to_string(),
            reason: format!("contains control character {:?}", ch),
        });
    }
    Ok(())
}
