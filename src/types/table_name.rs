/// A table name resolved against its owning schema, normalized for catalog lookups.
///
/// Catalogs store unquoted identifiers uppercased, so unquoted parts are
/// uppercased and quoted parts are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedTable {
    pub owner: String,
    pub name: String,
}

impl QualifiedTable {
    /// Parses `owner.table` or a bare `table`, which belongs to `default_owner`.
    pub fn parse(table: &str, default_owner: &str) -> Self {
        let (owner, name) = match table.split_once('.') {
            Some((owner, name)) => (owner, name),
            None => (default_owner, table),
        };
        Self {
            owner: normalize(owner),
            name: normalize(name),
        }
    }

    /// Prepends the table prefix unless the name already starts with it,
    /// compared case-insensitively. The prefix is uppercased for names that
    /// hold no lowercase letters.
    pub fn apply_prefix(&mut self, prefix: &str) {
        if prefix.is_empty() || self.name.to_uppercase().starts_with(&prefix.to_uppercase()) {
            return;
        }
        let prefix = if self.name.chars().any(char::is_lowercase) {
            prefix.to_string()
        } else {
            prefix.to_uppercase()
        };
        self.name.insert_str(0, &prefix);
    }

    /// Returns `"OWNER"."NAME"`, suitable for embedding in SQL text.
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_identifier(&self.owner), quote_identifier(&self.name))
    }
}

/// Unquoted identifiers fold to uppercase; quoted ones keep their case.
fn normalize(part: &str) -> String {
    let part = part.trim();
    match part
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(quoted) => quoted.to_string(),
        None => part.to_uppercase(),
    }
}

/// Wraps an identifier in double quotes, doubling any embedded quote.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
