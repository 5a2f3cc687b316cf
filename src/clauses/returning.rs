use std::sync::OnceLock;

use regex::Regex;

/// OUT bind slot that receives the inserted row's physical identifier.
pub const ROW_ID_BIND: &str = ":ORARS_ROWID";

/// Sentinel clause. An executed statement containing it gets [`ROW_ID_BIND`] bound.
pub const RETURNING_ROW_ID: &str = "RETURNING ROWID INTO :ORARS_ROWID";

/// Maximum length of the row identifier bind slot.
pub const ROW_ID_MAX_LENGTH: i32 = 255;

/// Appends the row identifier returning clause to an INSERT statement.
pub fn with_row_id_returning(sql: &str) -> String {
    let trimmed = sql.trim_end().trim_end_matches(';').trim_end();
    format!("{trimmed} {RETURNING_ROW_ID}")
}

/// Returns true if the statement carries the row identifier returning clause.
pub fn captures_row_id(sql: &str) -> bool {
    sql.contains(RETURNING_ROW_ID)
}

/// Extracts the target table of an INSERT, e.g. `hr.users` or `"Users"`.
/// Returns `None` for anything that is not an INSERT.
pub fn insert_target_table(sql: &str) -> Option<String> {
    static COMMENTS: OnceLock<Regex> = OnceLock::new();
    static INTO_TABLE: OnceLock<Regex> = OnceLock::new();

    let comments = COMMENTS.get_or_init(|| compile(r"(?s)/\*.*?\*/|--[^\n]*"));
    let into_table = INTO_TABLE.get_or_init(|| {
        compile(r#"(?is)\binto\s+("?[\w$#]+"?(?:\."?[\w$#]+"?)?)"#)
    });

    let stripped = comments.replace_all(sql, "");
    if !stripped.trim_start().to_uppercase().starts_with("INSERT") {
        return None;
    }

    into_table
        .captures(&stripped)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid clause pattern {pattern}: {e}"))
}
