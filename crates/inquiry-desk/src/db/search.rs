//! Case-insensitive substring search over text columns.
//!
//! SQLite's built-in `LIKE` folds ASCII letters only. Every connection gets
//! a `fold` function that lower-cases with Unicode rules, and search
//! predicates compare folded column values against a folded pattern.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the SQL case-folding function.
pub const FOLD_FUNCTION: &str = "fold";

/// Registers [`FOLD_FUNCTION`] on `conn`. NULL folds to NULL.
pub fn register(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| fold(&v)))
        },
    )
}

pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// `LIKE` pattern matching `needle` anywhere, case-folded, with `%`, `_`
/// and `\` escaped so they match literally.
pub fn contains_pattern(needle: &str) -> String {
    let folded = fold(needle);
    let mut pattern = String::with_capacity(folded.len() + 2);
    pattern.push('%');
    for c in folded.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Builds `(fold(col1) LIKE ?n ESCAPE '\' OR fold(col2) LIKE ?n ...)`.
///
/// All columns share one positional parameter, bound to a
/// [`contains_pattern`].
pub fn any_column_contains(columns: &[&str], param_index: usize) -> String {
    let clauses: Vec<String> = columns
        .iter()
        .map(|col| {
            format!(
                "{}({}) LIKE ?{} ESCAPE '\\'",
                FOLD_FUNCTION, col, param_index
            )
        })
        .collect();
    format!("({})", clauses.join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_folds_and_escapes() {
        assert_eq!(contains_pattern("ÅNGSTRÖM"), "%ångström%");
        assert_eq!(contains_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn test_any_column_contains_shares_one_param() {
        assert_eq!(
            any_column_contains(&["name", "email"], 3),
            "(fold(name) LIKE ?3 ESCAPE '\\' OR fold(email) LIKE ?3 ESCAPE '\\')"
        );
    }

    #[test]
    fn test_fold_function_registered() {
        let conn = Connection::open_in_memory().unwrap();
        register(&conn).unwrap();
        let folded: String = conn
            .query_row("SELECT fold('ÉLODIE Zoë')", [], |r| r.get(0))
            .unwrap();
        assert_eq!(folded, "élodie zoë");
        let null: Option<String> = conn
            .query_row("SELECT fold(NULL)", [], |r| r.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
