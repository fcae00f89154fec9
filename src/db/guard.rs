use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Statements that can change data or schema. `EXEC` has no meaning in SQLite
/// but is kept so queries written for other engines are still refused.
const WRITE_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "EXEC", "EXECUTE", "CREATE", "TRUNCATE",
    "MERGE", "ATTACH", "DETACH", "PRAGMA", "VACUUM", "REINDEX", "GRANT", "REVOKE",
];

#[allow(clippy::expect_used)]
static WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("word pattern is valid"));

#[allow(clippy::expect_used)]
static COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)--[^\n]*|/\*.*?(?:\*/|$)").expect("comment pattern is valid")
});

/// Reject ad-hoc SQL that is not a plain read before it reaches the engine.
///
/// Keywords are matched on the raw text, so a write keyword hidden inside a
/// comment or string literal still rejects the query.
pub(crate) fn validate_read_only(sql: &str) -> Result<()> {
    if sql.trim().is_empty() {
        return Err(Error::RejectedQuery("query is empty".into()));
    }

    if let Some(word) = WORDS
        .find_iter(sql)
        .map(|m| m.as_str())
        .find(|w| WRITE_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(w)))
    {
        return Err(Error::RejectedQuery(format!(
            "{} statements are not allowed",
            word.to_ascii_uppercase()
        )));
    }

    let stripped = COMMENTS.replace_all(sql, " ");
    let body = stripped.trim_start_matches(|c: char| c == '(' || c.is_whitespace());
    let leading = WORDS
        .find(body)
        .filter(|m| m.start() == 0)
        .map(|m| m.as_str())
        .unwrap_or("");
    if !leading.eq_ignore_ascii_case("SELECT") && !leading.eq_ignore_ascii_case("WITH") {
        return Err(Error::RejectedQuery(
            "only SELECT statements are allowed".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod guard_tests;
