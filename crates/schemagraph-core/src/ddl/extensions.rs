//! Spanner-style clauses sqlparser does not read
//!
//! These are stripped from the statement text before parsing and handed to
//! the lowering step separately:
//!
//! ```sql
//! CREATE TABLE albums (...) PRIMARY KEY (singer_id, album_id),
//!   INTERLEAVE IN PARENT singers ON DELETE CASCADE;
//! CREATE UNIQUE NULL_FILTERED INDEX idx ON albums (title) STORING (year),
//!   INTERLEAVE IN singers;
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{Interleave, OnDelete};

static CREATE_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CREATE\s+(?:OR\s+REPLACE\s+)?TABLE\b").unwrap());

static TAIL_PRIMARY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*PRIMARY\s+KEY\s*\(([^)]*)\)").unwrap());

static INTERLEAVE_PARENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is),?\s*INTERLEAVE\s+IN\s+PARENT\s+([^\s,;()]+)(?:\s+ON\s+DELETE\s+(CASCADE|NO\s+ACTION))?",
    )
    .unwrap()
});

static CREATE_INDEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^CREATE\s+(?:UNIQUE\s+)?(?:NULL_FILTERED\s+)?INDEX\b").unwrap()
});

static NULL_FILTERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNULL_FILTERED\s+").unwrap());

static STORING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\s*\bSTORING\s*\(([^)]*)\)").unwrap());

static INDEX_INTERLEAVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\s*,\s*INTERLEAVE\s+IN\s+([^\s,;()]+)").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableExtensions {
    /// Primary key declared after the column list
    pub primary_key: Vec<String>,
    pub interleave: Option<Interleave>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexExtensions {
    pub null_filtered: bool,
    pub storing: Vec<String>,
    pub interleave: Option<String>,
}

/// Strip the table tail clauses from a `CREATE TABLE` statement.
///
/// Statements of any other kind are returned unchanged.
pub fn extract_table_extensions(stmt: &str) -> (String, TableExtensions) {
    let mut ext = TableExtensions::default();
    if !CREATE_TABLE_RE.is_match(stmt) {
        return (stmt.to_string(), ext);
    }
    let Some(close) = column_list_end(stmt) else {
        return (stmt.to_string(), ext);
    };

    let (head, tail) = stmt.split_at(close + 1);
    let mut tail = tail.to_string();

    if let Some(caps) = TAIL_PRIMARY_KEY_RE.captures(&tail) {
        ext.primary_key = split_column_list(&caps[1]);
        let end = caps.get(0).map_or(0, |m| m.end());
        tail.replace_range(..end, "");
    }

    if let Some(caps) = INTERLEAVE_PARENT_RE.captures(&tail) {
        let on_delete = match caps.get(2) {
            Some(m) if m.as_str().eq_ignore_ascii_case("cascade") => OnDelete::Cascade,
            _ => OnDelete::NoAction,
        };
        ext.interleave = Some(Interleave {
            parent: unquote(&caps[1]).to_string(),
            on_delete,
        });
        let clause = caps.get(0).map_or(0..0, |m| m.range());
        tail.replace_range(clause, "");
    }

    (format!("{head}{tail}"), ext)
}

/// Strip `NULL_FILTERED`, `STORING (...)` and `, INTERLEAVE IN t` from a
/// `CREATE INDEX` statement.
pub fn extract_index_extensions(stmt: &str) -> (String, IndexExtensions) {
    let mut ext = IndexExtensions::default();
    if !CREATE_INDEX_RE.is_match(stmt) {
        return (stmt.to_string(), ext);
    }

    let mut cleaned = stmt.to_string();

    if NULL_FILTERED_RE.is_match(&cleaned) {
        ext.null_filtered = true;
        cleaned = NULL_FILTERED_RE.replace(&cleaned, "").into_owned();
    }

    if let Some(caps) = STORING_RE.captures(&cleaned) {
        ext.storing = split_column_list(&caps[1]);
        cleaned = STORING_RE.replace(&cleaned, "").into_owned();
    }

    if let Some(caps) = INDEX_INTERLEAVE_RE.captures(&cleaned) {
        ext.interleave = Some(unquote(&caps[1]).to_string());
        cleaned = INDEX_INTERLEAVE_RE.replace(&cleaned, "").into_owned();
    }

    (cleaned, ext)
}

/// Byte index of the `)` closing the first parenthesised list
fn column_list_end(stmt: &str) -> Option<usize> {
    let bytes = stmt.as_bytes();
    let open = stmt.find('(')?;
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

fn split_column_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|part| {
            let part = part.trim();
            let lowered = part.to_ascii_lowercase();
            let name = if lowered.ends_with(" desc") || lowered.ends_with(" asc") {
                part.rsplit_once(char::is_whitespace).map_or(part, |(name, _)| name)
            } else {
                part
            };
            unquote(name.trim()).to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn unquote(ident: &str) -> &str {
    ident.trim_matches(|c| matches!(c, '`' | '"' | '[' | ']'))
}
