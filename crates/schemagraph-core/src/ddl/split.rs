//! Statement splitting

/// Cut SQL text into individual CREATE/ALTER statements.
///
/// A statement is kept when its first word is `CREATE` or `ALTER`; leading
/// whitespace and comments are skipped when looking for that word. It runs
/// to the next `;` at nesting depth zero, outside string literals and
/// comments, or to the end of input. Other statements (`SET ...`,
/// `GRANT ...`) are skipped whole.
pub fn split_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut start: Option<usize> = None;
    // Waiting for the first word of the next statement
    let mut at_boundary = true;
    let mut depth = 0usize;
    let mut i = 0;

    while i < len {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                at_boundary = false;
                i = skip_quoted(bytes, i, quote);
            }
            b'$' => {
                at_boundary = false;
                // Dollar-quoted string ($$...$$ or $tag$...$tag$)
                if let Some(tag_end) = find_dollar_tag_end(sql, i) {
                    let tag = &sql[i..=tag_end];
                    i = tag_end + 1;
                    match sql[i..].find(tag) {
                        Some(close_pos) => i += close_pos + tag.len(),
                        None => i = len,
                    }
                } else {
                    i += 1;
                }
            }
            b'-' if i + 1 < len && bytes[i + 1] == b'-' => {
                i = skip_line(bytes, i);
            }
            b'#' => {
                i = skip_line(bytes, i);
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                i += 2;
                while i + 1 < len && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(len);
            }
            b'(' => {
                at_boundary = false;
                depth += 1;
                i += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b';' if depth == 0 => {
                if let Some(from) = start.take() {
                    push_statement(&mut statements, &sql[from..i]);
                }
                at_boundary = true;
                i += 1;
            }
            c if at_boundary && c.is_ascii_alphabetic() => {
                at_boundary = false;
                let end = word_end(bytes, i);
                let word = &sql[i..end];
                if word.eq_ignore_ascii_case("CREATE") || word.eq_ignore_ascii_case("ALTER") {
                    start = Some(i);
                }
                i = end;
            }
            c => {
                if !c.is_ascii_whitespace() {
                    at_boundary = false;
                }
                i += 1;
            }
        }
    }

    if let Some(from) = start {
        push_statement(&mut statements, &sql[from..]);
    }

    statements
}

fn push_statement<'a>(statements: &mut Vec<&'a str>, stmt: &'a str) {
    let stmt = stmt.trim();
    if !stmt.is_empty() {
        statements.push(stmt);
    }
}

fn word_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

/// Skip a quoted literal or identifier; a doubled quote is an escape
fn skip_quoted(bytes: &[u8], open: usize, quote: u8) -> usize {
    let len = bytes.len();
    let mut i = open + 1;
    while i < len {
        if bytes[i] == b'\\' && quote == b'\'' {
            i += 2;
        } else if bytes[i] == quote {
            i += 1;
            if i < len && bytes[i] == quote {
                i += 1;
            } else {
                return i;
            }
        } else {
            i += 1;
        }
    }
    len
}

fn skip_line(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

/// Find the end of a dollar-quote tag starting at position `start`.
/// Returns the index of the closing `$` if a valid tag is found.
fn find_dollar_tag_end(sql: &str, start: usize) -> Option<usize> {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut i = start + 1;
    if i < len && bytes[i] == b'$' {
        return Some(i);
    }
    while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i < len && bytes[i] == b'$' {
        Some(i)
    } else {
        None
    }
}
