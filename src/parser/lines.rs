/// How far a statement may run past the probed line before we give up looking for its `;`.
pub const STATEMENT_LOOKAHEAD: usize = 10;

/// How far back a continuation line may be from the start of its statement.
pub const STATEMENT_LOOKBACK: usize = 10;

/// Code-only view of every line.
///
/// Comments and preprocessor directives are blanked out with spaces so byte
/// offsets into the returned strings are valid offsets into the originals.
/// Block comments may span lines.
pub fn code_lines<L: AsRef<str>>(lines: &[L]) -> Vec<String> {
    let mut in_block = false;
    lines
        .iter()
        .map(|line| blank_comments(line.as_ref(), &mut in_block))
        .collect()
}

/// Code-only view of a single line, assuming it does not start inside a block comment.
pub fn code_of(line: &str) -> String {
    blank_comments(line, &mut false)
}

fn blank_comments(line: &str, in_block: &mut bool) -> String {
    if !*in_block && line.trim_start().starts_with('#') {
        return " ".repeat(line.len());
    }

    let mut code = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut in_line_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            push_blank(&mut code, ch);
            continue;
        }
        if *in_block {
            push_blank(&mut code, ch);
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                code.push(' ');
                *in_block = false;
            }
            continue;
        }
        if ch == '/' {
            match chars.peek() {
                Some('/') => {
                    in_line_comment = true;
                    push_blank(&mut code, ch);
                    continue;
                }
                Some('*') => {
                    chars.next();
                    code.push_str("  ");
                    *in_block = true;
                    continue;
                }
                _ => {}
            }
        }
        code.push(ch);
    }

    code
}

fn push_blank(code: &mut String, ch: char) {
    for _ in 0..ch.len_utf8() {
        code.push(' ');
    }
}

/// Net `{` minus `}` on a code-only line.
pub fn brace_delta(code: &str) -> i32 {
    code.chars().fold(0, |delta, ch| match ch {
        '{' => delta + 1,
        '}' => delta - 1,
        _ => delta,
    })
}

/// Net `(` minus `)` on a code-only line.
pub fn paren_delta(code: &str) -> i32 {
    code.chars().fold(0, |delta, ch| match ch {
        '(' => delta + 1,
        ')' => delta - 1,
        _ => delta,
    })
}

/// Leading whitespace of a line.
pub fn indent_of(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Finds the brace that closes the first block opened at or after `from`.
///
/// Returns `(line, byte offset)` of that `}`; `None` if the block never closes.
pub fn closing_brace(codes: &[String], from: usize) -> Option<(usize, usize)> {
    let mut depth = 0i32;
    let mut opened = false;

    for (i, code) in codes.iter().enumerate().skip(from) {
        for (pos, ch) in code.char_indices() {
            match ch {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' if opened => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((i, pos));
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Leading identifier-ish word of a trimmed code fragment.
pub fn leading_word(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// True if `ident` occurs in `text` as a whole identifier.
pub fn references_identifier(text: &str, ident: &str) -> bool {
    let bytes = text.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    text.match_indices(ident).any(|(pos, _)| {
        let before_ok = pos == 0 || !is_word(bytes[pos - 1]);
        let after = pos + ident.len();
        let after_ok = after >= bytes.len() || !is_word(bytes[after]);
        before_ok && after_ok
    })
}

const CONTROL_WORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default",
];

/// Whether the statement on this code line carries on to the next line.
pub fn continues_onto_next(code: &str) -> bool {
    let t = code.trim();
    if t.is_empty() || t.ends_with([';', '{', '}']) {
        return false;
    }
    if paren_delta(t) > 0 {
        return true;
    }
    if t.ends_with([
        ',', '+', '-', '*', '/', '=', '&', '|', '?', ':', '<', '>', '(', '%',
    ]) {
        return true;
    }
    let first = leading_word(t.trim_start_matches(|c: char| c == '}' || c.is_whitespace()));
    !CONTROL_WORDS.contains(&first) && has_assignment(t)
}

/// True if `code` holds an assignment `=`, not one of `==`, `!=`, `<=` or `>=`.
fn has_assignment(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'=' || bytes.get(i + 1) == Some(&b'=') {
            return false;
        }
        match i.checked_sub(1).map(|p| bytes[p]) {
            Some(b'=') | Some(b'!') => false,
            // `<<=` and `>>=` still assign
            Some(prev @ (b'<' | b'>')) => i >= 2 && bytes[i - 2] == prev,
            _ => true,
        }
    })
}

/// First line of the statement that `line` belongs to.
pub fn statement_start(codes: &[String], line: usize) -> usize {
    let mut start = line.min(codes.len().saturating_sub(1));
    while start > 0 && line - start < STATEMENT_LOOKBACK && continues_onto_next(&codes[start - 1]) {
        start -= 1;
    }
    start
}

/// Line holding the `;` that terminates the statement starting at `line`.
///
/// Falls back to `line` itself when no terminator is found within the
/// lookahead or a block boundary is crossed first.
pub fn statement_end(codes: &[String], line: usize) -> usize {
    let Some(first) = codes.get(line) else {
        return line;
    };
    let t = first.trim_end();
    if t.ends_with(';') || t.ends_with('{') || t.ends_with('}') {
        return line;
    }

    let last = (line + STATEMENT_LOOKAHEAD).min(codes.len().saturating_sub(1));
    for (i, code) in codes.iter().enumerate().take(last + 1).skip(line + 1) {
        let t = code.trim_end();
        if t.ends_with(';') {
            return i;
        }
        if t.ends_with('{') || t.ends_with('}') {
            break;
        }
    }
    line
}

/// Splits a code fragment on `;` outside parentheses.
pub fn split_statements(code: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (pos, ch) in code.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ';' if depth <= 0 => {
                parts.push(&code[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    if !code[start..].trim().is_empty() {
        parts.push(&code[start..]);
    }
    parts
}
