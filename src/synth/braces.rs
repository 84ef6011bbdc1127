use crate::parser::{brace_delta, code_lines};

/// Net unmatched `{` in `lines[from..]`.
pub fn open_brace_count<L: AsRef<str>>(lines: &[L], from: usize) -> usize {
    if from >= lines.len() {
        return 0;
    }
    let net: i32 = code_lines(&lines[from..]).iter().map(|c| brace_delta(c)).sum();
    net.max(0) as usize
}

/// Appends one `}` line per unmatched `{` opened from `from` onward.
pub fn close_open_braces<L: AsRef<str>>(lines: &[L], from: usize) -> Vec<String> {
    let open = open_brace_count(lines, from);
    let mut out: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
    for depth in (0..open).rev() {
        out.push(format!("{}}}", "    ".repeat(depth)));
    }
    out
}
