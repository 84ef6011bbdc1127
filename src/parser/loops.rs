use super::lines::{closing_brace, code_lines, leading_word};
use super::types::LoopInfo;

/// True if the code line opens a `for (...)` or `while (...)` loop.
///
/// A `} while (...)` line closes a do-while and is not a header.
pub fn is_loop_header(code: &str) -> bool {
    let t = code.trim_start();
    let word = leading_word(t);
    (word == "for" || word == "while") && t[word.len()..].trim_start().starts_with('(')
}

/// The initializer of a `for (init; cond; step)` header, if the line is one.
pub fn loop_init_clause(code: &str) -> Option<&str> {
    let t = code.trim_start();
    if leading_word(t) != "for" {
        return None;
    }
    let open = t.find('(')?;
    let rest = &t[open + 1..];
    let end = rest.find(';')?;
    Some(&rest[..end])
}

struct Pending {
    index: usize,
    line: usize,
    header: String,
    parens: i32,
    closed: bool,
}

struct Open {
    index: usize,
    line: usize,
    header: String,
    depth: i32,
    brace_line: usize,
}

/// Enumerates every loop whose header lies in `from..=to`, in source order.
///
/// This is the one place loop indices are assigned: headers get 0, 1, 2, ...
/// in the order they appear, regardless of nesting. Everything that refers to
/// a loop by index must go through this scan.
pub fn enumerate_loops<L: AsRef<str>>(lines: &[L], from: usize, to: usize) -> Vec<LoopInfo> {
    let codes = code_lines(lines);
    enumerate_loops_in(&codes, lines, from, to)
}

pub(crate) fn enumerate_loops_in<L: AsRef<str>>(
    codes: &[String],
    lines: &[L],
    from: usize,
    to: usize,
) -> Vec<LoopInfo> {
    let mut found: Vec<LoopInfo> = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut next_index = 0usize;
    let mut depth = 0i32;

    let last = to.min(codes.len().saturating_sub(1));
    if from > last {
        return found;
    }

    for i in from..=last {
        let code = &codes[i];
        let trimmed = code.trim();

        // A closed header followed by something other than `{` has a brace-less body.
        if let Some(p) = pending.as_ref() {
            if p.closed && !trimmed.is_empty() && !trimmed.starts_with('{') {
                if let Some(p) = pending.take() {
                    found.push(braceless(p));
                }
            }
        }

        if pending.is_none() && is_loop_header(code) {
            pending = Some(Pending {
                index: next_index,
                line: i,
                header: lines[i].as_ref().trim().to_string(),
                parens: 0,
                closed: false,
            });
            next_index += 1;
        }

        for ch in code.chars() {
            match ch {
                '(' | ')' => {
                    if let Some(p) = pending.as_mut().filter(|p| !p.closed) {
                        p.parens += if ch == '(' { 1 } else { -1 };
                        if p.parens == 0 {
                            p.closed = true;
                        }
                    }
                }
                ';' => {
                    if pending.as_ref().is_some_and(|p| p.closed) {
                        if let Some(p) = pending.take() {
                            found.push(braceless(p));
                        }
                    }
                }
                '{' => {
                    depth += 1;
                    if pending.as_ref().is_some_and(|p| p.closed) {
                        if let Some(p) = pending.take() {
                            stack.push(Open {
                                index: p.index,
                                line: p.line,
                                header: p.header,
                                depth,
                                brace_line: i,
                            });
                        }
                    }
                }
                '}' => {
                    if stack.last().is_some_and(|top| top.depth == depth) {
                        if let Some(open) = stack.pop() {
                            found.push(LoopInfo {
                                loop_index: open.index,
                                line_number: open.line,
                                end_line: Some(i),
                                brace_line: Some(open.brace_line),
                                header: open.header,
                                max_iter: None,
                            });
                        }
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }

    if let Some(p) = pending.take() {
        found.push(braceless(p));
    }
    found.extend(stack.into_iter().map(|open| LoopInfo {
        loop_index: open.index,
        line_number: open.line,
        end_line: None,
        brace_line: Some(open.brace_line),
        header: open.header,
        max_iter: None,
    }));

    found.sort_by_key(|l| l.loop_index);
    found
}

fn braceless(p: Pending) -> LoopInfo {
    LoopInfo {
        loop_index: p.index,
        line_number: p.line,
        end_line: None,
        brace_line: None,
        header: p.header,
        max_iter: None,
    }
}

/// Last line belonging to the function whose header is at `function_start`.
fn function_scan_end(codes: &[String], function_start: usize) -> usize {
    closing_brace(codes, function_start)
        .map(|(line, _)| line)
        .unwrap_or(codes.len().saturating_sub(1))
}

/// Loops of `all` that contain `target`, outermost first.
pub fn containing_loops(all: &[LoopInfo], target: usize) -> Vec<LoopInfo> {
    all.iter().filter(|l| l.contains(target)).cloned().collect()
}

/// Loops of the function starting at `function_start` that contain `target`, outermost first.
pub fn extract_loops<L: AsRef<str>>(
    lines: &[L],
    function_start: usize,
    target: usize,
) -> Vec<LoopInfo> {
    let codes = code_lines(lines);
    let end = function_scan_end(&codes, function_start);
    let all = enumerate_loops_in(&codes, lines, function_start, end);
    containing_loops(&all, target)
}
