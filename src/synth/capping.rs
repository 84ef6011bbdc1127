use super::edits::LineEdits;
use crate::parser::{enumerate_loops, indent_of, LoopInfo};
use std::collections::HashMap;

/// Counter variable guarding the loop with index `loop_index`.
pub fn counter_name(loop_index: usize) -> String {
    format!("_dbgIter{}", loop_index)
}

/// Plans a counter before each capped loop and a break guard as its first statement.
///
/// Loops without a brace-delimited body, or absent from `caps`, are left alone.
pub fn plan_loop_caps<L: AsRef<str>>(
    edits: &mut LineEdits,
    lines: &[L],
    loops: &[LoopInfo],
    caps: &HashMap<usize, u32>,
) {
    for info in loops {
        let (Some(max), Some(brace_line)) = (caps.get(&info.loop_index), info.brace_line) else {
            continue;
        };
        let counter = counter_name(info.loop_index);
        let indent = indent_of(lines[info.line_number].as_ref());
        edits.insert_before(info.line_number, format!("{}int {} = 0;", indent, counter));
        edits.insert_after_brace(
            brace_line,
            format!("{}    if ({}++ > {}) break;", indent, counter, max),
        );
    }
}

/// Caps the loops found scanning from `from_line` to the end.
///
/// Loop indices come from [`enumerate_loops`], the same scan that
/// containment uses, so a cap always lands on the loop the caller meant.
pub fn cap_loop_iterations<L: AsRef<str>>(
    lines: &[L],
    from_line: usize,
    caps: &HashMap<usize, u32>,
) -> Vec<String> {
    if caps.is_empty() || lines.is_empty() {
        return lines.iter().map(|l| l.as_ref().to_string()).collect();
    }
    let loops = enumerate_loops(lines, from_line, lines.len() - 1);
    let mut edits = LineEdits::new();
    plan_loop_caps(&mut edits, lines, &loops, caps);
    edits.apply(lines)
}
