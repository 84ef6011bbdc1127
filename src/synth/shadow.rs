use super::edits::LineEdits;
use crate::parser::{indent_of, LoopInfo, VarInfo};

pub fn shadow_name(var: &VarInfo) -> String {
    format!("_dbgShadow_{}", var.name)
}

/// Plans the shadow copy of a probe that sits inside loops.
///
/// The shadow is declared before the outermost containing loop and assigned
/// right after `probe_end`, the last line of the probed statement. Returns the
/// shadow's name, or `None` when there is no containing loop, the type has
/// no zero value to start from, or either line is out of range.
pub fn plan_shadow_variable<L: AsRef<str>>(
    edits: &mut LineEdits,
    lines: &[L],
    probe_end: usize,
    var: &VarInfo,
    containing: &[LoopInfo],
) -> Option<String> {
    let outer = containing.first()?;
    let zero = var.ty.zero_value()?;
    let outer_indent = indent_of(lines.get(outer.line_number)?.as_ref());
    let probe_indent = indent_of(lines.get(probe_end)?.as_ref());
    let name = shadow_name(var);

    edits.insert_before(
        outer.line_number,
        format!("{}{} {} = {};", outer_indent, var.ty, name, zero),
    );
    edits.insert_after(probe_end, format!("{}{} = {};", probe_indent, name, var.name));
    Some(name)
}

/// Standalone form of [`plan_shadow_variable`]: returns the rewritten lines.
///
/// Without containing loops the input comes back unchanged.
pub fn insert_shadow_variable<L: AsRef<str>>(
    lines: &[L],
    debug_line: usize,
    var: &VarInfo,
    containing: &[LoopInfo],
) -> (Vec<String>, Option<String>) {
    let mut edits = LineEdits::new();
    let shadow = plan_shadow_variable(&mut edits, lines, debug_line, var, containing);
    (edits.apply(lines), shadow)
}
