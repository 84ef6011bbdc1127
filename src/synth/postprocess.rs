use super::visualize::{normalize_expr, step_statement, NormalizeMode, Visualization};
use crate::parser::{closing_brace, code_lines, find_entry_function, indent_of, EntrySignature};

/// Splices normalize/step statements in front of the entry function's closing brace.
///
/// `None` when both are off, or the entry function is missing or never closes.
pub fn apply_output_post_processing(
    program: &str,
    normalize: NormalizeMode,
    step_edge: Option<f32>,
) -> Option<String> {
    let viz = Visualization::new(normalize, step_edge);
    if viz.is_identity() {
        return None;
    }

    let lines: Vec<&str> = program.lines().collect();
    let codes = code_lines(&lines);
    let entry = find_entry_function(&codes)?;
    let (close_line, close_pos) = closing_brace(&codes, entry.start)?;
    let output = EntrySignature::of(&entry).output;

    let header_indent = indent_of(lines[entry.start]);
    let body_indent = format!("{}    ", header_indent);
    let mut statements = Vec::new();
    if normalize != NormalizeMode::Off {
        let rgb = format!("{}.rgb", output);
        statements.push(format!("{} = {};", rgb, normalize_expr(&rgb, normalize)));
    }
    if let Some(edge) = step_edge {
        statements.push(step_statement(&output, edge));
    }

    let mut out: Vec<String> = lines[..close_line].iter().map(|l| l.to_string()).collect();
    let closing = lines[close_line];
    let head = &closing[..close_pos];
    if !head.trim().is_empty() {
        out.push(head.trim_end().to_string());
    }
    out.extend(statements.into_iter().map(|s| format!("{}{}", body_indent, s)));
    out.push(format!("{}{}", header_indent, &closing[close_pos..]));
    out.extend(lines[close_line + 1..].iter().map(|l| l.to_string()));

    Some(out.join("\n"))
}
