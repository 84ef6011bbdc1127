use super::braces::close_open_braces;
use super::capping::plan_loop_caps;
use super::edits::LineEdits;
use super::params::generate_function_call;
use super::shadow::plan_shadow_variable;
use super::visualize::{visualize_into, Visualization, FRAG_COORD, OUTPUT_COLOR};
use crate::parser::{
    code_lines, containing_loops, enumerate_loops, find_entry_function, indent_of, EntrySignature,
    FunctionInfo, GlslType, LoopInfo, VarInfo, RETURN_VALUE_NAME,
};
use std::collections::HashMap;

/// Header of every synthesized entry function.
pub const ENTRY_HEADER: &str = "void mainImage(out vec4 fragColor, in vec2 fragCoord)";

/// Local holding a helper's result inside a synthesized entry function.
pub const VALUE_NAME: &str = "_dbgValue";

const BODY_INDENT: &str = "    ";

/// Where a probe sits and which loops surround it.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSite<'a> {
    pub var: &'a VarInfo,
    /// First line of the probed statement.
    pub line: usize,
    /// Line terminating the probed statement.
    pub statement_end: usize,
    /// Every loop of the enclosing function, from the canonical scan.
    pub loops: &'a [LoopInfo],
}

impl ProbeSite<'_> {
    pub fn containing(&self) -> Vec<LoopInfo> {
        containing_loops(self.loops, self.line)
    }

    /// Last original line kept: the close of the outermost containing loop,
    /// else the end of the probed statement.
    pub fn cut_line(&self) -> usize {
        self.containing()
            .first()
            .and_then(|l| l.end_line)
            .unwrap_or(self.statement_end)
    }

    /// Line whose indentation the appended statements copy.
    fn anchor_line(&self) -> usize {
        self.containing()
            .first()
            .map_or(self.line, |l| l.line_number)
    }
}

fn owned<L: AsRef<str>>(lines: &[L]) -> Vec<String> {
    lines.iter().map(|l| l.as_ref().to_string()).collect()
}

fn indented(indent: &str, statements: Vec<String>) -> impl Iterator<Item = String> + '_ {
    statements.into_iter().map(move |s| format!("{}{}", indent, s))
}

/// Source lines before `before`, minus the entry function if it lies there.
fn debug_prelude<L: AsRef<str>>(lines: &[L], before: usize) -> Vec<String> {
    let before = before.min(lines.len());
    let codes = code_lines(lines);
    let skip = find_entry_function(&codes)
        .filter(|entry| entry.start < before)
        .map(|entry| entry.start..=entry.end);

    lines[..before]
        .iter()
        .enumerate()
        .filter(|(i, _)| !skip.as_ref().is_some_and(|r| r.contains(i)))
        .map(|(_, l)| l.as_ref().to_string())
        .collect()
}

fn word_position(text: &str, word: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    text.match_indices(word).map(|(pos, _)| pos).find(|&pos| {
        let after = pos + word.len();
        (pos == 0 || !is_word(bytes[pos - 1])) && (after >= bytes.len() || !is_word(bytes[after]))
    })
}

/// Replaces the declared return type on a header line.
pub fn rewrite_return_type(header: &str, old: &str, new: GlslType) -> String {
    match word_position(header, old) {
        Some(pos) => format!("{}{}{}", &header[..pos], new, &header[pos + old.len()..]),
        None => header.to_string(),
    }
}

/// Turns `return expr;` into a declaration of the reserved return name.
pub fn rewrite_return(line: &str, var: &VarInfo) -> String {
    match word_position(line, "return") {
        Some(pos) => format!(
            "{}{} {} = {}",
            &line[..pos],
            var.ty,
            var.name,
            line[pos + "return".len()..].trim_start()
        ),
        None => line.to_string(),
    }
}

/// The function's lines up to the cut, with return rewrite, caps, and shadow applied.
fn probe_body<L: AsRef<str>>(
    lines: &[L],
    function: &FunctionInfo,
    site: &ProbeSite<'_>,
    caps: &HashMap<usize, u32>,
    retype: Option<GlslType>,
) -> (Vec<String>, Option<String>) {
    let cut = site.cut_line().min(function.end);
    let mut edits = LineEdits::new();

    if let Some(ty) = retype {
        let header = rewrite_return_type(lines[function.start].as_ref(), &function.return_type, ty);
        edits.replace(function.start, header);
    }
    if site.var.name == RETURN_VALUE_NAME {
        let rewritten = rewrite_return(edits.text_of(lines, site.line), site.var);
        edits.replace(site.line, rewritten);
    }

    let kept: Vec<LoopInfo> = site
        .loops
        .iter()
        .filter(|l| l.line_number <= cut)
        .cloned()
        .collect();
    plan_loop_caps(&mut edits, lines, &kept, caps);
    let shadow = plan_shadow_variable(
        &mut edits,
        lines,
        site.statement_end,
        site.var,
        &site.containing(),
    );

    (edits.apply_range(lines, function.start..=cut), shadow)
}

fn entry_calling_helper(
    function: &FunctionInfo,
    ty: GlslType,
    custom: &HashMap<usize, String>,
    viz: &Visualization,
) -> Vec<String> {
    let (call, setup) = generate_function_call(function, custom);
    let mut out = vec![format!("{} {{", ENTRY_HEADER)];
    out.extend(indented(BODY_INDENT, setup));
    out.push(format!("{}{} {} = {};", BODY_INDENT, ty, VALUE_NAME, call));
    out.extend(indented(
        BODY_INDENT,
        visualize_into(OUTPUT_COLOR, FRAG_COORD, ty, VALUE_NAME, viz),
    ));
    out.push("}".to_string());
    out
}

/// Probe outside any function: a minimal entry function holding just that line.
pub fn wrap_one_liner_for_debugging<L: AsRef<str>>(
    lines: &[L],
    debug_line: usize,
    line: &str,
    var: &VarInfo,
    viz: &Visualization,
) -> String {
    let mut out = debug_prelude(lines, debug_line);
    out.push(format!("{} {{", ENTRY_HEADER));
    out.push(format!("{}{}", BODY_INDENT, line.trim()));
    out.extend(indented(
        BODY_INDENT,
        visualize_into(OUTPUT_COLOR, FRAG_COORD, var.ty, &var.name, viz),
    ));
    out.push("}".to_string());
    out.join("\n")
}

/// Probe inside a helper: the helper is cut at the probe, retyped to return
/// the probed value, and called from a fresh entry function.
pub fn wrap_function_for_debugging<L: AsRef<str>>(
    lines: &[L],
    function: &FunctionInfo,
    site: &ProbeSite<'_>,
    caps: &HashMap<usize, u32>,
    custom: &HashMap<usize, String>,
    viz: &Visualization,
) -> String {
    let mut out = debug_prelude(lines, function.start);
    let (mut body, shadow) = probe_body(lines, function, site, caps, Some(site.var.ty));

    let value = shadow.unwrap_or_else(|| site.var.name.clone());
    let indent = indent_of(lines[site.anchor_line()].as_ref());
    body.push(format!("{}return {};", indent, value));
    out.extend(close_open_braces(&body, 0));

    out.push(String::new());
    out.extend(entry_calling_helper(function, site.var.ty, custom, viz));
    out.join("\n")
}

/// The helper kept whole (apart from loop caps) and its real return value shown.
///
/// `None` when the return type cannot be visualized.
pub fn wrap_full_function_for_debugging<L: AsRef<str>>(
    lines: &[L],
    function: &FunctionInfo,
    caps: &HashMap<usize, u32>,
    custom: &HashMap<usize, String>,
    viz: &Visualization,
) -> Option<String> {
    let ty = GlslType::from_name(&function.return_type)?;
    let mut out = debug_prelude(lines, function.start);

    let loops = enumerate_loops(lines, function.start, function.end);
    let mut edits = LineEdits::new();
    plan_loop_caps(&mut edits, lines, &loops, caps);
    let body = edits.apply_range(lines, function.start..=function.end);
    out.extend(close_open_braces(&body, 0));

    out.push(String::new());
    out.extend(entry_calling_helper(function, ty, custom, viz));
    Some(out.join("\n"))
}

/// Probe inside the entry function: it is cut after the probe and writes the
/// probed value into its own output color.
pub fn truncate_main_image<L: AsRef<str>>(
    lines: &[L],
    function: &FunctionInfo,
    site: &ProbeSite<'_>,
    caps: &HashMap<usize, u32>,
    viz: &Visualization,
) -> String {
    let sig = EntrySignature::of(function);
    let mut out = owned(&lines[..function.start]);
    let (mut body, shadow) = probe_body(lines, function, site, caps, None);

    let value = shadow.unwrap_or_else(|| site.var.name.clone());
    let indent = indent_of(lines[site.anchor_line()].as_ref());
    body.extend(indented(
        indent,
        visualize_into(&sig.output, &sig.coord, site.var.ty, &value, viz),
    ));
    out.extend(close_open_braces(&body, 0));
    out.join("\n")
}
