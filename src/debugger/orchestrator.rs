use super::request::DebugRequest;
use crate::parser::{
    build_variable_type_map, code_lines, detect_variable_and_type, enumerate_loops_in,
    find_enclosing_function, statement_end, statement_start, FunctionInfo, VarInfo,
    ENTRY_FUNCTION, RETURN_VALUE_NAME,
};
use crate::synth::{
    truncate_main_image, wrap_full_function_for_debugging, wrap_function_for_debugging,
    wrap_one_liner_for_debugging, ProbeSite,
};
use std::collections::HashMap;

/// Which program shape a probe produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugPath {
    EntryTruncation,
    HelperWrap,
    FullHelper,
    OneLiner,
}

/// Synthesizes the debug program for one line.
///
/// `line_content` is the editor's view of the line; the split source is
/// authoritative and `line_content` is only used when `debug_line` is out of range.
pub fn modify_shader_for_debugging(
    source: &str,
    debug_line: usize,
    line_content: &str,
    loop_max_iterations: &HashMap<usize, u32>,
) -> Option<String> {
    let request = DebugRequest {
        source: source.to_string(),
        debug_line,
        line_content: line_content.to_string(),
        loop_max_iterations: loop_max_iterations.clone(),
        ..DebugRequest::default()
    };
    debug_shader(&request)
}

/// Full form of [`modify_shader_for_debugging`] honoring every request option.
pub fn debug_shader(request: &DebugRequest) -> Option<String> {
    let lines: Vec<&str> = request.source.lines().collect();
    let viz = request.visualization();

    let Some(&line) = lines.get(request.debug_line) else {
        log::debug!(
            "line {} is past the end of the source ({} lines), using editor line content",
            request.debug_line,
            lines.len()
        );
        let var = detect_variable_and_type(
            &request.line_content,
            &build_variable_type_map(&lines, lines.len(), None),
            None,
        )?;
        return Some(wrap_one_liner_for_debugging(
            &lines,
            lines.len(),
            &request.line_content,
            &var,
            &viz,
        ));
    };

    if !request.line_content.is_empty() && request.line_content.trim() != line.trim() {
        log::debug!(
            "editor line content differs from source line {}, using source",
            request.debug_line
        );
    }

    let function = find_enclosing_function(&lines, request.debug_line);
    let path = choose_path(function.as_ref(), request.debug_line);
    log::debug!("line {} takes the {:?} path", request.debug_line, path);

    match (path, function) {
        (DebugPath::OneLiner, _) | (_, None) => {
            let env = build_variable_type_map(&lines, request.debug_line, None);
            let Some(var) = detect_variable_and_type(line, &env, None) else {
                log::trace!("nothing to debug on line {}", request.debug_line);
                return None;
            };
            Some(wrap_one_liner_for_debugging(
                &lines,
                request.debug_line,
                line,
                &var,
                &viz,
            ))
        }
        (DebugPath::FullHelper, Some(function)) => wrap_full_function_for_debugging(
            &lines,
            &function,
            &request.loop_max_iterations,
            &request.custom_parameters,
            &viz,
        ),
        (path, Some(function)) => {
            let codes = code_lines(&lines);
            // Loop boundaries come first; they are dropped if the line does not classify.
            let loops = enumerate_loops_in(&codes, &lines, function.start, function.end);

            let start = statement_start(&codes, request.debug_line).max(function.start);
            let env = build_variable_type_map(&lines, start, Some(&function));
            let return_type = Some(function.return_type.as_str());
            let Some(var) = detect_variable_and_type(lines[start], &env, return_type) else {
                log::trace!("nothing to debug on line {}", request.debug_line);
                return None;
            };
            log_probe(&var, start);

            let site = ProbeSite {
                var: &var,
                line: start,
                statement_end: statement_end(&codes, start).min(function.end),
                loops: &loops,
            };
            let program = if path == DebugPath::EntryTruncation {
                truncate_main_image(&lines, &function, &site, &request.loop_max_iterations, &viz)
            } else {
                wrap_function_for_debugging(
                    &lines,
                    &function,
                    &site,
                    &request.loop_max_iterations,
                    &request.custom_parameters,
                    &viz,
                )
            };
            Some(program)
        }
    }
}

/// Picks the program shape from where the line sits.
pub fn choose_path(function: Option<&FunctionInfo>, debug_line: usize) -> DebugPath {
    match function {
        Some(f) if f.name == ENTRY_FUNCTION => DebugPath::EntryTruncation,
        Some(f) if debug_line == f.start && f.returns_value() => DebugPath::FullHelper,
        Some(_) => DebugPath::HelperWrap,
        None => DebugPath::OneLiner,
    }
}

fn log_probe(var: &VarInfo, line: usize) {
    if var.name == RETURN_VALUE_NAME {
        log::debug!("probing return value ({}) at line {}", var.ty, line);
    } else {
        log::debug!("probing '{}' ({}) at line {}", var.name, var.ty, line);
    }
}
