use super::functions::{parse_function_header, FunctionHeader};
use super::lines::{code_lines, code_of, is_identifier, leading_word, statement_start};
use super::loops::is_loop_header;
use super::scope::parse_declaration;
use super::types::{GlslType, TypeEnv, VarInfo};

/// Reserved name bound to a probed `return` expression.
pub const RETURN_VALUE_NAME: &str = "_dbgReturn";

const COMPOUND_OPS: &[&str] = &["<<=", ">>=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^="];

/// The syntactic shape of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape {
    /// `type name = expr`
    Declaration { ty: GlslType, name: String },
    /// `name = expr`
    Assignment { name: String },
    /// `name op= expr`, `name++`, `--name`
    CompoundAssignment { name: String, op: String },
    /// `name.field op= expr`, `name[i] = expr`
    MemberMutation { name: String, accessor: String },
    /// `return expr`
    Return { expr: String },
    LoopHeader,
    FunctionHeader(FunctionHeader),
    Other,
}

/// Matches a line against the ordered shape rules.
pub fn classify_line(line: &str) -> LineShape {
    let code = code_of(line);
    let t = code.trim();
    if t.is_empty() {
        return LineShape::Other;
    }

    if let Some(header) = parse_function_header(t) {
        return LineShape::FunctionHeader(header);
    }
    if is_loop_header(t) {
        return LineShape::LoopHeader;
    }

    let statement = t.trim_end_matches(';').trim_end();

    if leading_word(statement) == "return" {
        return LineShape::Return {
            expr: statement["return".len()..].trim().to_string(),
        };
    }

    if let Some(decl) = parse_declaration(statement) {
        if decl.initialized {
            if let Some(name) = decl.names.into_iter().next() {
                return LineShape::Declaration { ty: decl.ty, name };
            }
        }
        return LineShape::Other;
    }

    classify_mutation(statement)
}

fn classify_mutation(statement: &str) -> LineShape {
    for op in ["++", "--"] {
        if let Some(rest) = statement.strip_prefix(op) {
            let name = leading_word(rest.trim_start());
            if is_identifier(name) {
                return LineShape::CompoundAssignment {
                    name: name.to_string(),
                    op: op.to_string(),
                };
            }
        }
    }

    let name = leading_word(statement);
    if !is_identifier(name) {
        return LineShape::Other;
    }
    let mut rest = statement[name.len()..].trim_start();

    let accessor_start = rest;
    loop {
        if let Some(after) = rest.strip_prefix('.') {
            let field = leading_word(after);
            if !is_identifier(field) {
                return LineShape::Other;
            }
            rest = after[field.len()..].trim_start();
        } else if rest.starts_with('[') {
            match rest.find(']') {
                Some(close) => rest = rest[close + 1..].trim_start(),
                None => return LineShape::Other,
            }
        } else {
            break;
        }
    }
    let accessor = accessor_start[..accessor_start.len() - rest.len()].trim().to_string();

    let op = if rest.starts_with("++") || rest.starts_with("--") {
        Some(rest[..2].to_string())
    } else if rest.starts_with('=') && !rest.starts_with("==") {
        Some("=".to_string())
    } else {
        COMPOUND_OPS
            .iter()
            .find(|op| rest.starts_with(*op))
            .map(|op| op.to_string())
    };

    match op {
        None => LineShape::Other,
        Some(_) if !accessor.is_empty() => LineShape::MemberMutation {
            name: name.to_string(),
            accessor,
        },
        Some(op) if op == "=" => LineShape::Assignment {
            name: name.to_string(),
        },
        Some(op) => LineShape::CompoundAssignment {
            name: name.to_string(),
            op,
        },
    }
}

/// Identifies the value a line writes, given what is in scope.
///
/// `return_type` is the enclosing function's declared return type, used only
/// for `return` statements.
pub fn detect_variable_and_type(
    line: &str,
    env: &TypeEnv,
    return_type: Option<&str>,
) -> Option<VarInfo> {
    match classify_line(line) {
        LineShape::Declaration { ty, name } => Some(VarInfo::new(name, ty)),
        LineShape::Assignment { name }
        | LineShape::CompoundAssignment { name, .. }
        | LineShape::MemberMutation { name, .. } => {
            env.get(&name).map(|ty| VarInfo::new(name.clone(), *ty))
        }
        LineShape::Return { expr } if !expr.is_empty() => {
            let ty = return_type.filter(|rt| *rt != "void").and_then(GlslType::from_name)?;
            Some(VarInfo::new(RETURN_VALUE_NAME, ty))
        }
        _ => None,
    }
}

/// Like [`detect_variable_and_type`], but resolves a continuation line to the
/// first line of its statement. Returns that line's index with the result.
pub fn detect_variable_at<L: AsRef<str>>(
    lines: &[L],
    line_index: usize,
    env: &TypeEnv,
    return_type: Option<&str>,
) -> Option<(usize, VarInfo)> {
    let codes = code_lines(lines);
    let start = statement_start(&codes, line_index);
    detect_variable_and_type(lines.get(start)?.as_ref(), env, return_type).map(|var| (start, var))
}
