use super::lines::{code_lines, is_identifier, leading_word, split_statements};
use super::loops::loop_init_clause;
use super::types::{FunctionInfo, GlslType, TypeEnv};

const STORAGE_WORDS: &[&str] = &[
    "const", "uniform", "highp", "mediump", "lowp", "precise", "in", "out", "inout", "flat",
    "smooth", "noperspective", "centroid", "varying", "attribute",
];

/// A `type name [= expr] [, name2 ...]` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub ty: GlslType,
    pub names: Vec<String>,
    pub initialized: bool,
}

/// Parses one statement (no trailing `;`) as a variable declaration.
pub fn parse_declaration(statement: &str) -> Option<Declaration> {
    let mut rest = statement.trim_start_matches(|c: char| c.is_whitespace() || c == '{' || c == '}');

    let mut word = leading_word(rest);
    while STORAGE_WORDS.contains(&word) {
        rest = rest[word.len()..].trim_start();
        word = leading_word(rest);
    }

    let ty = GlslType::from_name(word)?;
    rest = &rest[word.len()..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut names = Vec::new();
    let mut initialized = false;
    for (i, declarator) in split_top_level_commas(rest).into_iter().enumerate() {
        let declarator = declarator.trim();
        let name = leading_word(declarator);
        if !is_identifier(name) {
            return None;
        }
        let after = declarator[name.len()..].trim_start();
        let after = skip_array_suffix(after);
        let has_init = after.starts_with('=') && !after.starts_with("==");
        if !(after.is_empty() || has_init) {
            return None;
        }
        if i == 0 {
            initialized = has_init;
        }
        names.push(name.to_string());
    }

    if names.is_empty() {
        return None;
    }
    Some(Declaration {
        ty,
        names,
        initialized,
    })
}

fn skip_array_suffix(text: &str) -> &str {
    let mut rest = text;
    while rest.starts_with('[') {
        match rest.find(']') {
            Some(close) => rest = rest[close + 1..].trim_start(),
            None => break,
        }
    }
    rest
}

fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (pos, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn record_declarations(env: &mut TypeEnv, code: &str) {
    if let Some(init) = loop_init_clause(code) {
        if let Some(decl) = parse_declaration(init) {
            for name in decl.names {
                env.insert(name, decl.ty);
            }
        }
        return;
    }
    for statement in split_statements(code) {
        if let Some(decl) = parse_declaration(statement) {
            for name in decl.names {
                env.insert(name, decl.ty);
            }
        }
    }
}

/// Everything visible at `target`: globals declared before the function,
/// then its parameters, then locals declared up to and including `target`.
///
/// Later declarations overwrite earlier ones of the same name.
pub fn build_variable_type_map<L: AsRef<str>>(
    lines: &[L],
    target: usize,
    function: Option<&FunctionInfo>,
) -> TypeEnv {
    let codes = code_lines(lines);
    let mut env = TypeEnv::new();
    let global_end = function.map_or(target + 1, |f| f.start).min(codes.len());

    let mut depth = 0i32;
    for code in &codes[..global_end] {
        if depth == 0 {
            record_declarations(&mut env, code);
        }
        depth += super::lines::brace_delta(code);
    }

    let Some(function) = function else {
        return env;
    };

    for param in &function.params {
        if let Some(ty) = GlslType::from_name(&param.ty) {
            env.insert(param.name.clone(), ty);
        }
    }

    let last = target.min(function.end).min(codes.len().saturating_sub(1));
    for (i, code) in codes.iter().enumerate().take(last + 1).skip(function.brace_line) {
        let body = if i == function.brace_line {
            code.split_once('{').map_or("", |(_, body)| body)
        } else {
            code.as_str()
        };
        record_declarations(&mut env, body);
    }

    env
}
