use super::lines::{
    closing_brace, code_lines, is_identifier, leading_word, paren_delta, STATEMENT_LOOKAHEAD,
};
use super::types::{FunctionInfo, Param, ParamQualifier};

/// Name of the fixed-signature function every shader of this kind defines.
pub const ENTRY_FUNCTION: &str = "mainImage";

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "return", "break",
    "continue", "discard", "struct", "uniform", "const", "in", "out", "inout", "layout",
    "precision",
];

const PRECISION_WORDS: &[&str] = &["highp", "mediump", "lowp", "precise"];

/// The `returnType name(params)` part of a function definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader {
    pub return_type: String,
    pub name: String,
    pub params: String,
    /// Whether the body's `{` already appears on this line.
    pub opens_body: bool,
}

/// Recognizes a function definition header on a code-only line.
pub fn parse_function_header(code: &str) -> Option<FunctionHeader> {
    let mut rest = code.trim_start();

    let mut word = leading_word(rest);
    while PRECISION_WORDS.contains(&word) {
        rest = rest[word.len()..].trim_start();
        word = leading_word(rest);
    }

    let return_type = word;
    if !is_identifier(return_type) || KEYWORDS.contains(&return_type) {
        return None;
    }
    rest = &rest[return_type.len()..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    rest = rest.trim_start();

    let name = leading_word(rest);
    if !is_identifier(name) || KEYWORDS.contains(&name) {
        return None;
    }
    rest = rest[name.len()..].trim_start();
    if !rest.starts_with('(') {
        return None;
    }

    let close = matching_paren(rest)?;
    let params = rest[1..close].trim();
    let tail = rest[close + 1..].trim();
    if !(tail.is_empty() || tail.starts_with('{')) {
        return None;
    }

    Some(FunctionHeader {
        return_type: return_type.to_string(),
        name: name.to_string(),
        params: params.to_string(),
        opens_body: tail.starts_with('{'),
    })
}

fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (pos, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a parameter list such as `out vec4 c, in vec2 p, float k`.
pub fn parse_params(params: &str) -> Vec<Param> {
    let params = params.trim();
    if params.is_empty() || params == "void" {
        return Vec::new();
    }

    params
        .split(',')
        .filter_map(|part| {
            let mut qualifier = None;
            let mut words = Vec::new();
            for word in part.split_whitespace() {
                match word {
                    "in" => qualifier = Some(ParamQualifier::In),
                    "out" => qualifier = Some(ParamQualifier::Out),
                    "inout" => qualifier = Some(ParamQualifier::InOut),
                    "const" => {}
                    w if PRECISION_WORDS.contains(&w) => {}
                    w => words.push(w),
                }
            }
            if words.len() < 2 {
                return None;
            }
            let ty = words[words.len() - 2];
            let name = words[words.len() - 1];
            let name = name.split('[').next().unwrap_or(name);
            Some(Param {
                qualifier,
                ty: ty.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

/// Header text starting at `start`, joined with following lines while its
/// parameter list is still open. Returns the text and the header's last line.
fn header_span(codes: &[String], start: usize) -> Option<(String, usize)> {
    let mut text = codes.get(start)?.trim().to_string();
    let mut end = start;
    let mut depth = paren_delta(&text);
    while depth > 0 && end + 1 < codes.len() && end - start < STATEMENT_LOOKAHEAD {
        end += 1;
        let next = codes[end].trim();
        depth += paren_delta(next);
        text.push(' ');
        text.push_str(next);
    }
    Some((text, end))
}

/// Resolves the function definition starting at `start`, if that line is a header.
pub(crate) fn function_at(codes: &[String], start: usize) -> Option<FunctionInfo> {
    let (text, header_end) = header_span(codes, start)?;
    let header = parse_function_header(&text)?;

    let brace_line = if header.opens_body {
        header_end
    } else {
        let next = (header_end + 1..codes.len()).find(|&i| !codes[i].trim().is_empty())?;
        if !codes[next].trim_start().starts_with('{') {
            return None;
        }
        next
    };

    let (end, terminated) = match closing_brace(codes, start) {
        Some((line, _)) => (line, true),
        None => (codes.len().saturating_sub(1), false),
    };

    Some(FunctionInfo {
        params: parse_params(&header.params),
        name: header.name,
        return_type: header.return_type,
        start,
        brace_line,
        end,
        terminated,
    })
}

/// Finds the function whose definition encloses `target`.
///
/// Scans backward for the nearest header, then forward for its closing brace.
/// An unterminated body extends to the last line.
pub fn find_enclosing_function<L: AsRef<str>>(lines: &[L], target: usize) -> Option<FunctionInfo> {
    if target >= lines.len() {
        return None;
    }
    let codes = code_lines(lines);

    for start in (0..=target).rev() {
        if let Some(info) = function_at(&codes, start) {
            return (info.end >= target).then_some(info);
        }
    }
    None
}

/// Line of the entry function's header, if the source defines one.
pub fn find_main_image_start<L: AsRef<str>>(lines: &[L]) -> Option<usize> {
    let codes = code_lines(lines);
    find_entry_function(&codes).map(|info| info.start)
}

pub(crate) fn find_entry_function(codes: &[String]) -> Option<FunctionInfo> {
    (0..codes.len())
        .filter_map(|i| function_at(codes, i))
        .find(|info| info.name == ENTRY_FUNCTION)
}

/// Names the entry function binds for its output color and fragment coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySignature {
    pub output: String,
    pub coord: String,
}

impl Default for EntrySignature {
    fn default() -> Self {
        Self {
            output: "fragColor".to_string(),
            coord: "fragCoord".to_string(),
        }
    }
}

impl EntrySignature {
    pub fn of(info: &FunctionInfo) -> Self {
        let mut sig = Self::default();
        for param in &info.params {
            match (param.qualifier, param.ty.as_str()) {
                (Some(ParamQualifier::Out), "vec4") => sig.output = param.name.clone(),
                (Some(ParamQualifier::In) | None, "vec2") => sig.coord = param.name.clone(),
                _ => {}
            }
        }
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_with_precision_and_brace() {
        let h = parse_function_header("highp float sdBox(vec3 p, vec3 b) {").unwrap();
        assert_eq!(h.return_type, "float");
        assert_eq!(h.name, "sdBox");
        assert_eq!(h.params, "vec3 p, vec3 b");
        assert!(h.opens_body);
    }

    #[test]
    fn statements_are_not_headers() {
        assert!(parse_function_header("vec3 col = vec3(1.0);").is_none());
        assert!(parse_function_header("return foo(x);").is_none());
        assert!(parse_function_header("} else if (x > 1.0) {").is_none());
        assert!(parse_function_header("float proto(float x);").is_none());
        assert!(parse_function_header("col = foo(x);").is_none());
    }

    #[test]
    fn params_skip_qualifiers_and_arrays() {
        let params = parse_params("out vec4 fragColor, in vec2 fragCoord, const float k[3]");
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].qualifier, Some(ParamQualifier::Out));
        assert_eq!(params[1].name, "fragCoord");
        assert_eq!(params[2].ty, "float");
        assert_eq!(params[2].name, "k");
        assert!(parse_params("void").is_empty());
    }

    #[test]
    fn header_split_over_lines() {
        let codes = code_lines(&[
            "float h(vec3 p,",
            "        float k) {",
            "    float a = k;",
            "    return a;",
            "}",
        ]);
        let info = function_at(&codes, 0).unwrap();
        assert_eq!(info.name, "h");
        assert_eq!(info.brace_line, 1);
        assert_eq!(info.end, 4);
        assert_eq!(info.params.len(), 2);
        assert_eq!(info.params[1].name, "k");
        assert!(function_at(&codes, 1).is_none());
    }
}
