use crate::parser::{code_of, indent_of};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Insertions and replacements keyed by original line index.
///
/// Every pass that needs to add code plans against the same coordinates and
/// the result is rendered once, so no pass has to re-derive positions from
/// another pass's output.
#[derive(Debug, Default, Clone)]
pub struct LineEdits {
    replace: BTreeMap<usize, String>,
    before: BTreeMap<usize, Vec<String>>,
    after_brace: BTreeMap<usize, Vec<String>>,
    after: BTreeMap<usize, Vec<String>>,
}

impl LineEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.replace.is_empty()
            && self.before.is_empty()
            && self.after_brace.is_empty()
            && self.after.is_empty()
    }

    pub fn replace(&mut self, line: usize, text: impl Into<String>) {
        self.replace.insert(line, text.into());
    }

    /// Current text of `line`, honoring an earlier replacement.
    pub fn text_of<'a, L: AsRef<str>>(&'a self, lines: &'a [L], line: usize) -> &'a str {
        self.replace
            .get(&line)
            .map(String::as_str)
            .unwrap_or_else(|| lines[line].as_ref())
    }

    pub fn insert_before(&mut self, line: usize, text: impl Into<String>) {
        self.before.entry(line).or_default().push(text.into());
    }

    pub fn insert_after(&mut self, line: usize, text: impl Into<String>) {
        self.after.entry(line).or_default().push(text.into());
    }

    /// Inserts right after the first `{` on `line`, splitting the line if code follows it.
    pub fn insert_after_brace(&mut self, line: usize, text: impl Into<String>) {
        self.after_brace.entry(line).or_default().push(text.into());
    }

    pub fn apply<L: AsRef<str>>(&self, lines: &[L]) -> Vec<String> {
        if lines.is_empty() {
            return Vec::new();
        }
        self.apply_range(lines, 0..=lines.len() - 1)
    }

    /// Renders only `range` of the original lines with the planned edits.
    pub fn apply_range<L: AsRef<str>>(
        &self,
        lines: &[L],
        range: RangeInclusive<usize>,
    ) -> Vec<String> {
        let mut out = Vec::new();
        let last = (*range.end()).min(lines.len().saturating_sub(1));

        for i in *range.start()..=last {
            if let Some(before) = self.before.get(&i) {
                out.extend(before.iter().cloned());
            }

            let text = self.text_of(lines, i);
            match self.after_brace.get(&i) {
                Some(inserted) => split_after_brace(text, inserted, &mut out),
                None => out.push(text.to_string()),
            }

            if let Some(after) = self.after.get(&i) {
                out.extend(after.iter().cloned());
            }
        }
        out
    }
}

fn split_after_brace(text: &str, inserted: &[String], out: &mut Vec<String>) {
    let Some(pos) = code_of(text).find('{') else {
        out.push(text.to_string());
        out.extend(inserted.iter().cloned());
        return;
    };

    out.push(text[..=pos].to_string());
    out.extend(inserted.iter().cloned());
    let tail = text[pos + 1..].trim();
    if !tail.is_empty() {
        out.push(format!("{}    {}", indent_of(text), tail));
    }
}
