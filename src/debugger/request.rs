use crate::synth::{NormalizeMode, Visualization};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything needed to synthesize one debug program.
///
/// Deserializes from the editor's camelCase JSON; map keys arrive as strings
/// (`{"0": 10}`) and are parsed as indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebugRequest {
    pub source: String,
    pub debug_line: usize,
    pub line_content: String,
    /// Loop index -> iteration cap.
    pub loop_max_iterations: HashMap<usize, u32>,
    pub normalize_mode: NormalizeMode,
    pub step_edge: Option<f32>,
    /// Helper argument index -> replacement expression.
    pub custom_parameters: HashMap<usize, String>,
}

impl DebugRequest {
    pub fn new(source: impl Into<String>, debug_line: usize) -> Self {
        let source = source.into();
        let line_content = source.lines().nth(debug_line).unwrap_or_default().to_string();
        Self {
            source,
            debug_line,
            line_content,
            ..Self::default()
        }
    }

    pub fn with_loop_cap(mut self, loop_index: usize, max: u32) -> Self {
        self.loop_max_iterations.insert(loop_index, max);
        self
    }

    pub fn with_normalize(mut self, mode: NormalizeMode) -> Self {
        self.normalize_mode = mode;
        self
    }

    pub fn with_step_edge(mut self, edge: f32) -> Self {
        self.step_edge = Some(edge);
        self
    }

    pub fn with_custom_parameter(mut self, index: usize, expr: impl Into<String>) -> Self {
        self.custom_parameters.insert(index, expr.into());
        self
    }

    pub fn visualization(&self) -> Visualization {
        Visualization::new(self.normalize_mode, self.step_edge)
    }
}
