use super::commands::{Command, HELP};
use crate::config::Settings;
use crate::debugger::{debug_shader, extract_function_context, DebugRequest};
use crate::error::{Error, Result};
use crate::synth::NormalizeMode;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Result of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Print(String),
    Quit,
}

/// Interactive state: the shader plus the options the user has dialed in.
pub struct DebugSession {
    path: Option<PathBuf>,
    source: String,
    loop_caps: HashMap<usize, u32>,
    normalize: NormalizeMode,
    step_edge: Option<f32>,
    custom_parameters: HashMap<usize, String>,
    default_loop_cap: Option<u32>,
}

impl DebugSession {
    pub fn new(source: impl Into<String>, settings: &Settings) -> Self {
        Self {
            path: None,
            source: source.into(),
            loop_caps: HashMap::new(),
            normalize: settings.normalize_mode,
            step_edge: settings.step_edge,
            custom_parameters: HashMap::new(),
            default_loop_cap: settings.default_loop_cap,
        }
    }

    pub fn open(path: impl Into<PathBuf>, settings: &Settings) -> Result<Self> {
        let path = path.into();
        let source = fs::read_to_string(&path)?;
        let mut session = Self::new(source, settings);
        session.path = Some(path);
        Ok(session)
    }

    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }

    /// The request for 0-based `line`, with the default cap filled in for
    /// containing loops the user has not capped.
    pub fn request_for(&self, line: usize) -> DebugRequest {
        let mut request = DebugRequest::new(self.source.clone(), line)
            .with_normalize(self.normalize);
        request.step_edge = self.step_edge;
        request.custom_parameters = self.custom_parameters.clone();
        request.loop_max_iterations = self.loop_caps.clone();

        if let Some(cap) = self.default_loop_cap {
            if let Some(context) = extract_function_context(&self.source, line) {
                for info in context.loops {
                    request
                        .loop_max_iterations
                        .entry(info.loop_index)
                        .or_insert(cap);
                }
            }
        }
        request
    }

    fn checked_line(&self, one_based: usize) -> Result<usize> {
        let count = self.line_count();
        if one_based == 0 || one_based > count {
            return Err(Error::Usage(format!(
                "line {} is past the end ({} lines)",
                one_based, count
            )));
        }
        Ok(one_based - 1)
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let text = match command {
            Command::Line(line) => {
                let line = self.checked_line(line)?;
                debug_shader(&self.request_for(line))
                    .unwrap_or_else(|| "nothing to debug on this line".to_string())
            }
            Command::Context(line) => {
                let line = self.checked_line(line)?;
                match extract_function_context(&self.source, line) {
                    Some(context) => serde_json::to_string_pretty(&context)?,
                    None => "line is not inside a function".to_string(),
                }
            }
            Command::Cap { loop_index, max } => {
                self.loop_caps.insert(loop_index, max);
                format!("loop {} capped at {} iterations", loop_index, max)
            }
            Command::Uncap(loop_index) => {
                self.loop_caps.remove(&loop_index);
                format!("loop {} uncapped", loop_index)
            }
            Command::Normalize(mode) => {
                self.normalize = mode;
                format!("normalize: {:?}", mode).to_lowercase()
            }
            Command::Step(edge) => {
                self.step_edge = edge;
                match edge {
                    Some(edge) => format!("step edge: {}", edge),
                    None => "step: off".to_string(),
                }
            }
            Command::Param { index, expr } => {
                let text = format!("argument {} = {}", index, expr);
                self.custom_parameters.insert(index, expr);
                text
            }
            Command::Unparam(index) => {
                self.custom_parameters.remove(&index);
                format!("argument {} restored to its default", index)
            }
            Command::Reload => match &self.path {
                Some(path) => {
                    self.source = fs::read_to_string(path)?;
                    format!("reloaded {} ({} lines)", path.display(), self.line_count())
                }
                None => "no file to reload".to_string(),
            },
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Print(text))
    }
}
