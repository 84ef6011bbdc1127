use crate::parser::{extract_loops, find_enclosing_function, LoopInfo, ParamQualifier, ENTRY_FUNCTION};
use crate::synth::{default_argument, default_param_mode, get_default_custom_value, get_uv_value, ParamMode};
use serde::Serialize;

/// One helper parameter as the UI presents it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterContext {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub qualifier: Option<ParamQualifier>,
    /// Mode the UI starts in.
    pub mode: ParamMode,
    /// Argument synthesized when the user changes nothing.
    pub default_value: String,
    pub uv_value: Option<String>,
    pub centered_uv_value: Option<String>,
    /// Literal offered when the user switches to custom mode.
    pub custom_value: String,
}

/// What the UI needs to render per-parameter and per-loop controls for a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionContext {
    pub function_name: String,
    pub return_type: String,
    pub parameters: Vec<ParameterContext>,
    /// True for helpers; false for the entry function itself.
    pub is_function: bool,
    /// Loops containing the line, outermost first.
    pub loops: Vec<LoopInfo>,
}

/// Describes the function enclosing `debug_line`, or `None` outside any function.
pub fn extract_function_context(source: &str, debug_line: usize) -> Option<FunctionContext> {
    let lines: Vec<&str> = source.lines().collect();
    let function = find_enclosing_function(&lines, debug_line)?;
    let is_function = function.name != ENTRY_FUNCTION;

    let parameters = if is_function {
        function
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let coordinate = param.ty == "vec2";
                ParameterContext {
                    index,
                    name: param.name.clone(),
                    type_name: param.ty.clone(),
                    qualifier: param.qualifier,
                    mode: default_param_mode(param),
                    default_value: default_argument(param),
                    uv_value: coordinate.then(|| get_uv_value(ParamMode::Uv)).flatten(),
                    centered_uv_value: coordinate
                        .then(|| get_uv_value(ParamMode::CenteredUv))
                        .flatten(),
                    custom_value: get_default_custom_value(&param.ty),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(FunctionContext {
        loops: extract_loops(&lines, function.start, debug_line),
        function_name: function.name,
        return_type: function.return_type,
        parameters,
        is_function,
    })
}
