use super::visualize::FRAG_COORD;
use crate::parser::{references_identifier, FunctionInfo, Param};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the screen-space coordinate helper in synthesized entry functions.
pub const UV_NAME: &str = "uv";

/// How the UI fills in a helper parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamMode {
    /// `[0, 1]` screen coordinate.
    Uv,
    /// Aspect-corrected coordinate centered on the screen.
    CenteredUv,
    /// A literal expression.
    Custom,
}

pub fn uv_setup_line() -> String {
    format!("vec2 {} = {} / iResolution.xy;", UV_NAME, FRAG_COORD)
}

/// Coordinate expression for a coordinate mode; `None` for [`ParamMode::Custom`].
pub fn get_uv_value(mode: ParamMode) -> Option<String> {
    match mode {
        ParamMode::Uv => Some(UV_NAME.to_string()),
        ParamMode::CenteredUv => Some(format!(
            "({c} - 0.5 * iResolution.xy) / iResolution.y",
            c = FRAG_COORD
        )),
        ParamMode::Custom => None,
    }
}

/// Literal default for a parameter of type `ty` when no coordinate is used.
pub fn get_default_custom_value(ty: &str) -> String {
    match ty {
        "float" => "0.5".to_string(),
        "int" => "1".to_string(),
        "uint" => "1u".to_string(),
        "bool" => "true".to_string(),
        "vec2" | "vec3" | "vec4" => format!("{}(0.5)", ty),
        "ivec2" | "ivec3" | "ivec4" => format!("{}(1)", ty),
        "uvec2" | "uvec3" | "uvec4" => format!("{}(1u)", ty),
        "bvec2" | "bvec3" | "bvec4" => format!("{}(true)", ty),
        "mat2" | "mat3" | "mat4" | "mat2x2" | "mat3x3" | "mat4x4" => format!("{}(1.0)", ty),
        "sampler2D" | "sampler3D" | "samplerCube" => "iChannel0".to_string(),
        other => format!("{}(0.0)", other),
    }
}

/// The mode the UI starts a parameter in.
pub fn default_param_mode(param: &Param) -> ParamMode {
    if param.ty == "vec2" {
        ParamMode::Uv
    } else {
        ParamMode::Custom
    }
}

/// Default argument expression for one parameter.
pub fn default_argument(param: &Param) -> String {
    get_uv_value(default_param_mode(param)).unwrap_or_else(|| get_default_custom_value(&param.ty))
}

fn argument_temp(index: usize) -> String {
    format!("_dbgArg{}", index)
}

fn synthesize_arguments(
    function: &FunctionInfo,
    overrides: &HashMap<usize, String>,
) -> (String, Vec<String>) {
    let mut args = Vec::with_capacity(function.params.len());
    let mut temps = Vec::new();

    for (index, param) in function.params.iter().enumerate() {
        let value = overrides
            .get(&index)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default_argument(param));

        if param.qualifier.is_some_and(|q| q.is_writable()) {
            let temp = argument_temp(index);
            temps.push(format!("{} {} = {};", param.ty, temp, value));
            args.push(temp);
        } else {
            args.push(value);
        }
    }

    let mut setup = Vec::new();
    let needs_uv = args
        .iter()
        .chain(temps.iter())
        .any(|text| references_identifier(text, UV_NAME));
    if needs_uv {
        setup.push(uv_setup_line());
    }
    setup.extend(temps);

    (args.join(", "), setup)
}

/// Default call arguments for `function`, plus the setup lines they need.
pub fn generate_default_parameters(function: &FunctionInfo) -> (String, Vec<String>) {
    synthesize_arguments(function, &HashMap::new())
}

/// A call to `function` using defaults overridden by `custom` (argument index -> expression).
///
/// Returns `(call expression, setup lines)`.
pub fn generate_function_call(
    function: &FunctionInfo,
    custom: &HashMap<usize, String>,
) -> (String, Vec<String>) {
    let (args, setup) = synthesize_arguments(function, custom);
    (format!("{}({})", function.name, args), setup)
}
