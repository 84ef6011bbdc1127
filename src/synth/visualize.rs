use crate::parser::{GlslType, TypeShape};
use serde::{Deserialize, Serialize};

/// Output color variable of a synthesized entry function.
pub const OUTPUT_COLOR: &str = "fragColor";
/// Fragment coordinate parameter of a synthesized entry function.
pub const FRAG_COORD: &str = "fragCoord";

/// How an unbounded value is squeezed into `[0, 1]` before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMode {
    #[default]
    Off,
    /// Signed: zero is mid-gray.
    Soft,
    /// Magnitude: zero is black.
    Abs,
}

impl std::str::FromStr for NormalizeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(NormalizeMode::Off),
            "soft" => Ok(NormalizeMode::Soft),
            "abs" => Ok(NormalizeMode::Abs),
            other => Err(format!("unknown normalize mode '{}'", other)),
        }
    }
}

/// Display options shared by every program shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Visualization {
    pub normalize: NormalizeMode,
    pub step_edge: Option<f32>,
}

impl Visualization {
    pub fn new(normalize: NormalizeMode, step_edge: Option<f32>) -> Self {
        Self {
            normalize,
            step_edge,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.normalize == NormalizeMode::Off && self.step_edge.is_none()
    }
}

/// Formats a float as a GLSL literal (always with a decimal point).
pub fn glsl_float(value: f32) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Applies the normalization mapping to an expression, component-wise.
pub fn normalize_expr(expr: &str, mode: NormalizeMode) -> String {
    match mode {
        NormalizeMode::Off => expr.to_string(),
        NormalizeMode::Soft => format!("{e} / (abs({e}) + 1.0) * 0.5 + 0.5", e = expr),
        NormalizeMode::Abs => format!("abs({e}) / (abs({e}) + 1.0)", e = expr),
    }
}

/// Thresholds the already-written output color per channel.
pub fn step_statement(output: &str, edge: f32) -> String {
    format!(
        "{out} = vec4(step(vec3({edge}), {out}.rgb), 1.0);",
        out = output,
        edge = glsl_float(edge)
    )
}

fn as_float_vector(ty: GlslType, expr: &str, width: usize) -> String {
    if ty.is_float_based() {
        expr.to_string()
    } else if width == 1 {
        format!("float({})", expr)
    } else {
        format!("vec{}({})", width, expr)
    }
}

/// Statements writing a value of type `ty` named `name` into `fragColor`.
pub fn generate_return_statement_for_var(
    ty: GlslType,
    name: &str,
    normalize: NormalizeMode,
    step_edge: Option<f32>,
) -> Vec<String> {
    visualize_into(
        OUTPUT_COLOR,
        FRAG_COORD,
        ty,
        name,
        &Visualization::new(normalize, step_edge),
    )
}

/// Statements writing `name` into `output`, as a color.
///
/// `coord` is the fragment coordinate, used only to sample sampler probes.
pub fn visualize_into(
    output: &str,
    coord: &str,
    ty: GlslType,
    name: &str,
    viz: &Visualization,
) -> Vec<String> {
    let mode = viz.normalize;
    let mut out = Vec::new();

    match ty.shape() {
        TypeShape::Scalar => {
            let v = normalize_expr(&as_float_vector(ty, name, 1), mode);
            out.push(format!("{} = vec4(vec3({}), 1.0);", output, v));
        }
        TypeShape::Vector(2) => {
            let v = normalize_expr(&as_float_vector(ty, name, 2), mode);
            out.push(format!("{} = vec4({}, 0.0, 1.0);", output, v));
        }
        TypeShape::Vector(3) => {
            let v = normalize_expr(&as_float_vector(ty, name, 3), mode);
            out.push(format!("{} = vec4({}, 1.0);", output, v));
        }
        TypeShape::Vector(_) => {
            out.push(vec4_statement(output, &as_float_vector(ty, name, 4), mode));
        }
        TypeShape::Matrix(n) => {
            out.push(format!(
                "// debug: {} has no color form, showing its first column",
                ty
            ));
            let column = format!("{}[0]", name);
            match n {
                2 => out.push(format!(
                    "{} = vec4({}, 0.0, 1.0);",
                    output,
                    normalize_expr(&column, mode)
                )),
                3 => out.push(format!(
                    "{} = vec4({}, 1.0);",
                    output,
                    normalize_expr(&column, mode)
                )),
                _ => out.push(vec4_statement(output, &column, mode)),
            }
        }
        TypeShape::Sampler => {
            let uv = format!("{} / iResolution.xy", coord);
            let lookup = match ty {
                GlslType::Sampler3D => format!("vec3({}, 0.5)", uv),
                GlslType::SamplerCube => format!("vec3({} * 2.0 - 1.0, 1.0)", uv),
                _ => uv,
            };
            out.push(format!("{} = texture({}, {});", output, name, lookup));
        }
    }

    if let Some(edge) = viz.step_edge {
        out.push(step_statement(output, edge));
    }
    out
}

fn vec4_statement(output: &str, value: &str, mode: NormalizeMode) -> String {
    match mode {
        NormalizeMode::Off => format!("{} = {};", output, value),
        _ => format!(
            "{} = vec4({}, 1.0);",
            output,
            normalize_expr(&format!("{}.xyz", value), mode)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_literals_keep_a_decimal_point() {
        assert_eq!(glsl_float(1.0), "1.0");
        assert_eq!(glsl_float(0.25), "0.25");
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("SOFT".parse::<NormalizeMode>(), Ok(NormalizeMode::Soft));
        assert!("loud".parse::<NormalizeMode>().is_err());
    }
}
